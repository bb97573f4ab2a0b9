// Notification Dispatcher Port (Interface)
// External owner of pending notifications and of the notification permission

use crate::domain::{AuthorizationState, NotificationRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Dispatcher failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("notification rejected: {0}")]
    Rejected(String),

    #[error("dispatcher unavailable: {0}")]
    Unavailable(String),
}

/// Notification dispatcher interface
///
/// Implementations:
/// - LocalNotificationCenter (carcare-infra-system): in-process timers
/// - MockNotificationDispatcher: in-memory, for tests
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Register a one-shot notification. Same identifier overwrites.
    async fn schedule(&self, request: NotificationRequest) -> Result<(), DispatchError>;

    /// Remove pending notifications by identifier. Unknown identifiers are ignored.
    async fn cancel(&self, identifiers: &[String]) -> Result<(), DispatchError>;

    /// Remove every pending notification
    async fn cancel_all(&self) -> Result<(), DispatchError>;

    /// Identifiers of all pending notifications
    async fn list_pending(&self) -> Result<Vec<String>, DispatchError>;

    /// Current permission state
    async fn current_authorization(&self) -> Result<AuthorizationState, DispatchError>;

    /// Show the permission prompt and wait for the answer
    ///
    /// # Errors
    /// - DispatchError if the prompt could not be shown
    async fn request_authorization(&self) -> Result<bool, DispatchError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// In-memory dispatcher with scripted permission answers
    #[derive(Clone)]
    pub struct MockNotificationDispatcher {
        pending: Arc<Mutex<BTreeMap<String, NotificationRequest>>>,
        authorization: Arc<Mutex<AuthorizationState>>,
        prompt_answer: Arc<Mutex<Result<bool, DispatchError>>>,
        /// Tier offsets whose schedule call fails
        failing_offsets: Arc<Mutex<Vec<u32>>>,
        /// Simulated latency of each schedule call
        schedule_delay: Arc<Mutex<Option<Duration>>>,
        schedule_calls: Arc<Mutex<usize>>,
        prompt_calls: Arc<Mutex<usize>>,
    }

    impl MockNotificationDispatcher {
        pub fn new(authorization: AuthorizationState) -> Self {
            Self {
                pending: Arc::new(Mutex::new(BTreeMap::new())),
                authorization: Arc::new(Mutex::new(authorization)),
                prompt_answer: Arc::new(Mutex::new(Ok(true))),
                failing_offsets: Arc::new(Mutex::new(Vec::new())),
                schedule_delay: Arc::new(Mutex::new(None)),
                schedule_calls: Arc::new(Mutex::new(0)),
                prompt_calls: Arc::new(Mutex::new(0)),
            }
        }

        pub fn authorized() -> Self {
            Self::new(AuthorizationState::Authorized)
        }

        /// Simulate the user changing permission in system settings
        pub fn set_authorization(&self, state: AuthorizationState) {
            *self.authorization.lock().unwrap() = state;
        }

        pub fn answer_prompt_with(&self, answer: Result<bool, DispatchError>) {
            *self.prompt_answer.lock().unwrap() = answer;
        }

        pub fn fail_tier(&self, offset_days: u32) {
            self.failing_offsets.lock().unwrap().push(offset_days);
        }

        pub fn delay_schedule(&self, delay: Duration) {
            *self.schedule_delay.lock().unwrap() = Some(delay);
        }

        /// Drop pending notifications without going through the trait
        pub fn clear_pending(&self) {
            self.pending.lock().unwrap().clear();
        }

        pub fn pending(&self) -> Vec<NotificationRequest> {
            self.pending.lock().unwrap().values().cloned().collect()
        }

        pub fn pending_ids(&self) -> Vec<String> {
            self.pending.lock().unwrap().keys().cloned().collect()
        }

        pub fn schedule_calls(&self) -> usize {
            *self.schedule_calls.lock().unwrap()
        }

        pub fn prompt_calls(&self) -> usize {
            *self.prompt_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl NotificationDispatcher for MockNotificationDispatcher {
        async fn schedule(&self, request: NotificationRequest) -> Result<(), DispatchError> {
            *self.schedule_calls.lock().unwrap() += 1;

            let delay = *self.schedule_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let failing = self.failing_offsets.lock().unwrap().clone();
            if failing
                .iter()
                .any(|offset| request.identifier.contains(&format!("-{}-", offset)))
            {
                return Err(DispatchError::Rejected(request.identifier));
            }

            self.pending
                .lock()
                .unwrap()
                .insert(request.identifier.clone(), request);
            Ok(())
        }

        async fn cancel(&self, identifiers: &[String]) -> Result<(), DispatchError> {
            let mut pending = self.pending.lock().unwrap();
            for id in identifiers {
                pending.remove(id);
            }
            Ok(())
        }

        async fn cancel_all(&self) -> Result<(), DispatchError> {
            self.pending.lock().unwrap().clear();
            Ok(())
        }

        async fn list_pending(&self) -> Result<Vec<String>, DispatchError> {
            Ok(self.pending_ids())
        }

        async fn current_authorization(&self) -> Result<AuthorizationState, DispatchError> {
            Ok(*self.authorization.lock().unwrap())
        }

        async fn request_authorization(&self) -> Result<bool, DispatchError> {
            *self.prompt_calls.lock().unwrap() += 1;
            let answer = self.prompt_answer.lock().unwrap().clone();
            if let Ok(granted) = answer {
                *self.authorization.lock().unwrap() = if granted {
                    AuthorizationState::Authorized
                } else {
                    AuthorizationState::Denied
                };
            }
            answer
        }
    }
}
