// Authorization Gate
// Tracks the dispatcher's permission state and decides whether scheduling is allowed.
// Side effects (cancel-all on entering Denied) are returned to the caller.

use crate::domain::authorization::transition;
use crate::domain::{AuthorizationEffect, AuthorizationEvent, AuthorizationState};
use crate::error::{AppError, Result};
use crate::port::NotificationDispatcher;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Outcome of an observation or a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateUpdate {
    pub state: AuthorizationState,
    pub effect: AuthorizationEffect,
}

pub struct AuthorizationGate {
    dispatcher: Arc<dyn NotificationDispatcher>,
    /// `None` until the first observation
    state: watch::Sender<Option<AuthorizationState>>,
    /// At most one prompt in flight
    prompt: Mutex<()>,
}

impl AuthorizationGate {
    pub fn new(dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            dispatcher,
            state,
            prompt: Mutex::new(()),
        }
    }

    /// Build the gate and take the initial observation from the dispatcher
    pub async fn connect(dispatcher: Arc<dyn NotificationDispatcher>) -> Result<(Self, GateUpdate)> {
        let gate = Self::new(dispatcher);
        let update = gate.refresh().await?;
        Ok((gate, update))
    }

    /// Last known state (`NotDetermined` before the first observation)
    pub fn state(&self) -> AuthorizationState {
        self.state
            .borrow()
            .unwrap_or(AuthorizationState::NotDetermined)
    }

    pub fn permits_scheduling(&self) -> bool {
        self.state().permits_scheduling()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthorizationState>> {
        self.state.subscribe()
    }

    /// Re-read the permission from the dispatcher
    pub async fn refresh(&self) -> Result<GateUpdate> {
        let observed = self.dispatcher.current_authorization().await?;
        Ok(self.apply(AuthorizationEvent::Observed(observed)))
    }

    /// Prompt for permission if, and only if, the state is `NotDetermined`.
    /// From any other state this returns the current state without prompting.
    pub async fn request(&self) -> Result<GateUpdate> {
        let _prompt = self.prompt.lock().await;

        let update = self.refresh().await?;
        if !update.state.can_prompt() {
            debug!(state = %update.state, "Permission already decided, not prompting");
            return Ok(update);
        }

        match self.dispatcher.request_authorization().await {
            Ok(granted) => {
                let update = self.apply(AuthorizationEvent::PromptAnswered { granted });
                info!(state = %update.state, granted, "Permission prompt answered");
                Ok(update)
            }
            Err(e) => {
                warn!(error = %e, "Permission prompt failed");
                Err(AppError::PermissionRequestFailed(e.to_string()))
            }
        }
    }

    fn apply(&self, event: AuthorizationEvent) -> GateUpdate {
        let mut update = GateUpdate {
            state: AuthorizationState::NotDetermined,
            effect: AuthorizationEffect::None,
        };
        self.state.send_modify(|current| {
            let previous = *current;
            let (next, effect) = transition(previous, event);
            *current = Some(next);
            update = GateUpdate {
                state: next,
                effect,
            };
            if previous != Some(next) {
                info!(from = ?previous, to = %next, "Authorization state changed");
            }
        });
        update
    }
}
