// Authorization State Machine
// Mirrors the dispatcher's notification permission; never invented locally.

use serde::{Deserialize, Serialize};

/// Notification permission state as reported by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationState {
    NotDetermined,
    Authorized,
    Denied,
    Provisional,
    Ephemeral,
}

impl AuthorizationState {
    /// Only these states allow reminders to be scheduled
    pub const fn permits_scheduling(self) -> bool {
        matches!(
            self,
            AuthorizationState::Authorized | AuthorizationState::Provisional
        )
    }

    /// A permission prompt may only be issued from `NotDetermined`
    pub const fn can_prompt(self) -> bool {
        matches!(self, AuthorizationState::NotDetermined)
    }

    /// Recovery requires the user to change permission outside the app
    pub const fn requires_settings(self) -> bool {
        matches!(
            self,
            AuthorizationState::Denied | AuthorizationState::Ephemeral
        )
    }
}

impl std::fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorizationState::NotDetermined => write!(f, "NOT_DETERMINED"),
            AuthorizationState::Authorized => write!(f, "AUTHORIZED"),
            AuthorizationState::Denied => write!(f, "DENIED"),
            AuthorizationState::Provisional => write!(f, "PROVISIONAL"),
            AuthorizationState::Ephemeral => write!(f, "EPHEMERAL"),
        }
    }
}

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationEvent {
    /// State read from the dispatcher (construction or poll)
    Observed(AuthorizationState),
    /// Answer to a permission prompt
    PromptAnswered { granted: bool },
}

/// Side effect the owner of the machine must carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationEffect {
    None,
    /// Entered `Denied`: every pending reminder must go
    CancelAll,
}

/// Pure transition function.
///
/// `current` is `None` before the first observation. Entering `Denied` from any
/// other state (including the initial observation) yields `CancelAll`. A prompt
/// answer is only meaningful in `NotDetermined`; anywhere else it is ignored.
pub fn transition(
    current: Option<AuthorizationState>,
    event: AuthorizationEvent,
) -> (AuthorizationState, AuthorizationEffect) {
    let next = match event {
        AuthorizationEvent::Observed(observed) => observed,
        AuthorizationEvent::PromptAnswered { granted } => match current {
            Some(AuthorizationState::NotDetermined) | None => {
                if granted {
                    AuthorizationState::Authorized
                } else {
                    AuthorizationState::Denied
                }
            }
            Some(other) => other,
        },
    };

    let effect = if next == AuthorizationState::Denied && current != Some(AuthorizationState::Denied)
    {
        AuthorizationEffect::CancelAll
    } else {
        AuthorizationEffect::None
    };

    (next, effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use AuthorizationState::*;

    #[test]
    fn test_only_authorized_and_provisional_permit_scheduling() {
        assert!(Authorized.permits_scheduling());
        assert!(Provisional.permits_scheduling());
        assert!(!NotDetermined.permits_scheduling());
        assert!(!Denied.permits_scheduling());
        assert!(!Ephemeral.permits_scheduling());
    }

    #[test]
    fn test_prompt_answer_from_not_determined() {
        let (state, effect) = transition(
            Some(NotDetermined),
            AuthorizationEvent::PromptAnswered { granted: true },
        );
        assert_eq!(state, Authorized);
        assert_eq!(effect, AuthorizationEffect::None);

        let (state, effect) = transition(
            Some(NotDetermined),
            AuthorizationEvent::PromptAnswered { granted: false },
        );
        assert_eq!(state, Denied);
        assert_eq!(effect, AuthorizationEffect::CancelAll);
    }

    #[test]
    fn test_prompt_answer_ignored_outside_not_determined() {
        for current in [Authorized, Denied, Provisional, Ephemeral] {
            let (state, effect) = transition(
                Some(current),
                AuthorizationEvent::PromptAnswered { granted: true },
            );
            assert_eq!(state, current);
            assert_eq!(effect, AuthorizationEffect::None);
        }
    }

    #[test]
    fn test_observed_revocation_cancels_once() {
        let (state, effect) = transition(Some(Authorized), AuthorizationEvent::Observed(Denied));
        assert_eq!(state, Denied);
        assert_eq!(effect, AuthorizationEffect::CancelAll);

        // Still denied on the next poll: nothing new to do
        let (_, effect) = transition(Some(Denied), AuthorizationEvent::Observed(Denied));
        assert_eq!(effect, AuthorizationEffect::None);
    }

    #[test]
    fn test_initial_denied_observation_cancels() {
        let (state, effect) = transition(None, AuthorizationEvent::Observed(Denied));
        assert_eq!(state, Denied);
        assert_eq!(effect, AuthorizationEffect::CancelAll);
    }

    #[test]
    fn test_external_recovery_from_denied() {
        let (state, effect) = transition(Some(Denied), AuthorizationEvent::Observed(Authorized));
        assert_eq!(state, Authorized);
        assert_eq!(effect, AuthorizationEffect::None);
    }
}
