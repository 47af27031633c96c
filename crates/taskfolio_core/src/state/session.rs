//! Authentication session state machine.

use crate::model::user::UserProfile;

/// Where the session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Persisted session has not been inspected yet.
    Unknown,
    Anonymous,
    Authenticated(UserProfile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// True until restore completes and while a login/register is pending.
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Unknown,
            is_loading: true,
        }
    }
}

impl SessionState {
    pub fn current_user(&self) -> Option<&UserProfile> {
        match &self.phase {
            SessionPhase::Authenticated(profile) => Some(profile),
            SessionPhase::Unknown | SessionPhase::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Startup read of the persisted profile finished.
    Restored(Option<UserProfile>),
    /// Login or registration is in flight.
    RequestStarted,
    /// Login or registration was rejected; phase is kept.
    RequestFailed,
    SignedIn(UserProfile),
    SignedOut,
}

/// Applies one event.
pub fn apply(state: &SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::Restored(Some(profile)) => SessionState {
            phase: SessionPhase::Authenticated(profile),
            is_loading: false,
        },
        SessionEvent::Restored(None) => SessionState {
            phase: SessionPhase::Anonymous,
            is_loading: false,
        },
        SessionEvent::RequestStarted => SessionState {
            phase: state.phase.clone(),
            is_loading: true,
        },
        SessionEvent::RequestFailed => SessionState {
            phase: state.phase.clone(),
            is_loading: false,
        },
        SessionEvent::SignedIn(profile) => SessionState {
            phase: SessionPhase::Authenticated(profile),
            is_loading: false,
        },
        SessionEvent::SignedOut => SessionState {
            phase: SessionPhase::Anonymous,
            is_loading: false,
        },
    }
}
