//! Authentication session manager.
//!
//! # Responsibility
//! - Own the current session state (`Unknown → Anonymous | Authenticated`).
//! - Run login/register against a credential repository after simulated latency.
//! - Mirror the logged-in profile to `taskUser` and restore it on startup.
//!
//! # Invariants
//! - Only password-free profiles are persisted or exposed.
//! - Every login/register/logout emits exactly one notification.
//! - A failed operation leaves the session phase unchanged.
//! - Malformed persisted profiles are discarded, never fatal.

use crate::latency::{Latency, LatencyKind};
use crate::model::user::UserProfile;
use crate::notify::{Notification, NotificationSink};
use crate::repo::credential_repo::CredentialRepository;
use crate::state::session::{self, SessionEvent, SessionState};
use crate::storage::{read_json, write_json, JsonRead, KeyValueStore, StorageError, SESSION_KEY};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Login/registration failures.
#[derive(Debug)]
pub enum AuthError {
    /// No credential matches the email/password pair.
    InvalidCredentials,
    /// Registration email is already taken (exact match).
    EmailAlreadyInUse,
    /// Persisting the profile failed.
    Storage(StorageError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::EmailAlreadyInUse => write!(f, "Email already in use"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::InvalidCredentials | Self::EmailAlreadyInUse => None,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::EmailAlreadyInUse => "email_in_use",
            Self::Storage(_) => "storage_failed",
        }
    }
}

/// Session manager over injected storage, credentials, latency and notifier.
pub struct SessionManager<S, C, L, N> {
    store: S,
    credentials: C,
    latency: L,
    notifier: N,
    state: SessionState,
}

impl<S, C, L, N> SessionManager<S, C, L, N>
where
    S: KeyValueStore,
    C: CredentialRepository,
    L: Latency,
    N: NotificationSink,
{
    /// Creates a manager in the `Unknown` phase; call `restore` next.
    pub fn new(store: S, credentials: C, latency: L, notifier: N) -> Self {
        Self {
            store,
            credentials,
            latency,
            notifier,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.state.current_user()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Restores the persisted profile, if any.
    ///
    /// Malformed data is removed and reported with an error notification;
    /// backend read failures are treated as "no session".
    pub fn restore(&mut self) -> Option<&UserProfile> {
        let restored = match read_json::<UserProfile>(&self.store, SESSION_KEY) {
            Ok(JsonRead::Parsed(profile)) => {
                info!(
                    "event=session_restore module=auth status=ok user_id={}",
                    profile.id
                );
                Some(profile)
            }
            Ok(JsonRead::Missing) => {
                info!("event=session_restore module=auth status=ok user_id=none");
                None
            }
            Ok(JsonRead::Malformed(err)) => {
                warn!(
                    "event=session_restore module=auth status=error error_code=malformed_profile error={}",
                    err
                );
                if let Err(remove_err) = self.store.remove(SESSION_KEY) {
                    warn!(
                        "event=session_clear module=auth status=error error={}",
                        remove_err
                    );
                }
                self.notifier.notify(Notification::error(
                    "Session restore failed",
                    "Your saved session could not be read. Please log in again.",
                ));
                None
            }
            Err(err) => {
                warn!(
                    "event=session_restore module=auth status=error error_code=storage_failed error={}",
                    err
                );
                None
            }
        };
        self.dispatch(SessionEvent::Restored(restored));
        self.current_user()
    }

    /// Logs in with an exact email + password match.
    ///
    /// # Errors
    /// - `InvalidCredentials` when nothing matches.
    /// - `Storage` when the credential lookup or the profile write fails.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let started_at = Instant::now();
        self.dispatch(SessionEvent::RequestStarted);
        self.latency.wait(LatencyKind::Login).await;

        let result = match self.credentials.find_by_credentials(email, password) {
            Ok(Some(record)) => self.sign_in(record.profile()),
            Ok(None) => Err(AuthError::InvalidCredentials),
            Err(err) => Err(AuthError::Storage(err)),
        };

        match &result {
            Ok(profile) => {
                info!(
                    "event=login module=auth status=ok user_id={} duration_ms={}",
                    profile.id,
                    started_at.elapsed().as_millis()
                );
                self.notifier.notify(Notification::success(
                    "Login successful",
                    format!("Welcome back, {}!", profile.name),
                ));
            }
            Err(err) => self.fail("login", "Login failed", err, started_at),
        }
        result
    }

    /// Registers a new account and signs it in.
    ///
    /// # Errors
    /// - `EmailAlreadyInUse` when the email is registered (case-sensitive).
    /// - `Storage` when the profile cannot be persisted; the credential stays
    ///   registered in that case.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let started_at = Instant::now();
        self.dispatch(SessionEvent::RequestStarted);
        self.latency.wait(LatencyKind::Register).await;

        let result = match self.credentials.find_by_email(email) {
            Ok(Some(_)) => Err(AuthError::EmailAlreadyInUse),
            Ok(None) => match self.credentials.insert(name, email, password) {
                Ok(record) => self.sign_in(record.profile()),
                Err(err) => Err(AuthError::Storage(err)),
            },
            Err(err) => Err(AuthError::Storage(err)),
        };

        match &result {
            Ok(profile) => {
                info!(
                    "event=register module=auth status=ok user_id={} duration_ms={}",
                    profile.id,
                    started_at.elapsed().as_millis()
                );
                self.notifier.notify(Notification::success(
                    "Registration successful",
                    format!("Welcome, {}!", profile.name),
                ));
            }
            Err(err) => self.fail("register", "Registration failed", err, started_at),
        }
        result
    }

    /// Ends the session. Always succeeds; a failed key removal is only logged.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.remove(SESSION_KEY) {
            warn!(
                "event=logout module=auth status=error error_code=storage_failed error={}",
                err
            );
        }
        self.dispatch(SessionEvent::SignedOut);
        info!("event=logout module=auth status=ok");
        self.notifier
            .notify(Notification::success_title("Logged out successfully"));
    }

    fn sign_in(&mut self, profile: UserProfile) -> Result<UserProfile, AuthError> {
        write_json(&self.store, SESSION_KEY, &profile)?;
        self.dispatch(SessionEvent::SignedIn(profile.clone()));
        Ok(profile)
    }

    fn fail(&mut self, event: &str, title: &str, err: &AuthError, started_at: Instant) {
        self.dispatch(SessionEvent::RequestFailed);
        warn!(
            "event={} module=auth status=error error_code={} duration_ms={}",
            event,
            err.code(),
            started_at.elapsed().as_millis()
        );
        self.notifier
            .notify(Notification::error(title, err.to_string()));
    }

    fn dispatch(&mut self, event: SessionEvent) {
        self.state = session::apply(&self.state, event);
    }
}
