//! Profile and credential records.

use serde::{Deserialize, Serialize};

/// Public representation of a registered user.
///
/// This is the only user shape that is persisted (under `taskUser`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Credential entry held by a credential repository.
///
/// The password is stored in plain text because the credential list is a
/// demo fixture, not an authentication backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CredentialRecord {
    /// Returns the password-stripped profile for this credential.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Exact, case-sensitive match on both email and password.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}
