//! Credential repository contract and in-memory implementation.
//!
//! # Invariants
//! - Email comparison is exact and case-sensitive.
//! - New credential ids are `count + 1` rendered as a string. Ids are not
//!   guaranteed unique if records are ever removed or inserted concurrently.
//! - A poisoned lock surfaces as `StorageError::Poisoned`, same as the
//!   key-value backends.

use crate::model::user::CredentialRecord;
use crate::storage::{StorageError, StorageResult};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Demo account seeded into every in-memory repository.
pub const DEMO_USER_ID: &str = "1";
pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_EMAIL: &str = "demo@example.com";
pub const DEMO_USER_PASSWORD: &str = "password123";

/// Credential lookup and registration capability.
pub trait CredentialRepository {
    /// Returns the record matching both email and password exactly.
    fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> StorageResult<Option<CredentialRecord>>;
    /// Returns the record registered under `email`, if any.
    fn find_by_email(&self, email: &str) -> StorageResult<Option<CredentialRecord>>;
    /// Appends a new record and returns it with its assigned id.
    fn insert(&self, name: &str, email: &str, password: &str) -> StorageResult<CredentialRecord>;
    fn count(&self) -> StorageResult<usize>;
}

/// Process-local credential list.
///
/// Clones share the same list.
#[derive(Clone, Debug)]
pub struct InMemoryCredentialRepository {
    records: Arc<RwLock<Vec<CredentialRecord>>>,
}

impl InMemoryCredentialRepository {
    /// Repository containing only the demo account.
    pub fn with_demo_account() -> Self {
        Self::from_records(vec![CredentialRecord {
            id: DEMO_USER_ID.to_string(),
            name: DEMO_USER_NAME.to_string(),
            email: DEMO_USER_EMAIL.to_string(),
            password: DEMO_USER_PASSWORD.to_string(),
        }])
    }

    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn from_records(records: Vec<CredentialRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

impl Default for InMemoryCredentialRepository {
    fn default() -> Self {
        Self::with_demo_account()
    }
}

impl InMemoryCredentialRepository {
    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Vec<CredentialRecord>>> {
        self.records.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Vec<CredentialRecord>>> {
        self.records.write().map_err(|_| StorageError::Poisoned)
    }
}

impl CredentialRepository for InMemoryCredentialRepository {
    fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> StorageResult<Option<CredentialRecord>> {
        Ok(self
            .read()?
            .iter()
            .find(|record| record.matches(email, password))
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> StorageResult<Option<CredentialRecord>> {
        Ok(self
            .read()?
            .iter()
            .find(|record| record.email == email)
            .cloned())
    }

    fn insert(&self, name: &str, email: &str, password: &str) -> StorageResult<CredentialRecord> {
        let mut records = self.write()?;
        let record = CredentialRecord {
            id: (records.len() + 1).to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        records.push(record.clone());
        Ok(record)
    }

    fn count(&self) -> StorageResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_account_is_seeded() {
        let repo = InMemoryCredentialRepository::with_demo_account();
        assert_eq!(repo.count().unwrap(), 1);

        let record = repo
            .find_by_credentials(DEMO_USER_EMAIL, DEMO_USER_PASSWORD)
            .unwrap()
            .unwrap();
        assert_eq!(record.name, DEMO_USER_NAME);
        assert!(repo
            .find_by_credentials(DEMO_USER_EMAIL, "wrongpass")
            .unwrap()
            .is_none());
    }

    #[test]
    fn insert_assigns_count_plus_one_id() {
        let repo = InMemoryCredentialRepository::with_demo_account();
        let record = repo.insert("Ada", "ada@example.com", "secret").unwrap();
        assert_eq!(record.id, "2");
        assert_eq!(repo.count().unwrap(), 2);
        assert_eq!(repo.find_by_email("ada@example.com").unwrap(), Some(record));
    }

    #[test]
    fn email_lookup_is_case_sensitive() {
        let repo = InMemoryCredentialRepository::with_demo_account();
        assert!(repo.find_by_email("Demo@Example.com").unwrap().is_none());
    }

    #[test]
    fn clones_share_records() {
        let repo = InMemoryCredentialRepository::empty();
        let alias = repo.clone();
        alias.insert("Bo", "bo@example.com", "pw").unwrap();
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn poisoned_lock_is_reported_as_storage_error() {
        let repo = InMemoryCredentialRepository::with_demo_account();
        let alias = repo.clone();
        let _ = std::thread::spawn(move || {
            let _guard = alias.records.write().unwrap();
            panic!("poison the credential lock");
        })
        .join();

        assert!(matches!(repo.count(), Err(StorageError::Poisoned)));
        assert!(matches!(
            repo.insert("Ada", "ada@example.com", "secret"),
            Err(StorageError::Poisoned)
        ));
    }
}
