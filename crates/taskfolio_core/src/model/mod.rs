//! Domain model for profiles, credentials and tasks.
//!
//! # Responsibility
//! - Define the records shared by session, task store and derivation code.
//! - Pin the persisted JSON shape (`camelCase` keys, kebab-case status).
//!
//! # Invariants
//! - A `Task` always carries the id of the profile that owns it.
//! - Passwords never leave `CredentialRecord`; profiles are password-free.

pub mod task;
pub mod user;
