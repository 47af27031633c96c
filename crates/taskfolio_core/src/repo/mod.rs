//! Repository abstractions for account data.
//!
//! # Responsibility
//! - Define use-case oriented lookup/insert contracts for credentials.
//! - Keep storage choice out of the session state machine so tests can
//!   inject a fresh fake instead of sharing global state.

pub mod credential_repo;
