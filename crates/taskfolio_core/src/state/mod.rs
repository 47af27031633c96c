//! Reducer-style state containers.
//!
//! # Responsibility
//! - Describe session and task-store state as plain values.
//! - Provide exhaustive `apply(state, event) -> state` transition functions.
//!
//! # Invariants
//! - Reducers are pure: no I/O, no clock, no notifications.
//! - Services compute the next state, persist it, and only then commit it.

pub mod session;
pub mod tasks;
