//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate latency, repository lookups, reducers, persistence and
//!   notifications into caller-facing operations.
//! - Keep UI collaborators decoupled from storage details.

pub mod auth_service;
pub mod task_service;
