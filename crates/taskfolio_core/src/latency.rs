//! Simulated request latency.
//!
//! Operations await a `Latency` before mutating state so callers observe the
//! same suspension points a networked backend would have. Tests plug in
//! `NoLatency`.

use crate::config::LatencyConfig;
use std::future::Future;
use std::time::Duration;

/// Which operation is being delayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyKind {
    Login,
    Register,
    TaskMutation,
}

/// Awaitable delay source.
pub trait Latency {
    fn wait(&self, kind: LatencyKind) -> impl Future<Output = ()>;
}

/// Timer-backed delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub login: Duration,
    pub register: Duration,
    pub task_mutation: Duration,
}

impl SimulatedLatency {
    pub fn from_config(config: &LatencyConfig) -> Self {
        Self {
            login: Duration::from_millis(config.login_ms),
            register: Duration::from_millis(config.register_ms),
            task_mutation: Duration::from_millis(config.task_ms),
        }
    }

    pub fn duration_for(&self, kind: LatencyKind) -> Duration {
        match kind {
            LatencyKind::Login => self.login,
            LatencyKind::Register => self.register,
            LatencyKind::TaskMutation => self.task_mutation,
        }
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::from_config(&LatencyConfig::default())
    }
}

impl Latency for SimulatedLatency {
    async fn wait(&self, kind: LatencyKind) {
        let duration = self.duration_for(kind);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Resolves immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoLatency;

impl Latency for NoLatency {
    async fn wait(&self, _kind: LatencyKind) {}
}
