use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domains::choreography::{Command, CommandKind, RingColor};
use crate::domains::fleet::Actuator;

/// Keeps every executed call, in order, as the equivalent [`Command`].
///
/// Clones share the same call log, so a test can keep one handle and give another to
/// the worker.
#[derive(Clone, Default)]
pub struct RecordingActuator {
    calls: Arc<Mutex<Vec<Command>>>,
    latency: Option<Duration>,
    ring: bool,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each call sleeps for `latency` before it is recorded, like a slow link.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_ring(mut self) -> Self {
        self.ring = true;
        self
    }

    pub fn calls(&self) -> Vec<Command> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    async fn record(&self, command: Command) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.calls.lock() {
            Ok(mut calls) => calls.push(command),
            Err(poisoned) => poisoned.into_inner().push(command),
        }
    }
}

#[async_trait]
impl Actuator for RecordingActuator {
    async fn takeoff(&self, height: f64, duration: f64) {
        self.record(Command::Takeoff { height, duration }).await;
    }

    async fn land(&self, duration: f64) {
        self.record(Command::Land { duration }).await;
    }

    async fn goto_point(&self, x: f64, y: f64, z: f64, duration: f64) {
        self.record(Command::goto(x, y, z, duration)).await;
    }

    async fn set_ring(&self, color: RingColor, duration: f64) {
        self.record(Command::Ring { color, duration }).await;
    }

    fn supports(&self, kind: CommandKind) -> bool {
        kind != CommandKind::Ring || self.ring
    }
}
