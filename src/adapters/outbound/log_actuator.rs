use async_trait::async_trait;

use crate::domains::choreography::{CommandKind, RingColor};
use crate::domains::fleet::{Actuator, AgentConfig, AgentId};

/// Dry-run actuator: every call is logged and nothing moves.
pub struct LogActuator {
    agent: AgentId,
    name: String,
    ring: bool,
}

impl LogActuator {
    pub fn new(agent: &AgentConfig) -> Self {
        Self {
            agent: agent.id,
            name: agent.name.clone(),
            ring: false,
        }
    }

    /// Pretend the agent carries an LED ring.
    pub fn with_ring(mut self) -> Self {
        self.ring = true;
        self
    }
}

#[async_trait]
impl Actuator for LogActuator {
    async fn takeoff(&self, height: f64, duration: f64) {
        tracing::info!(agent = %self.agent, name = %self.name, height, duration, "takeoff");
    }

    async fn land(&self, duration: f64) {
        tracing::info!(agent = %self.agent, name = %self.name, duration, "land");
    }

    async fn goto_point(&self, x: f64, y: f64, z: f64, duration: f64) {
        tracing::info!(agent = %self.agent, name = %self.name, x, y, z, duration, "goto");
    }

    async fn set_ring(&self, color: RingColor, duration: f64) {
        tracing::info!(agent = %self.agent, name = %self.name, color = format!("#{:06x}", color.packed()), duration, "ring");
    }

    fn supports(&self, kind: CommandKind) -> bool {
        kind != CommandKind::Ring || self.ring
    }
}
