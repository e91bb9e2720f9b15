use async_trait::async_trait;

use super::agent::AgentConfig;
use crate::domains::choreography::{CommandKind, RingColor};

/// Hardware-facing capability that turns commands into motion.
///
/// Calls are fire-and-forget from the dispatch core's point of view; any queuing,
/// acknowledgement or retry belongs to the implementation.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn takeoff(&self, height: f64, duration: f64);

    async fn land(&self, duration: f64);

    async fn goto_point(&self, x: f64, y: f64, z: f64, duration: f64);

    async fn set_ring(&self, _color: RingColor, _duration: f64) {}

    /// Whether this actuator can execute commands of `kind`. LED rings are opt-in.
    fn supports(&self, kind: CommandKind) -> bool {
        kind != CommandKind::Ring
    }
}

/// Blocks until an agent's position estimate is usable.
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    async fn wait_until_ready(&self, agent: &AgentConfig) -> Result<(), String>;
}
