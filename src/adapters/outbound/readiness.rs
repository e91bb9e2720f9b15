use async_trait::async_trait;

use crate::domains::fleet::{AgentConfig, ReadinessCheck};

/// Readiness check for dry runs: every agent is immediately ready.
pub struct AlwaysReady;

#[async_trait]
impl ReadinessCheck for AlwaysReady {
    async fn wait_until_ready(&self, agent: &AgentConfig) -> Result<(), String> {
        tracing::debug!(agent = %agent.id, name = %agent.name, "readiness assumed");
        Ok(())
    }
}
