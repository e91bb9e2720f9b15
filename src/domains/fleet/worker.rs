use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::agent::AgentId;
use super::ports::Actuator;
use crate::domains::choreography::Command;
use crate::domains::logger::DynLogger;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub agent: AgentId,
    pub executed: usize,
    pub skipped: usize,
    pub quit_received: bool,
}

/// Executes one agent's commands in arrival order until it receives quit.
pub struct AgentWorker {
    agent: AgentId,
    queue: mpsc::UnboundedReceiver<Command>,
    actuator: Arc<dyn Actuator>,
    logger: DynLogger,
}

impl AgentWorker {
    pub fn new(
        agent: AgentId,
        queue: mpsc::UnboundedReceiver<Command>,
        actuator: Arc<dyn Actuator>,
        logger: DynLogger,
    ) -> Self {
        Self {
            agent,
            queue,
            actuator,
            logger,
        }
    }

    pub async fn run(mut self) -> WorkerReport {
        let mut report = WorkerReport {
            agent: self.agent,
            executed: 0,
            skipped: 0,
            quit_received: false,
        };

        while let Some(command) = self.queue.recv().await {
            if command == Command::Quit {
                report.quit_received = true;
                break;
            }

            if !self.actuator.supports(command.kind()) {
                self.logger.warn(&format!(
                    "Unknown command {} for agent {}; skipping",
                    command, self.agent
                ));
                report.skipped += 1;
                continue;
            }

            tracing::debug!(agent = %self.agent, command = %command, "executing");
            self.execute(&command).await;
            report.executed += 1;
        }

        if !report.quit_received {
            self.logger.warn(&format!(
                "Queue for agent {} closed before quit; stopping worker",
                self.agent
            ));
        }
        tracing::debug!(agent = %self.agent, executed = report.executed, skipped = report.skipped, "worker finished");
        report
    }

    async fn execute(&self, command: &Command) {
        match *command {
            Command::Takeoff { height, duration } => self.actuator.takeoff(height, duration).await,
            Command::Land { duration } => self.actuator.land(duration).await,
            Command::Goto { x, y, z, duration } => self.actuator.goto_point(x, y, z, duration).await,
            Command::Ring { color, duration } => self.actuator.set_ring(color, duration).await,
            Command::Quit => {}
        }
    }
}
