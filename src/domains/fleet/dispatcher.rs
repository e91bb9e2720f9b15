use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};

use super::agent::AgentId;
use crate::domains::choreography::{Command, Schedule};

/// Float slack when comparing entry times against tick boundaries.
pub const TIME_TOLERANCE: f64 = 1e-9;

/// Shortest tick the dispatcher will run with.
pub const MIN_TICK_WIDTH: Duration = Duration::from_millis(1);

pub type AgentQueues = BTreeMap<AgentId, mpsc::UnboundedSender<Command>>;
pub type AgentInboxes = BTreeMap<AgentId, mpsc::UnboundedReceiver<Command>>;

/// Creates one unbounded FIFO per agent.
pub fn agent_queues(agents: impl IntoIterator<Item = AgentId>) -> (AgentQueues, AgentInboxes) {
    let mut senders = BTreeMap::new();
    let mut receivers = BTreeMap::new();
    for agent in agents {
        let (tx, rx) = mpsc::unbounded_channel();
        senders.insert(agent, tx);
        receivers.insert(agent, rx);
    }
    (senders, receivers)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Running,
    Draining,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    ScheduleExhausted,
    Aborted,
}

/// One command handed to an agent queue.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRecord {
    pub step: u64,
    pub agent: AgentId,
    pub command: Command,
}

#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub final_step: u64,
    pub outcome: RunOutcome,
    pub records: Vec<DispatchRecord>,
    /// Sends that failed because the agent had no open queue.
    pub undeliverable: usize,
}

impl DispatchReport {
    pub fn commands_for(&self, agent: AgentId) -> Vec<&Command> {
        self.records
            .iter()
            .filter(|r| r.agent == agent)
            .map(|r| &r.command)
            .collect()
    }

    /// Delivered schedule entries, excluding the closing quits.
    pub fn delivered(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.command != Command::Quit)
            .count()
    }
}

/// External cancellation for a running dispatcher.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl AbortHandle {
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { sender: Arc::new(tx) }, rx)
    }

    pub fn abort(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

/// Delivers schedule entries to agent queues on a fixed tick.
///
/// At step `n` every entry with `time <= n * tick_width` that has not been sent yet is
/// pushed to its agent's queue. When the schedule is exhausted, or the abort handle
/// fires, every queue receives a final [`Command::Quit`].
pub struct Dispatcher {
    schedule: Schedule,
    queues: AgentQueues,
    tick_width: Duration,
    abort: watch::Receiver<bool>,
    state: DispatcherState,
    pointer: usize,
    step: u64,
    records: Vec<DispatchRecord>,
    undeliverable: usize,
}

impl Dispatcher {
    pub fn new(
        schedule: Schedule,
        queues: AgentQueues,
        tick_width: Duration,
        abort: watch::Receiver<bool>,
    ) -> Self {
        Self {
            records: Vec::with_capacity(schedule.len() + queues.len()),
            schedule,
            queues,
            tick_width: tick_width.max(MIN_TICK_WIDTH),
            abort,
            state: DispatcherState::Running,
            pointer: 0,
            step: 0,
            undeliverable: 0,
        }
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn is_exhausted(&self) -> bool {
        self.pointer >= self.schedule.len()
    }

    /// Sends every entry due at the current step; returns how many were sent.
    pub fn dispatch_due(&mut self) -> usize {
        let now = self.step as f64 * self.tick_width.as_secs_f64();
        let mut sent = 0;

        while let Some(entry) = self.schedule.get(self.pointer) {
            if entry.time > now + TIME_TOLERANCE {
                break;
            }
            match self.queues.get(&entry.agent) {
                Some(queue) if queue.send(entry.command.clone()).is_ok() => {
                    tracing::debug!(step = self.step, agent = %entry.agent, command = %entry.command, "dispatched");
                    self.records.push(DispatchRecord {
                        step: self.step,
                        agent: entry.agent,
                        command: entry.command.clone(),
                    });
                    sent += 1;
                }
                _ => {
                    tracing::warn!(agent = %entry.agent, command = %entry.command, "no open queue for agent; entry dropped");
                    self.undeliverable += 1;
                }
            }
            self.pointer += 1;
        }
        sent
    }

    /// Ticks until the schedule is exhausted or an abort arrives, then broadcasts quit.
    pub async fn run(mut self) -> DispatchReport {
        let mut abort = self.abort.clone();
        let mut ticker = time::interval(self.tick_width);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = wait_for_abort(&mut abort) => break RunOutcome::Aborted,
                _ = ticker.tick() => {}
            }

            let sent = self.dispatch_due();
            tracing::trace!(step = self.step, sent, pointer = self.pointer, "tick");

            if self.is_exhausted() {
                break RunOutcome::ScheduleExhausted;
            }
            self.step += 1;
        };

        match outcome {
            RunOutcome::ScheduleExhausted => tracing::info!(step = self.step, "reached the end of the schedule"),
            RunOutcome::Aborted => tracing::warn!(
                step = self.step,
                remaining = self.schedule.len() - self.pointer,
                "dispatch aborted"
            ),
        }
        self.drain();

        DispatchReport {
            final_step: self.step,
            outcome,
            records: self.records,
            undeliverable: self.undeliverable,
        }
    }

    fn drain(&mut self) {
        self.state = DispatcherState::Draining;
        for (agent, queue) in &self.queues {
            if queue.send(Command::Quit).is_err() {
                tracing::warn!(agent = %agent, "worker queue already closed; quit not delivered");
                self.undeliverable += 1;
                continue;
            }
            self.records.push(DispatchRecord {
                step: self.step,
                agent: *agent,
                command: Command::Quit,
            });
        }
        self.state = DispatcherState::Stopped;
    }
}

async fn wait_for_abort(abort: &mut watch::Receiver<bool>) {
    loop {
        if *abort.borrow_and_update() {
            return;
        }
        if abort.changed().await.is_err() {
            // Handle dropped without aborting: never fires.
            std::future::pending::<()>().await;
        }
    }
}
