use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::command::Command;
use crate::common::{DomainError, DomainResult};
use crate::domains::fleet::AgentId;

/// A command bound to an agent and an absolute time in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub time: f64,
    pub agent: AgentId,
    pub command: Command,
}

impl ScheduleEntry {
    pub fn new(time: f64, agent: AgentId, command: Command) -> Self {
        Self { time, agent, command }
    }

    /// When the commanded motion is expected to be finished.
    pub fn completion_time(&self) -> f64 {
        self.time + self.command.duration().unwrap_or(0.0)
    }
}

/// Takeoff performed by every agent before the choreography starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakeoffFraming {
    pub height: f64,
    pub duration: f64,
}

/// Landing performed by every agent once the last motion completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingFraming {
    pub duration: f64,
}

/// Consecutive gotos for one agent that require more than the allowed speed.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedViolation {
    pub agent: AgentId,
    pub time: f64,
    pub distance: f64,
    pub speed: f64,
}

/// Accumulates entries in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    entries: Vec<ScheduleEntry>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = ScheduleEntry>) {
        self.entries.extend(entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable sort by time; equal times keep insertion order.
    pub fn build(mut self) -> Schedule {
        self.entries.sort_by_key(|e| OrderedFloat(e.time));
        Schedule { entries: self.entries }
    }
}

/// Time-ordered commands for every agent in one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScheduleEntry> {
        self.entries.get(index)
    }

    pub fn agents(&self) -> BTreeSet<AgentId> {
        self.entries.iter().map(|e| e.agent).collect()
    }

    pub fn entries_for(&self, agent: AgentId) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(move |e| e.agent == agent)
    }

    /// Latest completion time over all entries, zero when empty.
    pub fn end_time(&self) -> f64 {
        self.entries
            .iter()
            .map(ScheduleEntry::completion_time)
            .fold(0.0, f64::max)
    }

    /// Fails with `UnknownAgent` if an entry targets an agent outside `fleet`.
    pub fn ensure_agents(&self, fleet: &[AgentId]) -> DomainResult<()> {
        let known: BTreeSet<AgentId> = fleet.iter().copied().collect();
        match self.agents().into_iter().find(|a| !known.contains(a)) {
            Some(agent) => Err(DomainError::UnknownAgent { agent: agent.value() }),
            None => Ok(()),
        }
    }

    /// Adds a takeoff lead-in and a landing tail for each of `agents`.
    ///
    /// With a takeoff every existing entry moves later by the takeoff duration, so the
    /// first motion command never overlaps the climb.
    pub fn framed(
        self,
        agents: &[AgentId],
        takeoff: Option<TakeoffFraming>,
        landing: Option<LandingFraming>,
    ) -> Schedule {
        let mut builder = ScheduleBuilder::new();
        let shift = takeoff.map(|t| t.duration).unwrap_or(0.0);

        if let Some(t) = takeoff {
            for agent in agents {
                builder.push(ScheduleEntry::new(
                    0.0,
                    *agent,
                    Command::Takeoff { height: t.height, duration: t.duration },
                ));
            }
        }

        let end = if self.is_empty() { shift } else { self.end_time() + shift };
        builder.extend(self.entries.into_iter().map(|mut e| {
            e.time += shift;
            e
        }));

        if let Some(l) = landing {
            for agent in agents {
                builder.push(ScheduleEntry::new(end, *agent, Command::Land { duration: l.duration }));
            }
        }
        builder.build()
    }

    /// Pairs of consecutive gotos whose straight-line speed exceeds `max_speed`.
    pub fn speed_violations(&self, max_speed: f64) -> Vec<SpeedViolation> {
        let mut last_target: BTreeMap<AgentId, (f64, f64, f64)> = BTreeMap::new();
        let mut violations = Vec::new();

        for entry in &self.entries {
            if let Command::Goto { x, y, z, duration } = entry.command {
                if let Some((px, py, pz)) = last_target.insert(entry.agent, (x, y, z)) {
                    let distance = ((x - px).powi(2) + (y - py).powi(2) + (z - pz).powi(2)).sqrt();
                    let speed = distance / duration;
                    if speed > max_speed {
                        violations.push(SpeedViolation {
                            agent: entry.agent,
                            time: entry.time,
                            distance,
                            speed,
                        });
                    }
                }
            }
        }
        violations
    }

    pub fn to_json_pretty(&self) -> DomainResult<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduleEntry;
    type IntoIter = std::slice::Iter<'a, ScheduleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
