use serde::{Deserialize, Serialize};

use super::command::Command;
use crate::common::{DomainError, DomainResult};
use crate::config::FleetConfig;
use crate::domains::fleet::AgentId;

/// One relative-time step of a primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveMove {
    /// Seconds after the primitive starts, at its intrinsic speed.
    pub offset: f64,
    /// Primitive-local agent index, resolved through an [`AgentMap`].
    pub agent: usize,
    pub command: Command,
}

impl PrimitiveMove {
    pub fn new(offset: f64, agent: usize, command: Command) -> Self {
        Self { offset, agent, command }
    }
}

/// A named, reusable choreography fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPrimitive")]
pub struct Primitive {
    name: String,
    moves: Vec<PrimitiveMove>,
}

#[derive(Deserialize)]
struct RawPrimitive {
    name: String,
    moves: Vec<PrimitiveMove>,
}

impl TryFrom<RawPrimitive> for Primitive {
    type Error = DomainError;

    fn try_from(raw: RawPrimitive) -> Result<Self, Self::Error> {
        Primitive::new(raw.name, raw.moves)
    }
}

impl Primitive {
    /// Validates and builds a primitive. Moves keep their authored order.
    pub fn new(name: impl Into<String>, moves: Vec<PrimitiveMove>) -> DomainResult<Self> {
        let name = name.into();
        if moves.is_empty() {
            return Err(DomainError::invalid_primitive(name, "primitive has no moves"));
        }
        for (i, mv) in moves.iter().enumerate() {
            if !mv.offset.is_finite() || mv.offset < 0.0 {
                return Err(DomainError::invalid_primitive(
                    name,
                    format!("move {} has offset {}, expected a finite value >= 0", i, mv.offset),
                ));
            }
            if let Err(reason) = mv.command.validate() {
                return Err(DomainError::invalid_primitive(name, format!("move {}: {}", i, reason)));
            }
        }
        Ok(Self { name, moves })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn moves(&self) -> &[PrimitiveMove] {
        &self.moves
    }

    /// Intrinsic duration: the largest move offset.
    pub fn basic_duration(&self) -> f64 {
        self.moves.iter().map(|m| m.offset).fold(0.0, f64::max)
    }

    /// Number of distinct local agent slots the primitive addresses.
    pub fn agent_count(&self) -> usize {
        self.moves.iter().map(|m| m.agent + 1).max().unwrap_or(0)
    }
}

/// Resolves primitive-local agent indices to fleet agent ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMap {
    slots: Vec<AgentId>,
}

impl AgentMap {
    pub fn new(slots: Vec<AgentId>) -> Self {
        Self { slots }
    }

    /// Local index `i` maps to `AgentId(i)`.
    pub fn identity(count: usize) -> Self {
        Self {
            slots: (0..count as u32).map(AgentId).collect(),
        }
    }

    /// Local index `i` maps to the `i`-th configured agent.
    pub fn from_fleet(fleet: &FleetConfig) -> Self {
        Self { slots: fleet.ids() }
    }

    pub fn resolve(&self, local: usize) -> Option<AgentId> {
        self.slots.get(local).copied()
    }

    pub fn agents(&self) -> &[AgentId] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
