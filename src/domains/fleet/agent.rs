use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable agent identifier assigned in the fleet configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(value: u32) -> Self {
        AgentId(value)
    }
}

/// One configured member of the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: AgentId,
    pub name: String,
    /// Link address used by the hardware layer, e.g. `radio://0/10/2M/E7E7E7E701`.
    #[serde(default)]
    pub uri: String,
}

impl AgentConfig {
    pub fn new(id: u32, name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: AgentId(id),
            name: name.into(),
            uri: uri.into(),
        }
    }
}
