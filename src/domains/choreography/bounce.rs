use serde::{Deserialize, Serialize};

use super::analysis::Beat;
use super::command::Command;
use super::primitive::AgentMap;
use super::schedule::{Schedule, ScheduleBuilder, ScheduleEntry};
use crate::common::{DomainError, DomainResult};

/// What happens to the second half of each beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescendPolicy {
    /// Rise during the first half of the beat, descend during the second.
    #[default]
    Append,
    /// Only the rise is scheduled; agents hold at the top between beats.
    Drop,
}

/// Target points for the beat bounce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceParams {
    pub x: f64,
    pub y: f64,
    pub rise_z: f64,
    pub rest_z: f64,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            x: 0.1,
            y: 0.1,
            rise_z: 0.5,
            rest_z: 0.3,
        }
    }
}

/// Every mapped agent rises for the first half of each beat and, under
/// [`DescendPolicy::Append`], descends for the second half.
pub fn generate_bounce_schedule(
    beats: &[Beat],
    agent_map: &AgentMap,
    params: &BounceParams,
    descend: DescendPolicy,
) -> DomainResult<Schedule> {
    let mut builder = ScheduleBuilder::new();
    for (index, beat) in beats.iter().enumerate() {
        if !beat.duration.is_finite() || beat.duration <= 0.0 || !beat.start.is_finite() || beat.start < 0.0 {
            return Err(DomainError::invalid_primitive(
                "bounce",
                format!("beat {} has start {} and duration {}", index, beat.start, beat.duration),
            ));
        }
        let half = beat.duration / 2.0;

        for agent in agent_map.agents() {
            builder.push(ScheduleEntry::new(
                beat.start,
                *agent,
                Command::goto(params.x, params.y, params.rise_z, half),
            ));
        }

        if descend == DescendPolicy::Append {
            for agent in agent_map.agents() {
                builder.push(ScheduleEntry::new(
                    beat.start + half,
                    *agent,
                    Command::goto(params.x, params.y, params.rest_z, half),
                ));
            }
        }
    }
    Ok(builder.build())
}
