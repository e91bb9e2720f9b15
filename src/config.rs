use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{bail, Result};

use crate::domains::choreography::{
    BounceParams, Command, DescendPolicy, LandingFraming, SelectionPolicy, TakeoffFraming,
};
use crate::domains::fleet::{AgentConfig, AgentId};

/// Prefix for environment overrides, e.g. `SWARM_CHOREO__DISPATCH__TICK_WIDTH_SECS=0.5`.
pub const ENV_PREFIX: &str = "SWARM_CHOREO";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dispatch: DispatchConfig,
    pub fleet: FleetConfig,
    pub choreography: ChoreographyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub tick_width_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub agents: Vec<AgentConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreographyMode {
    /// One primitive per analysis section.
    #[default]
    Sections,
    /// Rise and descend on every beat.
    Beats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub policy: SelectionPolicy,
    /// Candidates for the cycle and random policies.
    pub primitives: Vec<String>,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographyConfig {
    pub analysis_path: PathBuf,
    pub mode: ChoreographyMode,
    pub default_primitive: String,
    pub selection: SelectionConfig,
    pub descend_policy: DescendPolicy,
    pub bounce: BounceParams,
    pub takeoff: Option<TakeoffFraming>,
    pub landing: Option<LandingFraming>,
    /// Upper bound in m/s used to lint consecutive gotos.
    pub max_speed: Option<f64>,
    pub primitive_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub buffer_capacity: usize,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layers an optional TOML file under environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dispatch.tick_width_secs.is_finite() && self.dispatch.tick_width_secs > 0.0) {
            bail!("dispatch.tick_width_secs must be > 0, got {}", self.dispatch.tick_width_secs);
        }
        self.dispatch.tick_width()?;
        if self.fleet.agents.is_empty() {
            bail!("fleet.agents must name at least one agent");
        }
        let mut seen = HashSet::new();
        for agent in &self.fleet.agents {
            if !seen.insert(agent.id) {
                bail!("fleet.agents contains duplicate id {}", agent.id);
            }
        }
        if let Some(max_speed) = self.choreography.max_speed {
            if !(max_speed.is_finite() && max_speed > 0.0) {
                bail!("choreography.max_speed must be > 0, got {}", max_speed);
            }
        }
        // Framing commands obey the same payload rules as authored ones.
        if let Some(takeoff) = self.choreography.takeoff {
            let command = Command::Takeoff { height: takeoff.height, duration: takeoff.duration };
            if let Err(reason) = command.validate() {
                bail!("choreography.takeoff is invalid: {}", reason);
            }
        }
        if let Some(landing) = self.choreography.landing {
            if let Err(reason) = (Command::Land { duration: landing.duration }).validate() {
                bail!("choreography.landing is invalid: {}", reason);
            }
        }
        Ok(())
    }
}

impl DispatchConfig {
    /// Fails when the width does not fit in a `Duration`.
    pub fn tick_width(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.tick_width_secs).map_err(|e| {
            anyhow::anyhow!("dispatch.tick_width_secs = {} is not a usable tick: {}", self.tick_width_secs, e)
        })
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { tick_width_secs: 0.1 }
    }
}

impl FleetConfig {
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(|a| a.id).collect()
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.id == id)
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        let agents = (0..9u32)
            .map(|i| {
                AgentConfig::new(
                    i,
                    format!("cf{}", i),
                    format!("radio://0/10/2M/E7E7E7E7{:02X}", i + 1),
                )
            })
            .collect();
        Self { agents }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::Fixed,
            primitives: vec![
                "kickline".to_string(),
                "wave".to_string(),
                "rotating_tower".to_string(),
            ],
            seed: 0,
        }
    }
}

impl Default for ChoreographyConfig {
    fn default() -> Self {
        Self {
            analysis_path: PathBuf::from("audio_analysis.json"),
            mode: ChoreographyMode::Sections,
            default_primitive: "kickline".to_string(),
            selection: SelectionConfig::default(),
            descend_policy: DescendPolicy::Append,
            bounce: BounceParams::default(),
            takeoff: None,
            landing: None,
            max_speed: Some(1.0),
            primitive_files: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            buffer_capacity: 256,
        }
    }
}
