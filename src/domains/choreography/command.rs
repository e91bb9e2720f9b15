use serde::{Deserialize, Serialize};
use std::fmt;

/// LED ring colour, RGB components with an intensity multiplier in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub intensity: f64,
}

impl RingColor {
    /// Packs the intensity-weighted colour as `0xRRGGBB`.
    pub fn packed(&self) -> u32 {
        let weight = self.intensity.clamp(0.0, 1.0);
        let r = (f64::from(self.r) * weight) as u32;
        let g = (f64::from(self.g) * weight) as u32;
        let b = (f64::from(self.b) * weight) as u32;
        (r << 16) | (g << 8) | b
    }
}

/// An instruction for a single agent. All durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Takeoff { height: f64, duration: f64 },
    Land { duration: f64 },
    Goto { x: f64, y: f64, z: f64, duration: f64 },
    Ring { color: RingColor, duration: f64 },
    /// Issued by the dispatcher only; terminates the receiving worker.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Takeoff,
    Land,
    Goto,
    Ring,
    Quit,
}

impl Command {
    pub fn goto(x: f64, y: f64, z: f64, duration: f64) -> Self {
        Command::Goto { x, y, z, duration }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Takeoff { .. } => CommandKind::Takeoff,
            Command::Land { .. } => CommandKind::Land,
            Command::Goto { .. } => CommandKind::Goto,
            Command::Ring { .. } => CommandKind::Ring,
            Command::Quit => CommandKind::Quit,
        }
    }

    /// Embedded execution time, if the command carries one.
    pub fn duration(&self) -> Option<f64> {
        match self {
            Command::Takeoff { duration, .. }
            | Command::Land { duration }
            | Command::Goto { duration, .. }
            | Command::Ring { duration, .. } => Some(*duration),
            Command::Quit => None,
        }
    }

    /// Copy of the command with its embedded duration multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        match self.clone() {
            Command::Takeoff { height, duration } => Command::Takeoff {
                height,
                duration: duration * factor,
            },
            Command::Land { duration } => Command::Land {
                duration: duration * factor,
            },
            Command::Goto { x, y, z, duration } => Command::Goto {
                x,
                y,
                z,
                duration: duration * factor,
            },
            Command::Ring { color, duration } => Command::Ring {
                color,
                duration: duration * factor,
            },
            Command::Quit => Command::Quit,
        }
    }

    /// Checks payload ranges for commands authored into primitives and schedules.
    pub fn validate(&self) -> Result<(), String> {
        fn finite(values: &[f64]) -> bool {
            values.iter().all(|v| v.is_finite())
        }

        match self {
            Command::Takeoff { height, duration } => {
                if !finite(&[*height, *duration]) || *height <= 0.0 || *duration <= 0.0 {
                    return Err(format!("takeoff needs height > 0 and duration > 0, got {}", self));
                }
            }
            Command::Land { duration } => {
                if !duration.is_finite() || *duration < 0.0 {
                    return Err(format!("land needs duration >= 0, got {}", self));
                }
            }
            Command::Goto { x, y, z, duration } => {
                if !finite(&[*x, *y, *z, *duration]) || *duration <= 0.0 {
                    return Err(format!("goto needs finite coordinates and duration > 0, got {}", self));
                }
            }
            Command::Ring { color, duration } => {
                if !(0.0..=1.0).contains(&color.intensity) || !duration.is_finite() || *duration < 0.0 {
                    return Err(format!("ring needs intensity in [0, 1] and duration >= 0, got {}", self));
                }
            }
            Command::Quit => return Err("quit is reserved for the dispatcher".to_string()),
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Takeoff { height, duration } => write!(f, "Takeoff(height={height}, duration={duration})"),
            Command::Land { duration } => write!(f, "Land(duration={duration})"),
            Command::Goto { x, y, z, duration } => write!(f, "Goto({x}, {y}, {z}, duration={duration})"),
            Command::Ring { color, duration } => write!(
                f,
                "Ring(#{:06x}, duration={duration})",
                color.packed()
            ),
            Command::Quit => write!(f, "Quit"),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Takeoff => "takeoff",
            CommandKind::Land => "land",
            CommandKind::Goto => "goto",
            CommandKind::Ring => "ring",
            CommandKind::Quit => "quit",
        };
        f.write_str(name)
    }
}
