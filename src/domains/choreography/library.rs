use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::f64::consts::PI;

use super::command::Command;
use super::primitive::{Primitive, PrimitiveMove};
use crate::common::{DomainError, DomainResult};

/// Built-in primitives, constructed once on first use.
pub static BUILTIN_LIBRARY: Lazy<PrimitiveLibrary> = Lazy::new(PrimitiveLibrary::builtin);

/// Name-indexed catalog of primitives.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveLibrary {
    primitives: BTreeMap<String, Primitive>,
}

impl PrimitiveLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The primitives shipped with the crate, all laid out for nine agents.
    ///
    /// A table that fails validation is logged and left out, so asking for it later
    /// reports `UnknownPrimitive`.
    pub fn builtin() -> Self {
        Self::from_tables([kickline(), rotating_tower(), wave()])
    }

    fn from_tables(tables: impl IntoIterator<Item = DomainResult<Primitive>>) -> Self {
        let mut library = Self::new();
        for table in tables {
            match table {
                Ok(primitive) => {
                    library.insert(primitive);
                }
                Err(e) => tracing::error!(error = %e, "built-in primitive skipped"),
            }
        }
        library
    }

    /// Adds or replaces a primitive under its own name.
    pub fn insert(&mut self, primitive: Primitive) -> Option<Primitive> {
        self.primitives.insert(primitive.name().to_string(), primitive)
    }

    pub fn get(&self, name: &str) -> DomainResult<&Primitive> {
        self.primitives
            .get(name)
            .ok_or_else(|| DomainError::UnknownPrimitive { name: name.to_string() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.primitives.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.primitives.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Parses a JSON array of primitives and adds them; all-or-nothing.
    pub fn extend_from_json(&mut self, json: &str) -> DomainResult<usize> {
        let parsed: Vec<Primitive> = serde_json::from_str(json)?;
        let count = parsed.len();
        for primitive in parsed {
            self.insert(primitive);
        }
        Ok(count)
    }
}


const LINE_X: [f64; 9] = [-1.5, -1.125, -0.75, -0.375, 0.0, 0.375, 0.75, 1.125, 1.5];

/// Nine agents in a line bobbing up and down in alternation.
fn kickline() -> DomainResult<Primitive> {
    const Z_BASE: f64 = 1.0;
    const Z_LOW: f64 = 0.75;

    let mut moves = Vec::with_capacity(72);
    for beat in 0..8usize {
        for (agent, x) in LINE_X.iter().enumerate() {
            // First and last beat hold the line level.
            let low = beat > 0 && beat < 7 && (agent % 2 == 0) == (beat % 2 == 1);
            let z = if low { Z_LOW } else { Z_BASE };
            moves.push(PrimitiveMove::new(beat as f64, agent, Command::goto(*x, 0.0, z, 1.0)));
        }
    }
    Primitive::new("kickline", moves)
}

/// Two stacked squares rotating in quarter turns under a stationary crown.
fn rotating_tower() -> DomainResult<Primitive> {
    const X_MID: f64 = 0.4;
    const X_BASE: f64 = 0.8;
    const Z_TOP: f64 = 1.5;
    const Z_MID: f64 = 1.0;
    const Z_BASE: f64 = 0.5;
    const STEP: f64 = 2.5;
    const CORNERS: [(f64, f64); 4] = [(1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

    let mut moves = vec![PrimitiveMove::new(0.0, 8, Command::goto(0.0, 0.0, Z_TOP, STEP))];
    for phase in 0..4usize {
        let offset = phase as f64 * STEP;
        for (ring, (half_width, z)) in [(X_BASE, Z_BASE), (X_MID, Z_MID)].into_iter().enumerate() {
            for corner in 0..4usize {
                let (sx, sy) = CORNERS[(corner + phase) % 4];
                moves.push(PrimitiveMove::new(
                    offset,
                    ring * 4 + corner,
                    Command::goto(sx * half_width, sy * half_width, z, STEP),
                ));
            }
        }
    }
    Primitive::new("rotating_tower", moves)
}

/// Nine agents in a line tracing a travelling sine wave.
fn wave() -> DomainResult<Primitive> {
    const Z_BASE: f64 = 1.0;
    const AMPLITUDE: f64 = 0.3;
    const PERIOD: f64 = 8.0;

    let mut moves = Vec::with_capacity(72);
    for beat in 0..8usize {
        for (agent, x) in LINE_X.iter().enumerate() {
            let phase = 2.0 * PI * (beat as f64 - agent as f64) / PERIOD;
            let z = Z_BASE + AMPLITUDE * phase.sin();
            moves.push(PrimitiveMove::new(beat as f64, agent, Command::goto(*x, 0.0, z, 1.0)));
        }
    }
    Primitive::new("wave", moves)
}
