use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::analysis::Section;
use crate::common::{DomainError, DomainResult};

/// Chooses which primitive to play for a section.
pub trait PrimitiveSelector: Send {
    fn select(&mut self, index: usize, section: &Section) -> String;
}

impl<F> PrimitiveSelector for F
where
    F: FnMut(usize, &Section) -> String + Send,
{
    fn select(&mut self, index: usize, section: &Section) -> String {
        self(index, section)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    #[default]
    Fixed,
    Cycle,
    Random,
}

/// Always the same primitive.
#[derive(Debug, Clone)]
pub struct FixedSelector {
    name: String,
}

impl FixedSelector {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PrimitiveSelector for FixedSelector {
    fn select(&mut self, _index: usize, _section: &Section) -> String {
        self.name.clone()
    }
}

/// Round-robin over a list, keyed by section index.
#[derive(Debug, Clone)]
pub struct CycleSelector {
    names: Vec<String>,
}

impl CycleSelector {
    pub fn new(names: Vec<String>) -> DomainResult<Self> {
        if names.is_empty() {
            return Err(DomainError::invalid_primitive("cycle", "no candidate primitives"));
        }
        Ok(Self { names })
    }
}

impl PrimitiveSelector for CycleSelector {
    fn select(&mut self, index: usize, _section: &Section) -> String {
        self.names[index % self.names.len()].clone()
    }
}

/// Uniform pick from a list; the seed makes the sequence reproducible.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    names: Vec<String>,
    rng: StdRng,
}

impl RandomSelector {
    pub fn new(names: Vec<String>, seed: u64) -> DomainResult<Self> {
        if names.is_empty() {
            return Err(DomainError::invalid_primitive("random", "no candidate primitives"));
        }
        Ok(Self {
            names,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl PrimitiveSelector for RandomSelector {
    fn select(&mut self, _index: usize, _section: &Section) -> String {
        let pick = self.rng.gen_range(0..self.names.len());
        self.names[pick].clone()
    }
}

/// Builds the selector described by a policy.
pub fn selector_for(
    policy: SelectionPolicy,
    default_primitive: &str,
    candidates: &[String],
    seed: u64,
) -> DomainResult<Box<dyn PrimitiveSelector>> {
    Ok(match policy {
        SelectionPolicy::Fixed => Box::new(FixedSelector::new(default_primitive)),
        SelectionPolicy::Cycle => Box::new(CycleSelector::new(candidates.to_vec())?),
        SelectionPolicy::Random => Box::new(RandomSelector::new(candidates.to_vec(), seed)?),
    })
}
