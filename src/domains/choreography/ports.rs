use super::analysis::AudioAnalysis;
use crate::common::DomainResult;

/// Port the choreography domain uses to obtain soundtrack analyses.
pub trait AnalysisSource: Send + Sync {
    fn load_analysis(&self, name: &str) -> DomainResult<AudioAnalysis>;
}

/// Port for reading additional primitive definitions (JSON arrays of primitives).
pub trait PrimitiveSource: Send + Sync {
    fn load_primitives(&self, name: &str) -> DomainResult<String>;
}
