use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{DomainError, DomainResult};
use crate::domains::choreography::{AnalysisSource, AudioAnalysis, PrimitiveSource};

/// Environment variable naming the directory analysis and primitive files live in.
pub const DATA_DIR_ENV: &str = "SWARM_CHOREO_DATA_DIR";

/// Reads analysis documents and primitive files relative to a base directory.
/// Absolute names bypass the base directory.
pub struct FilesystemAnalysisSource {
    base: PathBuf,
}

impl FilesystemAnalysisSource {
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| match env::var(DATA_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => PathBuf::from("."),
        });
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }

    fn read(&self, name: &str) -> DomainResult<String> {
        let path = self.resolve(name);
        fs::read_to_string(&path)
            .map_err(|e| DomainError::InfrastructureError(format!("{}: {}", path.display(), e)))
    }
}

impl AnalysisSource for FilesystemAnalysisSource {
    fn load_analysis(&self, name: &str) -> DomainResult<AudioAnalysis> {
        let json = self.read(name)?;
        Ok(AudioAnalysis::from_json(&json)?)
    }
}

impl PrimitiveSource for FilesystemAnalysisSource {
    fn load_primitives(&self, name: &str) -> DomainResult<String> {
        self.read(name)
    }
}
