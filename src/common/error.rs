use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid primitive '{name}': {reason}")]
    InvalidPrimitive { name: String, reason: String },

    #[error("Unknown primitive: {name}")]
    UnknownPrimitive { name: String },

    #[error("Schedule targets agent {agent}, which is not part of the fleet")]
    UnknownAgent { agent: u32 },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

impl DomainError {
    pub fn invalid_primitive(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidPrimitive {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Agent {agent} did not report ready: {reason}")]
    NotReady { agent: u32, reason: String },

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
