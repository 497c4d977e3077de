use thiserror::Error;

/// Unified error type for the Parley runtime.
#[derive(Error, Debug)]
pub enum ParleyError {
    // ── Capability contract ────────────────────────────────────
    #[error("not implemented: {capability}")]
    NotImplemented { capability: String },

    // ── Parser / NLU backend errors ────────────────────────────
    #[error("backend transport error: {parser}: {reason}")]
    BackendTransport { parser: String, reason: String },

    #[error("backend provider error: {parser}: {code}: {message}")]
    BackendProvider {
        parser: String,
        code: String,
        message: String,
    },

    // ── Skill errors ───────────────────────────────────────────
    #[error("skill execution failed: {skill}: {reason}")]
    SkillExecution { skill: String, reason: String },

    // ── Connector errors ───────────────────────────────────────
    #[error("connector error: {connector}: {reason}")]
    Connector { connector: String, reason: String },

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ParleyError {
    /// Shorthand for a capability the connector does not override.
    pub fn not_implemented(capability: impl Into<String>) -> Self {
        Self::NotImplemented {
            capability: capability.into(),
        }
    }

    /// True for the contract-violation errors that are allowed to escape the pipeline.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
