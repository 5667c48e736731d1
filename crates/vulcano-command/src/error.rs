use thiserror::Error;

/// Errors that can occur while building or querying a command
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Cannot inspect command function: {0}")]
    Inspection(String),

    #[error("Visibility check failed: {0}")]
    VisibilityEvaluation(#[source] anyhow::Error),

    #[error("Source unavailable for command function: {0}")]
    SourceUnavailable(String),

    #[error("Could not resolve options for argument '{argument}': {source}")]
    OptionResolution {
        argument: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;
