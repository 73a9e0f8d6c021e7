use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrepError>;

/// Errors surfaced to the caller of [`crate::RepoPreparer`].
///
/// Per-file problems (unreadable, oversized or binary files) are logged and
/// absorbed; only invalid caller input ends up here.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid repository path: {0}")]
    InvalidPath(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl PrepError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
