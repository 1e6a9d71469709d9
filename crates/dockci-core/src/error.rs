use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Workflow configuration ──
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error(
        "unknown deployment mode '{0}'; expected one of: inline, local-reusable, remote-shared"
    )]
    InvalidMode(String),

    #[error("invalid repository '{0}' — expected owner/repo")]
    InvalidRepo(String),
}
