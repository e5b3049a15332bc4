//! Configuration management module

pub mod inputs;
pub mod loader;
pub mod repository;
pub mod settings;

pub use inputs::Inputs;
pub use loader::{CommitArgs, FileConfig};
pub use repository::RepoSlug;
pub use settings::PushConfig;

use crate::utils::validators::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}'")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("a GitHub token is required: pass --token or set INPUT_TOKEN or GITHUB_TOKEN")]
    MissingToken,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
