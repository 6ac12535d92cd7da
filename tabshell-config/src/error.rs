//! Typed errors for loading and saving `config.yaml`.
//!
//! `Config::load_from` and `Config::save_to` return `anyhow::Result`, so
//! callers that care about the failure mode can `downcast_ref::<ConfigError>()`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("could not serialize config: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    /// A value that parsed but cannot be used
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
