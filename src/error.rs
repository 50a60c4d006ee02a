// SPDX-License-Identifier: MPL-2.0
//! Crate-level error type.
//!
//! The gesture engine itself never fails: degenerate input degrades to an
//! untransformed image. Errors only arise at the edges (configuration files,
//! persisted state, replay scripts).

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Persisted state error: {0}")]
    State(String),

    #[error("Replay script error: {0}")]
    Script(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
