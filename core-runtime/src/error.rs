//! Runtime errors raised while configuring the session core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value, or logging that could not be installed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required host bridge was not injected.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
