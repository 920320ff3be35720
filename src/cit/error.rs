//! Errors raised while invoking the external tool

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CitError {
    #[error("Failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list versions: {0}")]
    Listing(String),
}
