#![deny(
    trivial_numeric_casts,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    unused_results
)]
#![warn(rust_2021_compatibility, unreachable_pub)]

//! Process configuration: the connection strings the core needs to reach
//! its external collaborators (the message broker, the document store, the
//! blob store), read once from the environment at startup. There is no configuration file and no CLI surface; the
//! process either has everything it needs in its environment or refuses to
//! start.

use std::env::VarError;

use thiserror::Error;

/// Errors raised while reading [`Settings`] from the environment.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required environment variable was not set, or was not valid UTF-8.
    #[error("environment variable `{variable}` is not set")]
    MissingVariable {
        /// The variable that was expected.
        variable: &'static str,
    },
}

/// The three connection strings the core needs before it can start
/// dispatching: the message broker, the partial/inventory document store,
/// and the raw-image blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Connection string for the message broker (`BROKER_URL`).
    pub broker_url: String,
    /// Connection string for the document store backing the inventory,
    /// partial, and batch stores (`DOCSTORE_URL`).
    pub docstore_url: String,
    /// Connection string for the blob store backing raw scan images
    /// (`BLOB_STORE_URL`).
    pub blob_store_url: String,
}

impl Settings {
    /// Reads and validates [`Settings`] from the process environment.
    /// Fails fast on the first missing variable rather than collecting all
    /// of them, since a process missing any one of these cannot start.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            broker_url: required_var("BROKER_URL")?,
            docstore_url: required_var("DOCSTORE_URL")?,
            blob_store_url: required_var("BLOB_STORE_URL")?,
        })
    }
}

fn required_var(variable: &'static str) -> Result<String, Error> {
    match std::env::var(variable) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) | Err(VarError::NotPresent) | Err(VarError::NotUnicode(_)) => Err(Error::MissingVariable { variable }),
    }
}
