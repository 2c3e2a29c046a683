//! Error types shared by the page drivers and the profile registry

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Faults raised by a [`crate::traits::PageDriver`] or one of its elements.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("no element matches selector \"{selector}\"")]
    NotFound { selector: String },

    #[error("element for selector \"{selector}\" is no longer attached to the page")]
    Stale { selector: String },

    #[error("timed out after {}s waiting for {condition}", waited.as_secs())]
    Timeout { condition: String, waited: Duration },

    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("browser session error: {0}")]
    Session(String),
}

/// Problems with a user supplied profiles file.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("could not read profiles file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse profiles file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("profile \"{shop}\" is invalid: {reason}")]
    Invalid { shop: String, reason: String },

    #[error("unknown shop \"{name}\" (known shops: {known})")]
    UnknownShop { name: String, known: String },
}
