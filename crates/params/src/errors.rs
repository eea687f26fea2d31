//! Errors for the network profile registry.

use thiserror::Error;

/// Error while looking up a network profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No profile is registered under the requested network code.
    #[error("no network profile registered for code {0:?}")]
    NotFound(String),
}
