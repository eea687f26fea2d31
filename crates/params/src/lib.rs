//! Network parameter profiles: the per-network curve reference and
//! version-byte constants behind every text encoding, built once into a
//! process-wide read-only registry.

mod default;
pub mod errors;
pub mod registry;
pub mod types;

pub use errors::RegistryError;
pub use registry::{all, lookup};
pub use types::{NetworkProfile, VersionBytes};
