//! @ai:module:intent Probe definitions and loading
//! @ai:module:layer domain
//! @ai:module:public_api Probe, MatchMode, ProbeLoader

pub mod loader;
pub mod probe;

pub use loader::{ProbeLoader, ProbeLoaderTrait};
pub use probe::{MatchMode, MatchModeError, Probe};
