//! Bearer credentials, delegation and capability links for the medvault record service.
//!
//! The library holds everything both binaries share: the token issuer, the capability
//! link generator, the wire model, and the blocking remote client used by the CLI.

pub mod capability;
pub mod error;
pub mod model;
pub mod remote;
pub mod token;

pub use self::error::AuthError;
