//! Capability links: the plaintext patient-records locator and its signed variant.

mod link;
mod signed;

pub use self::link::{LinkError, LinkGenerator, ParsedLink, RECORDS_SEGMENT};
pub use self::signed::{
    Capability, CapabilityIssuer, NonceLedger, ensure_entitled, generate_nonce,
};
