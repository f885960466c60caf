//! Token Issuer: HS256 bearer credentials asserting a subject id.

mod claims;
mod codec;
mod issuer;

pub(crate) use self::codec::CompactCodec;
pub use self::claims::{Claims, unix_now};
pub use self::issuer::{Credential, TokenIssuer};

/// Request header carrying the caller's credential.
pub const TOKEN_HEADER: &str = "token";

/// Optional request header asking the gate to mint a credential for another subject.
pub const DELEGATE_HEADER: &str = "patientid";
