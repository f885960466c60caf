use serde::{Deserialize, Serialize};

use crate::model::SubjectId;

/// What a credential asserts.
///
/// Under the default issuer configuration this is exactly `{id, iat}`; `exp`
/// and `ver` only appear when the issuer is configured with a lifetime or the
/// server tracks per-subject token versions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "id")]
    pub subject: SubjectId,

    /// Seconds since the epoch, truncated.
    pub iat: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ver: Option<u64>,
}

impl Claims {
    /// Token version, with unversioned credentials counting as version 0.
    pub fn version(&self) -> u64 {
        self.ver.unwrap_or(0)
    }
}

pub fn unix_now() -> u64 {
    time::OffsetDateTime::now_utc().unix_timestamp().max(0) as u64
}
