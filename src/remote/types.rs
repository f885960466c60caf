//! DTOs and payload types for API requests/responses.

use crate::model::{MedicalRecord, SubjectId};
use crate::token::Credential;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    pub handle: String,
    pub password: String,
}

/// Body of `POST /delegate`, `POST /links` and `POST /capabilities`.
///
/// `patientid` is accepted as an alias for the web frontend's field name.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct SubjectRequest {
    #[serde(default, alias = "patientid")]
    pub subject_id: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RedeemRequest {
    #[serde(default)]
    pub capability: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    pub token: Credential,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct DelegateResponse {
    #[serde(rename = "newToken")]
    pub new_token: Credential,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct WhoAmI {
    pub subject_id: SubjectId,

    #[serde(default)]
    pub delegate_id: Option<SubjectId>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RecordsPage {
    pub records: Vec<MedicalRecord>,

    /// Echo of the credential the gate minted for a `patientid` header, if any.
    #[serde(default, rename = "newToken")]
    pub new_token: Option<Credential>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RecordResponse {
    pub record: MedicalRecord,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LinkResponse {
    pub link: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CapabilityResponse {
    pub link: String,
    pub expires_at: u64,
}
