use serde::{Deserialize, Serialize};

use super::ids::SubjectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
    Admin,
}

/// An entry of the principal directory (`principals.json`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Principal {
    pub id: SubjectId,
    pub handle: String,
    pub role: Role,

    #[serde(default)]
    pub display_name: Option<String>,

    // blake3 over "<id>\n<password>", hex.
    pub password_hash: String,

    /// Patients this principal has treated. Only consulted when signed
    /// capabilities are minted.
    #[serde(default)]
    pub patients: Vec<SubjectId>,
}

pub fn hash_password(id: &SubjectId, password: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(id.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}

impl Principal {
    pub fn password_matches(&self, password: &str) -> bool {
        hash_password(&self.id, password) == self.password_hash
    }

    pub fn treats(&self, patient: &SubjectId) -> bool {
        self.patients.iter().any(|p| p == patient)
    }
}
