use serde::{Deserialize, Serialize};

use super::ids::{RecordId, SubjectId};

/// A medical record as the document store keeps it. Owned by exactly one subject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: RecordId,
    pub owner_id: SubjectId,

    pub record_title: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub record_date: String,
    pub record_type: String,
    pub doctor_name: String,
    pub hospital_or_clinic: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Content URL returned by the file storage service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_upload: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

/// Create/update payload. Every field is optional on the wire; `validate_new`
/// enforces what a new record needs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_or_clinic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_upload: Option<String>,
}

fn present(v: &Option<String>) -> bool {
    v.as_deref().is_some_and(|s| !s.trim().is_empty())
}

pub fn validate_record_date(date: &str) -> Result<(), String> {
    let format = time::format_description::parse("[year]-[month]-[day]")
        .map_err(|e| format!("date format: {}", e))?;
    time::Date::parse(date.trim(), &format)
        .map(|_| ())
        .map_err(|_| format!("invalid record date: {}", date))
}

impl RecordDraft {
    pub fn validate_new(&self) -> Result<(), String> {
        let required = [
            &self.record_title,
            &self.record_date,
            &self.record_type,
            &self.doctor_name,
            &self.hospital_or_clinic,
        ];
        if !required.into_iter().all(present) {
            return Err("All fields are required".to_string());
        }
        if !present(&self.file_upload) {
            return Err("Sorry we ran into an issue with the file upload!".to_string());
        }
        if let Some(date) = &self.record_date {
            validate_record_date(date)?;
        }
        Ok(())
    }

    pub fn validate_update(&self) -> Result<(), String> {
        if let Some(date) = &self.record_date {
            validate_record_date(date)?;
        }
        Ok(())
    }

    /// Builds a record from a draft that passed `validate_new`.
    pub fn into_record(self, id: RecordId, owner_id: SubjectId, now: &str) -> MedicalRecord {
        MedicalRecord {
            id,
            owner_id,
            record_title: self.record_title.unwrap_or_default(),
            record_date: self.record_date.unwrap_or_default(),
            record_type: self.record_type.unwrap_or_default(),
            doctor_name: self.doctor_name.unwrap_or_default(),
            hospital_or_clinic: self.hospital_or_clinic.unwrap_or_default(),
            description: self.description,
            file_upload: self.file_upload,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

impl MedicalRecord {
    /// Overwrites the fields present in `draft`. Ownership never changes.
    pub fn apply(&mut self, draft: RecordDraft, now: &str) {
        if let Some(v) = draft.record_title {
            self.record_title = v;
        }
        if let Some(v) = draft.record_date {
            self.record_date = v;
        }
        if let Some(v) = draft.record_type {
            self.record_type = v;
        }
        if let Some(v) = draft.doctor_name {
            self.doctor_name = v;
        }
        if let Some(v) = draft.hospital_or_clinic {
            self.hospital_or_clinic = v;
        }
        if draft.description.is_some() {
            self.description = draft.description;
        }
        if draft.file_upload.is_some() {
            self.file_upload = draft.file_upload;
        }
        self.updated_at = now.to_string();
    }
}

#[cfg(test)]
#[path = "../tests/model/record_tests.rs"]
mod tests;
