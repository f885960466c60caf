//! Record read/write calls.

use super::*;
use crate::model::{MedicalRecord, RecordDraft, RecordId, SubjectId};
use crate::token::DELEGATE_HEADER;

impl RemoteClient {
    /// Records owned by the subject of the current credential.
    ///
    /// `delegate_hint` is sent as the `patientid` header; the server echoes a
    /// credential minted for it as `new_token`.
    pub fn records(&self, delegate_hint: Option<&SubjectId>) -> Result<RecordsPage> {
        with_retries("records", || {
            let mut req = self.authed(self.client.get(self.url("/records")))?;
            if let Some(hint) = delegate_hint {
                req = req.header(DELEGATE_HEADER, hint.as_str());
            }
            let resp = req.send().context("send records")?;
            let v = self.expect_success(resp, "records")?;
            serde_json::from_value(v).context("parse records")
        })
    }

    pub fn create_record(&self, draft: &RecordDraft) -> Result<MedicalRecord> {
        let resp = self
            .authed(self.client.post(self.url("/records")))?
            .json(draft)
            .send()
            .context("create record")?;
        let v = self.expect_success(resp, "create record")?;
        let out: RecordResponse = serde_json::from_value(v).context("parse record")?;
        Ok(out.record)
    }

    pub fn get_record(&self, id: &RecordId) -> Result<MedicalRecord> {
        let resp = self
            .authed(self.client.get(self.url(&format!("/records/{}", id))))?
            .send()
            .context("get record")?;
        let v = self.expect_success(resp, "get record")?;
        let out: RecordResponse = serde_json::from_value(v).context("parse record")?;
        Ok(out.record)
    }

    pub fn update_record(&self, id: &RecordId, draft: &RecordDraft) -> Result<MedicalRecord> {
        let resp = self
            .authed(self.client.put(self.url(&format!("/records/{}", id))))?
            .json(draft)
            .send()
            .context("update record")?;
        let v = self.expect_success(resp, "update record")?;
        let out: RecordResponse = serde_json::from_value(v).context("parse record")?;
        Ok(out.record)
    }

    pub fn delete_record(&self, id: &RecordId) -> Result<()> {
        let resp = self
            .authed(self.client.delete(self.url(&format!("/records/{}", id))))?
            .send()
            .context("delete record")?;
        self.expect_success(resp, "delete record")?;
        Ok(())
    }
}
