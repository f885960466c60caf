//! Capability links: asking the server for one, and resolving a scanned one.

use super::*;
use crate::capability::{LinkGenerator, ParsedLink};
use crate::error::AuthError;
use crate::model::{MedicalRecord, SubjectId};

fn upstream(hop: &'static str) -> impl Fn(anyhow::Error) -> anyhow::Error {
    move |err| AuthError::UpstreamFailure(format!("{}: {:#}", hop, err)).into()
}

impl RemoteClient {
    /// Plaintext `patient-records` link for `subject`, as the server builds it.
    pub fn link_for(&self, subject: &SubjectId) -> Result<String> {
        let resp = self
            .authed(self.client.post(self.url("/links")))?
            .json(&SubjectRequest {
                subject_id: Some(subject.as_str().to_string()),
            })
            .send()
            .context("link")?;
        let v = self.expect_success(resp, "link")?;
        let out: LinkResponse = serde_json::from_value(v).context("parse link response")?;
        Ok(out.link)
    }

    /// Signed, single-use link; the caller must have treated `subject`.
    pub fn issue_capability(&self, subject: &SubjectId) -> Result<CapabilityResponse> {
        let resp = self
            .authed(self.client.post(self.url("/capabilities")))?
            .json(&SubjectRequest {
                subject_id: Some(subject.as_str().to_string()),
            })
            .send()
            .context("issue capability")?;
        let v = self.expect_success(resp, "issue capability")?;
        serde_json::from_value(v).context("parse capability response")
    }

    /// Trades a signed capability for a credential. Needs no ambient credential.
    pub fn redeem_capability(&self, capability: &str) -> Result<Credential> {
        let resp = self
            .client
            .post(self.url("/capabilities/redeem"))
            .json(&RedeemRequest {
                capability: Some(capability.to_string()),
            })
            .send()
            .context("redeem capability")?;
        let v = self.expect_success(resp, "redeem capability")?;
        let out: DelegateResponse =
            serde_json::from_value(v).context("parse redeem response")?;
        Ok(out.new_token)
    }

    /// Follows a scanned link: obtain a credential for the embedded subject,
    /// then read that subject's records with it.
    ///
    /// The two hops run strictly in order. A plaintext link needs this client's
    /// ambient credential for the delegation hop; a signed link does not.
    pub fn resolve_link(&self, links: &LinkGenerator, link: &str) -> Result<Vec<MedicalRecord>> {
        let parsed = links.parse(link).context("parse capability link")?;

        let (delegated, hint) = match &parsed {
            ParsedLink::Subject(subject) => {
                if self.token.is_none() {
                    return Err(AuthError::MissingCredential.into());
                }
                let token = self.delegate(subject).map_err(upstream("delegation"))?;
                (token, Some(subject))
            }
            ParsedLink::Capability(capability) => {
                let token = self
                    .redeem_capability(capability)
                    .map_err(upstream("capability redemption"))?;
                (token, None)
            }
        };

        let page = self
            .with_token(delegated)
            .records(hint)
            .map_err(upstream("record read"))?;
        Ok(page.records)
    }
}
