//! Login, identity and delegation calls.

use super::*;
use crate::model::SubjectId;

impl RemoteClient {
    pub fn login(&self, handle: &str, password: &str) -> Result<Credential> {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest {
                handle: handle.to_string(),
                password: password.to_string(),
            })
            .send()
            .context("login")?;
        let v = self.expect_success(resp, "login")?;
        let out: LoginResponse = serde_json::from_value(v).context("parse login response")?;
        Ok(out.token)
    }

    pub fn whoami(&self) -> Result<WhoAmI> {
        let resp = self
            .authed(self.client.get(self.url("/whoami")))?
            .send()
            .context("whoami")?;
        let v = self.expect_success(resp, "whoami")?;
        serde_json::from_value(v).context("parse whoami")
    }

    /// Asks the server for a credential speaking for `subject`.
    ///
    /// Any valid credential is enough; the server does not check how the
    /// caller relates to `subject`.
    pub fn delegate(&self, subject: &SubjectId) -> Result<Credential> {
        with_retries("delegate", || {
            let resp = self
                .authed(self.client.post(self.url("/delegate")))?
                .json(&SubjectRequest {
                    subject_id: Some(subject.as_str().to_string()),
                })
                .send()
                .context("send delegate")?;
            let v = self.expect_success(resp, "delegate")?;
            let out: DelegateResponse =
                serde_json::from_value(v).context("parse delegate response")?;
            Ok(out.new_token)
        })
    }

    /// Invalidates every credential of the caller minted so far (token versions must be enabled).
    pub fn revoke_all_tokens(&self) -> Result<u64> {
        let resp = self
            .authed(self.client.post(self.url("/tokens/revoke-all")))?
            .send()
            .context("revoke tokens")?;
        let v = self.expect_success(resp, "revoke tokens")?;
        v.get("version")
            .and_then(|x| x.as_u64())
            .context("revoke response missing version")
    }
}
