use super::*;

pub(super) fn with_retries<T>(label: &str, mut f: impl FnMut() -> Result<T>) -> Result<T> {
    const ATTEMPTS: usize = 3;
    let mut last: Option<anyhow::Error> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) => {
                // A `success: false` payload is an answer, not a transport hiccup.
                if err.downcast_ref::<RemoteRefusal>().is_some() {
                    return Err(err.context(label.to_string()));
                }
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    std::thread::sleep(std::time::Duration::from_millis(200 * (1 << i)));
                }
            }
        }
    }
    Err(last
        .unwrap_or_else(|| anyhow::anyhow!("unknown error"))
        .context(label.to_string()))
}

/// The server answered, and the answer was `success: false`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RemoteRefusal {
    pub message: String,
}

pub(super) fn refusal_message(v: &serde_json::Value) -> String {
    v.get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("request failed")
        .to_string()
}

impl RemoteClient {
    /// Reads the payload and checks `success`; transport status is secondary
    /// because the server may report failures with a 200.
    pub(super) fn expect_success(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<serde_json::Value> {
        let status = resp.status();
        let v: serde_json::Value = match resp.json() {
            Ok(v) => v,
            Err(err) => {
                if !status.is_success() {
                    anyhow::bail!("{} status {}", label, status);
                }
                return Err(err).with_context(|| format!("parse {}", label));
            }
        };
        if v.get("success").and_then(|s| s.as_bool()) != Some(true) {
            return Err(RemoteRefusal {
                message: refusal_message(&v),
            }
            .into());
        }
        if !status.is_success() {
            anyhow::bail!("{} status {}", label, status);
        }
        Ok(v)
    }

    pub(super) fn authed(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::RequestBuilder> {
        let Some(token) = &self.token else {
            anyhow::bail!("no credential configured (run `medvault login` or pass --token)");
        };
        Ok(req.header(TOKEN_HEADER, token.as_str()))
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.remote.base_url, path)
    }
}

#[cfg(test)]
#[path = "../tests/remote/http_client_tests.rs"]
mod tests;
