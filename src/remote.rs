use anyhow::{Context, Result};

use crate::model::RemoteConfig;
use crate::token::{Credential, TOKEN_HEADER};

mod http_client;
use self::http_client::with_retries;
pub use self::http_client::RemoteRefusal;

mod types;
pub use self::types::*;
mod identity;
mod links;
mod records;

/// Blocking client for the medvault API.
///
/// Every request is bounded by `RemoteConfig::timeout`, so a slow hop cannot
/// hang the caller indefinitely.
pub struct RemoteClient {
    remote: RemoteConfig,
    token: Option<Credential>,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(remote: RemoteConfig, token: Option<Credential>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("medvault")
            .timeout(remote.timeout())
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            remote,
            token,
            client,
        })
    }

    /// Same connection pool, different credential.
    pub fn with_token(&self, token: Credential) -> Self {
        Self {
            remote: self.remote.clone(),
            token: Some(token),
            client: self.client.clone(),
        }
    }
}
