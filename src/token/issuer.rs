use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::claims::{Claims, unix_now};
use super::codec::CompactCodec;
use crate::error::AuthError;
use crate::model::SubjectId;

/// A signed bearer credential in compact form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn from_string(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints and verifies credentials under one process-wide HMAC secret.
///
/// Minting and verification are pure: nothing is stored, nothing is looked up.
/// Two credentials for the same subject minted at different instants are both
/// valid for as long as the secret is, unless `exp` or a configured lifetime
/// says otherwise.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: Arc<CompactCodec>,
    ttl_secs: Option<u64>,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("token signing secret must not be empty");
        }
        Ok(Self {
            codec: Arc::new(CompactCodec::new(secret, "JWT")?),
            ttl_secs: None,
        })
    }

    /// Adds an `exp` claim `ttl_secs` after issuance to every credential minted from now on.
    pub fn with_ttl(mut self, ttl_secs: Option<u64>) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn ttl_secs(&self) -> Option<u64> {
        self.ttl_secs
    }

    pub fn mint(&self, subject: &SubjectId) -> Result<Credential> {
        self.mint_versioned(subject, None)
    }

    pub fn mint_versioned(&self, subject: &SubjectId, ver: Option<u64>) -> Result<Credential> {
        self.mint_at(subject, unix_now(), ver)
    }

    pub fn mint_at(
        &self,
        subject: &SubjectId,
        issued_at: u64,
        ver: Option<u64>,
    ) -> Result<Credential> {
        let claims = Claims {
            subject: subject.clone(),
            iat: issued_at,
            exp: self.ttl_secs.map(|ttl| issued_at.saturating_add(ttl)),
            ver,
        };
        let sealed = self.codec.seal(&claims).context("serialize claims")?;
        Ok(Credential(sealed))
    }

    pub fn verify(&self, token: &str) -> Result<SubjectId, AuthError> {
        self.decode(token).map(|claims| claims.subject)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_at(token, unix_now())
    }

    pub fn decode_at(&self, token: &str, now: u64) -> Result<Claims, AuthError> {
        let raw = self.codec.open(token.trim()).map_err(AuthError::invalid)?;
        let claims: Claims =
            serde_json::from_slice(&raw).map_err(|_| AuthError::invalid("invalid token"))?;
        if claims.subject.as_str().is_empty() {
            return Err(AuthError::invalid("token has no subject"));
        }
        if let Some(expires_at) = self.expires_at(&claims)
            && now >= expires_at
        {
            return Err(AuthError::invalid("jwt expired"));
        }
        Ok(claims)
    }

    /// With a lifetime configured, every credential ends at `iat + ttl` at the
    /// latest, including ones minted without `exp` before the lifetime was set.
    fn expires_at(&self, claims: &Claims) -> Option<u64> {
        let lifetime_end = self.ttl_secs.map(|ttl| claims.iat.saturating_add(ttl));
        match (claims.exp, lifetime_end) {
            (Some(exp), Some(end)) => Some(exp.min(end)),
            (exp, end) => exp.or(end),
        }
    }

    /// Key material for a separate signing domain derived from the credential secret.
    pub(crate) fn derive_key(secret: &[u8], domain: &str) -> Vec<u8> {
        blake3::derive_key(domain, secret).to_vec()
    }
}

#[cfg(test)]
#[path = "../tests/token/issuer_tests.rs"]
mod tests;
