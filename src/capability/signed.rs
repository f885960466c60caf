use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::model::{Principal, SubjectId};
use crate::token::{CompactCodec, TokenIssuer};

const CAPABILITY_KEY_CONTEXT: &str = "medvault 2025-03 signed capability link key";

/// A time-bound, single-use grant from `issuer_id` to read `subject_id`'s records.
///
/// Signed under a key derived from (but distinct from) the credential secret and
/// with its own `typ`, so a capability never verifies as a `Credential` and a
/// credential never redeems as a capability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub subject_id: SubjectId,
    pub issuer_id: SubjectId,
    pub expires_at: u64,
    pub nonce: String,
}

#[derive(Clone)]
pub struct CapabilityIssuer {
    codec: Arc<CompactCodec>,
    ttl_secs: u64,
}

pub fn generate_nonce() -> Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(32);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

/// Minting needs a treatment relationship between issuer and subject.
pub fn ensure_entitled(issuer: Option<&Principal>, subject: &SubjectId) -> Result<(), AuthError> {
    match issuer {
        Some(p) if p.treats(subject) => Ok(()),
        _ => Err(AuthError::NotEntitled),
    }
}

impl CapabilityIssuer {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("capability signing secret must not be empty");
        }
        let key = TokenIssuer::derive_key(secret, CAPABILITY_KEY_CONTEXT);
        Ok(Self {
            codec: Arc::new(CompactCodec::new(&key, "MVCAP")?),
            ttl_secs,
        })
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn issue(
        &self,
        issuer_id: &SubjectId,
        subject_id: &SubjectId,
        now: u64,
        nonce: String,
    ) -> Result<(Capability, String)> {
        let capability = Capability {
            subject_id: subject_id.clone(),
            issuer_id: issuer_id.clone(),
            expires_at: now.saturating_add(self.ttl_secs),
            nonce,
        };
        let sealed = self
            .codec
            .seal(&capability)
            .map_err(|e| anyhow::anyhow!("serialize capability: {}", e))?;
        Ok((capability, sealed))
    }

    /// Signature and expiry only; single use is the ledger's job.
    pub fn open(&self, sealed: &str, now: u64) -> Result<Capability, AuthError> {
        let raw = self
            .codec
            .open(sealed.trim())
            .map_err(AuthError::CapabilityRejected)?;
        let capability: Capability = serde_json::from_slice(&raw)
            .map_err(|_| AuthError::CapabilityRejected("malformed capability".to_string()))?;
        if capability.subject_id.as_str().is_empty() || capability.nonce.is_empty() {
            return Err(AuthError::CapabilityRejected(
                "malformed capability".to_string(),
            ));
        }
        if now >= capability.expires_at {
            return Err(AuthError::CapabilityRejected("expired".to_string()));
        }
        Ok(capability)
    }
}

/// Nonces of capabilities already redeemed, kept until the capability would
/// have expired anyway.
#[derive(Debug, Default)]
pub struct NonceLedger {
    spent: HashMap<String, u64>,
}

impl NonceLedger {
    pub fn spend(&mut self, capability: &Capability, now: u64) -> Result<(), AuthError> {
        self.spent.retain(|_, expires_at| *expires_at > now);
        if self.spent.contains_key(&capability.nonce) {
            return Err(AuthError::CapabilityRejected("already redeemed".to_string()));
        }
        self.spent
            .insert(capability.nonce.clone(), capability.expires_at);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.spent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/capability/signed_tests.rs"]
mod tests;
