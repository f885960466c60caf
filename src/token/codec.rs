//! Compact HS256 JWS: `base64url(header).base64url(claims).base64url(mac)`.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub(crate) type HmacSha256 = Hmac<Sha256>;

pub(crate) const ALG: &str = "HS256";

#[derive(serde::Serialize, serde::Deserialize)]
struct Header {
    alg: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Signs and opens compact tokens of a single `typ` under one MAC key.
#[derive(Clone)]
pub(crate) struct CompactCodec {
    mac: HmacSha256,
    typ: &'static str,
}

impl CompactCodec {
    pub(crate) fn new(key: &[u8], typ: &'static str) -> anyhow::Result<Self> {
        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| anyhow::anyhow!("hmac key: {}", e))?;
        Ok(Self { mac, typ })
    }

    /// Claims are serialized in field order, so struct payloads come out as the
    /// web service wrote them (`{"id":..,"iat":..}`).
    pub(crate) fn seal<T: serde::Serialize>(&self, claims: &T) -> serde_json::Result<String> {
        let header = serde_json::to_vec(&Header {
            alg: ALG.to_string(),
            typ: Some(self.typ.to_string()),
        })?;
        let header_b64 = URL_SAFE_NO_PAD.encode(header);
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        let message = format!("{}.{}", header_b64, claims_b64);

        let mut mac = self.mac.clone();
        mac.update(message.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!("{}.{}", message, URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Checks structure, header and signature; returns the raw claims JSON.
    pub(crate) fn open(&self, token: &str) -> Result<Vec<u8>, String> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(sig_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err("jwt malformed".to_string());
        };
        if header_b64.is_empty() || claims_b64.is_empty() {
            return Err("jwt malformed".to_string());
        }
        if sig_b64.is_empty() {
            return Err("jwt signature is required".to_string());
        }

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| "invalid token".to_string())?;
        let header: Header =
            serde_json::from_slice(&header_bytes).map_err(|_| "invalid token".to_string())?;
        if header.alg != ALG {
            return Err("invalid algorithm".to_string());
        }
        if header.typ.as_deref().is_some_and(|t| t != self.typ) {
            return Err("invalid token type".to_string());
        }

        let signature = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| "invalid signature".to_string())?;
        let mut mac = self.mac.clone();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| "invalid signature".to_string())?;

        URL_SAFE_NO_PAD
            .decode(claims_b64)
            .map_err(|_| "invalid token".to_string())
    }
}

#[cfg(test)]
#[path = "../tests/token/codec_tests.rs"]
mod tests;
