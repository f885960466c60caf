//! The auth gate: every protected route passes through `require_token`.

use axum::Extension;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use medvault::token::Claims;

use super::*;

/// Trimmed, non-empty header value. A value that is not valid header text is a
/// malformed credential rather than a missing one.
pub(crate) fn header_value(
    headers: &axum::http::HeaderMap,
    name: &str,
) -> Result<Option<String>, AuthError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let Ok(value) = value.to_str() else {
        return Err(AuthError::InvalidCredential(format!("invalid {} header", name)));
    };
    let value = value.trim();
    if value.is_empty() {
        Ok(None)
    } else {
        Ok(Some(value.to_string()))
    }
}

/// Binds `id` as the acting subject unless the request already carries one.
/// Returns whether the binding happened.
pub(crate) fn bind_subject(extensions: &mut axum::http::Extensions, id: SubjectId) -> bool {
    if extensions.get::<Subject>().is_some() {
        return false;
    }
    extensions.insert(Subject { id });
    true
}

/// Signature (and `exp`, when present), then the version table when enabled.
pub(crate) async fn verify_claims(state: &AppState, token: &str) -> Result<Claims, AuthError> {
    let claims = state.issuer.decode(token)?;
    if let Some(current) = state.current_version(&claims.subject).await
        && claims.version() < current
    {
        return Err(AuthError::InvalidCredential("token revoked".to_string()));
    }
    Ok(claims)
}

pub(crate) async fn require_token(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let token = match header_value(req.headers(), TOKEN_HEADER) {
        Ok(Some(token)) => token,
        Ok(None) => {
            tracing::debug!(path = %req.uri().path(), "no credential presented");
            return failure(&state, &AuthError::MissingCredential);
        }
        Err(err) => return failure(&state, &err),
    };

    let claims = match verify_claims(&state, &token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(path = %req.uri().path(), kind = err.kind(), reason = %err, "credential rejected");
            return failure(&state, &err);
        }
    };

    // A malformed delegate hint is ignored, not fatal.
    let hint = header_value(req.headers(), DELEGATE_HEADER)
        .ok()
        .flatten()
        .map(SubjectId::new);

    let mut req = req;
    if !bind_subject(req.extensions_mut(), claims.subject.clone()) {
        tracing::debug!(subject = %claims.subject, "acting subject already bound; keeping it");
    }

    if let Some(patient_id) = hint {
        // No check that the caller may act for `patient_id`.
        let new_token = match state.mint_for(&patient_id).await {
            Ok(token) => token,
            Err(err) => return internal_error(&state, err),
        };
        tracing::info!(
            caller = %claims.subject,
            delegate = %patient_id,
            "minted delegated credential in gate"
        );
        req.extensions_mut().insert(Delegation {
            patient_id,
            new_token,
        });
    }

    next.run(req).await
}

/// The bound acting subject. Rejects with a failure payload when the gate did
/// not bind one, so handlers never run with an empty identity.
pub(crate) struct Acting(pub(crate) Subject);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for Acting {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Subject>() {
            Some(subject) => Ok(Acting(subject.clone())),
            None => Err(failure(state, &AuthError::MissingCredential)),
        }
    }
}

pub(crate) type MaybeDelegation = Option<Extension<Delegation>>;

#[cfg(test)]
#[path = "../../tests/bin/medvault_server/gate_tests.rs"]
mod tests;
