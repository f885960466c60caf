//! Signed capability links: minted only across a treatment relationship,
//! redeemable once, before they expire, without any ambient credential.

use medvault::capability::{ensure_entitled, generate_nonce};
use medvault::remote::{RedeemRequest, SubjectRequest};

use super::*;

pub(crate) async fn issue_capability(
    State(state): State<Arc<AppState>>,
    Acting(caller): Acting,
    body: Option<Json<SubjectRequest>>,
) -> Response {
    let Some(subject) = body
        .and_then(|Json(b)| b.subject_id)
        .and_then(|raw| SubjectId::parse(&raw))
    else {
        return failure(&state, &AuthError::MissingSubject);
    };

    let entitled = {
        let principals = state.principals.read().await;
        ensure_entitled(principals.get(&caller.id), &subject)
    };
    if let Err(err) = entitled {
        tracing::warn!(caller = %caller.id, subject = %subject, "capability refused: no treatment relationship");
        return failure(&state, &err);
    }

    let nonce = match generate_nonce() {
        Ok(n) => n,
        Err(err) => return internal_error(&state, err),
    };
    let (capability, sealed) = match state
        .capabilities
        .issue(&caller.id, &subject, unix_now(), nonce)
    {
        Ok(issued) => issued,
        Err(err) => return internal_error(&state, err),
    };
    let link = match state.links.signed_link_for(&sealed) {
        Ok(link) => link,
        Err(err) => return internal_error(&state, err.into()),
    };

    tracing::info!(
        caller = %caller.id,
        subject = %subject,
        expires_at = capability.expires_at,
        "signed capability issued"
    );
    success(serde_json::json!({
        "link": link,
        "expires_at": capability.expires_at,
    }))
}

pub(crate) async fn redeem_capability(
    State(state): State<Arc<AppState>>,
    body: Option<Json<RedeemRequest>>,
) -> Response {
    let Some(sealed) = body.and_then(|Json(b)| b.capability) else {
        return failure(
            &state,
            &AuthError::CapabilityRejected("capability is required".to_string()),
        );
    };

    let now = unix_now();
    let capability = match state.capabilities.open(&sealed, now) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!(reason = %err, "capability rejected");
            return failure(&state, &err);
        }
    };

    {
        let mut spent = state.spent_capabilities.write().await;
        if let Err(err) = spent.spend(&capability, now) {
            tracing::warn!(
                issuer = %capability.issuer_id,
                subject = %capability.subject_id,
                "capability replayed"
            );
            return failure(&state, &err);
        }
    }

    let new_token = match state.mint_for(&capability.subject_id).await {
        Ok(token) => token,
        Err(err) => return internal_error(&state, err),
    };
    tracing::info!(
        issuer = %capability.issuer_id,
        subject = %capability.subject_id,
        "capability redeemed"
    );
    success(serde_json::json!({"newToken": new_token}))
}
