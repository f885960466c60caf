//! Login, identity and the delegation endpoint.

use axum::Extension;
use medvault::capability::LinkError;
use medvault::remote::{LoginRequest, SubjectRequest};

use super::*;

pub(crate) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    body: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(body)) = body else {
        return bad_request(&state, "Missing Details");
    };

    let principal = {
        let principals = state.principals.read().await;
        principals
            .values()
            .find(|p| p.handle == body.handle)
            .filter(|p| p.password_matches(&body.password))
            .map(|p| p.id.clone())
    };
    let Some(subject) = principal else {
        tracing::info!(handle = %body.handle, "login refused");
        return failure(
            &state,
            &AuthError::InvalidCredential("Invalid credentials".to_string()),
        );
    };

    let token = match state.mint_for(&subject).await {
        Ok(token) => token,
        Err(err) => return internal_error(&state, err),
    };
    tracing::info!(subject = %subject, "login");
    success(serde_json::json!({"token": token}))
}

pub(crate) async fn whoami(Acting(subject): Acting, delegation: MaybeDelegation) -> Response {
    success(serde_json::json!({
        "subject_id": subject.id,
        "delegate_id": delegation.map(|Extension(d)| d.patient_id),
    }))
}

fn requested_subject(body: Option<Json<SubjectRequest>>) -> Result<SubjectId, AuthError> {
    body.and_then(|Json(b)| b.subject_id)
        .and_then(|raw| SubjectId::parse(&raw))
        .ok_or(AuthError::MissingSubject)
}

/// Mints a credential for the requested subject on behalf of whoever holds a
/// valid credential. The caller's relationship to the subject is not checked.
pub(crate) async fn delegate(
    State(state): State<Arc<AppState>>,
    Acting(caller): Acting,
    body: Option<Json<SubjectRequest>>,
) -> Response {
    let subject = match requested_subject(body) {
        Ok(subject) => subject,
        Err(err) => {
            tracing::info!(caller = %caller.id, "delegation without subject");
            return failure(&state, &err);
        }
    };

    let new_token = match state.mint_for(&subject).await {
        Ok(token) => token,
        Err(err) => return internal_error(&state, err),
    };
    tracing::info!(caller = %caller.id, subject = %subject, "delegated credential issued");
    success(serde_json::json!({"newToken": new_token}))
}

pub(crate) async fn create_link(
    State(state): State<Arc<AppState>>,
    Acting(caller): Acting,
    body: Option<Json<SubjectRequest>>,
) -> Response {
    let subject = match requested_subject(body) {
        Ok(subject) => subject,
        Err(err) => return failure(&state, &err),
    };
    match state.links.link_for(&subject) {
        Ok(link) => {
            tracing::debug!(caller = %caller.id, subject = %subject, "capability link built");
            success(serde_json::json!({"link": link}))
        }
        Err(LinkError::EmptySubject) => failure(&state, &AuthError::MissingSubject),
        Err(err) => bad_request(&state, &err.to_string()),
    }
}

pub(crate) async fn revoke_all_tokens(
    State(state): State<Arc<AppState>>,
    Acting(caller): Acting,
) -> Response {
    let Some(versions) = &state.token_versions else {
        return bad_request(&state, "token versions are not enabled on this server");
    };
    let version = {
        let mut versions = versions.write().await;
        let previous = versions.get(&caller.id).copied();
        let version = previous.unwrap_or(0) + 1;
        versions.insert(caller.id.clone(), version);
        if let Err(err) = persist_token_versions_to_disk(&state.data_dir, &versions) {
            match previous {
                Some(v) => versions.insert(caller.id.clone(), v),
                None => versions.remove(&caller.id),
            };
            return internal_error(&state, err);
        }
        version
    };
    tracing::info!(subject = %caller.id, version, "all earlier credentials revoked");
    success(serde_json::json!({"version": version}))
}

#[cfg(test)]
#[path = "../../tests/bin/medvault_server/handlers_auth_tests.rs"]
mod tests;
