use super::*;

pub(super) fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::MissingCredential | AuthError::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
        AuthError::MissingSubject => StatusCode::BAD_REQUEST,
        AuthError::NotEntitled | AuthError::CapabilityRejected(_) => StatusCode::FORBIDDEN,
        AuthError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
    }
}

pub(super) fn failure_with(policy: StatusPolicy, status: StatusCode, message: &str) -> Response {
    let status = match policy {
        StatusPolicy::Compat => StatusCode::OK,
        StatusPolicy::Strict => status,
    };
    (
        status,
        Json(serde_json::json!({"success": false, "message": message})),
    )
        .into_response()
}

pub(super) fn failure(state: &AppState, err: &AuthError) -> Response {
    failure_with(state.status_policy, auth_status(err), &err.to_string())
}

pub(super) fn bad_request(state: &AppState, message: &str) -> Response {
    failure_with(state.status_policy, StatusCode::BAD_REQUEST, message)
}

pub(super) fn not_found(state: &AppState, message: &str) -> Response {
    failure_with(state.status_policy, StatusCode::NOT_FOUND, message)
}

pub(super) fn internal_error(state: &AppState, err: anyhow::Error) -> Response {
    tracing::error!(error = %format!("{:#}", err), "request failed");
    failure_with(
        state.status_policy,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Server error",
    )
}

/// `{success: true, ...fields}`.
pub(super) fn success(fields: serde_json::Value) -> Response {
    let mut body = serde_json::json!({"success": true});
    if let (Some(out), serde_json::Value::Object(fields)) = (body.as_object_mut(), fields) {
        out.extend(fields);
    }
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
#[path = "../../tests/bin/medvault_server/http_error_tests.rs"]
mod tests;
