use super::*;

#[test]
fn compat_policy_always_answers_200() {
    let resp = failure_with(
        StatusPolicy::Compat,
        StatusCode::UNAUTHORIZED,
        "Not Authorized, Login Again",
    );
    assert_eq!(resp.status(), StatusCode::OK);
}

#[test]
fn strict_policy_keeps_status() {
    let resp = failure_with(StatusPolicy::Strict, StatusCode::NOT_FOUND, "Record not found");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[test]
fn auth_errors_map_to_statuses() {
    assert_eq!(
        auth_status(&AuthError::MissingCredential),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        auth_status(&AuthError::InvalidCredential("invalid signature".to_string())),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(auth_status(&AuthError::MissingSubject), StatusCode::BAD_REQUEST);
    assert_eq!(auth_status(&AuthError::NotEntitled), StatusCode::FORBIDDEN);
    assert_eq!(
        auth_status(&AuthError::UpstreamFailure("timeout".to_string())),
        StatusCode::BAD_GATEWAY
    );
}

#[test]
fn success_payload_is_flagged() {
    let resp = success(serde_json::json!({"link": "x"}));
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
        Some(&b"no-store"[..])
    );
}
