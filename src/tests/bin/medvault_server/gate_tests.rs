use axum::http::{HeaderMap, HeaderValue};

use super::*;

#[test]
fn absent_and_blank_headers_read_as_none() {
    let mut headers = HeaderMap::new();
    assert_eq!(header_value(&headers, TOKEN_HEADER), Ok(None));

    headers.insert(TOKEN_HEADER, HeaderValue::from_static("   "));
    assert_eq!(header_value(&headers, TOKEN_HEADER), Ok(None));
}

#[test]
fn header_value_is_trimmed() {
    let mut headers = HeaderMap::new();
    headers.insert(DELEGATE_HEADER, HeaderValue::from_static(" P9 "));
    assert_eq!(
        header_value(&headers, DELEGATE_HEADER),
        Ok(Some("P9".to_string()))
    );
}

#[test]
fn opaque_header_bytes_are_invalid_credentials() {
    let mut headers = HeaderMap::new();
    headers.insert(
        TOKEN_HEADER,
        HeaderValue::from_bytes(&[0xfa, 0xfb]).expect("opaque header value"),
    );
    assert!(matches!(
        header_value(&headers, TOKEN_HEADER),
        Err(AuthError::InvalidCredential(_))
    ));
}

#[test]
fn bind_subject_does_not_override_an_existing_binding() {
    let mut extensions = axum::http::Extensions::new();
    assert!(bind_subject(&mut extensions, SubjectId::new("D1")));
    assert!(!bind_subject(&mut extensions, SubjectId::new("P9")));
    assert_eq!(
        extensions.get::<Subject>().map(|s| s.id.clone()),
        Some(SubjectId::new("D1"))
    );
}

fn gate_state(data_dir: &std::path::Path) -> Arc<AppState> {
    use clap::Parser as _;
    let args = crate::runtime::Args::try_parse_from([
        "medvault-server",
        "--secret",
        "gate-test-secret",
        "--data-dir",
        data_dir.to_str().expect("utf8 path"),
    ])
    .expect("parse args");
    Arc::new(crate::runtime::build_state(&args).expect("state"))
}

async fn bind_other_subject_first(mut req: axum::extract::Request, next: Next) -> Response {
    req.extensions_mut().insert(Subject {
        id: SubjectId::new("P3"),
    });
    next.run(req).await
}

async fn whoami_through_gate(app: Router, token: &str) -> serde_json::Value {
    use tower::ServiceExt as _;
    let req = axum::http::Request::builder()
        .uri("/whoami")
        .header(TOKEN_HEADER, token)
        .body(axum::body::Body::empty())
        .expect("request");
    let resp = app.oneshot(req).await.expect("response");
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json body")
}

#[tokio::test]
async fn gate_binds_the_credential_subject() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let state = gate_state(temp.path());
    let token = state.issuer.mint(&SubjectId::new("D1")).expect("mint");

    let out = whoami_through_gate(app(state), token.as_str()).await;
    assert_eq!(out["success"], true);
    assert_eq!(out["subject_id"], "D1");
}

#[tokio::test]
async fn gate_keeps_a_subject_bound_before_it() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let state = gate_state(temp.path());
    let token = state.issuer.mint(&SubjectId::new("D1")).expect("mint");

    let app = authed_router(state.clone())
        .layer(middleware::from_fn(bind_other_subject_first))
        .with_state(state);
    let out = whoami_through_gate(app, token.as_str()).await;
    assert_eq!(out["success"], true);
    assert_eq!(out["subject_id"], "P3");
}

#[tokio::test]
async fn pre_bound_subject_does_not_skip_verification() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let state = gate_state(temp.path());

    let app = authed_router(state.clone())
        .layer(middleware::from_fn(bind_other_subject_first))
        .with_state(state);
    let out = whoami_through_gate(app, "not-a-jwt").await;
    assert_eq!(out["success"], false);
    assert!(out.get("subject_id").is_none());
}
