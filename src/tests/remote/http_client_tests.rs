use super::*;

#[test]
fn refusal_message_prefers_message_field() {
    let v = serde_json::json!({"success": false, "message": "invalid signature"});
    assert_eq!(refusal_message(&v), "invalid signature");
}

#[test]
fn refusal_message_falls_back_to_default() {
    let v = serde_json::json!({"success": false});
    assert_eq!(refusal_message(&v), "request failed");
}

#[test]
fn refusals_are_not_retried() {
    let mut calls = 0;
    let out: Result<()> = with_retries("delegate", || {
        calls += 1;
        Err(RemoteRefusal {
            message: "Patient ID is required".to_string(),
        }
        .into())
    });
    assert_eq!(calls, 1);
    let err = out.expect_err("refused");
    assert!(err.downcast_ref::<RemoteRefusal>().is_some());
}

#[test]
fn transport_errors_are_retried_until_success() {
    let mut calls = 0;
    let out = with_retries("records", || {
        calls += 1;
        if calls < 2 {
            anyhow::bail!("connection reset");
        }
        Ok(calls)
    });
    assert_eq!(out.expect("eventually ok"), 2);
}
