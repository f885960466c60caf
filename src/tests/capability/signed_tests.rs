use super::*;
use crate::model::Role;

const SECRET: &[u8] = b"capability-test-secret";

fn caps() -> CapabilityIssuer {
    CapabilityIssuer::new(SECRET, 600).expect("capability issuer")
}

fn doctor(patients: &[&str]) -> Principal {
    Principal {
        id: SubjectId::new("D1"),
        handle: "dr-osei".to_string(),
        role: Role::Doctor,
        display_name: None,
        password_hash: String::new(),
        patients: patients.iter().map(|p| SubjectId::new(*p)).collect(),
    }
}

#[test]
fn issued_capability_opens_before_expiry() {
    let (cap, sealed) = caps().issue(
        &SubjectId::new("D1"),
        &SubjectId::new("P9"),
        1_000,
        "n1".to_string(),
    )
    .expect("issue");
    assert_eq!(cap.expires_at, 1_600);
    assert_eq!(caps().open(&sealed, 1_599), Ok(cap));
}

#[test]
fn expired_capability_is_rejected() {
    let (_, sealed) = caps().issue(
        &SubjectId::new("D1"),
        &SubjectId::new("P9"),
        1_000,
        "n1".to_string(),
    )
    .expect("issue");
    assert_eq!(
        caps().open(&sealed, 1_600),
        Err(AuthError::CapabilityRejected("expired".to_string()))
    );
}

#[test]
fn capability_and_credential_are_not_interchangeable() {
    let tokens = TokenIssuer::new(SECRET).expect("issuer");
    let credential = tokens.mint(&SubjectId::new("P9")).expect("mint");
    assert!(caps().open(credential.as_str(), 0).is_err());

    let (_, sealed) = caps().issue(
        &SubjectId::new("D1"),
        &SubjectId::new("P9"),
        crate::token::unix_now(),
        "n1".to_string(),
    )
    .expect("issue");
    assert!(tokens.verify(&sealed).is_err());
}

#[test]
fn ledger_spends_each_nonce_once() {
    let (cap, _) = caps().issue(
        &SubjectId::new("D1"),
        &SubjectId::new("P9"),
        1_000,
        "n1".to_string(),
    )
    .expect("issue");
    let mut ledger = NonceLedger::default();
    assert_eq!(ledger.spend(&cap, 1_001), Ok(()));
    assert_eq!(
        ledger.spend(&cap, 1_002),
        Err(AuthError::CapabilityRejected("already redeemed".to_string()))
    );
}

#[test]
fn ledger_forgets_expired_nonces() {
    let (cap, _) = caps().issue(
        &SubjectId::new("D1"),
        &SubjectId::new("P9"),
        1_000,
        "n1".to_string(),
    )
    .expect("issue");
    let (other, _) = caps().issue(
        &SubjectId::new("D1"),
        &SubjectId::new("P9"),
        5_000,
        "n2".to_string(),
    )
    .expect("issue");
    let mut ledger = NonceLedger::default();
    ledger.spend(&cap, 1_001).expect("first spend");
    ledger.spend(&other, 5_001).expect("second spend");
    assert_eq!(ledger.len(), 1);
}

#[test]
fn entitlement_follows_treatment_relationship() {
    let p9 = SubjectId::new("P9");
    assert_eq!(ensure_entitled(Some(&doctor(&["P9"])), &p9), Ok(()));
    assert_eq!(
        ensure_entitled(Some(&doctor(&["P3"])), &p9),
        Err(AuthError::NotEntitled)
    );
    assert_eq!(ensure_entitled(None, &p9), Err(AuthError::NotEntitled));
}

#[test]
fn nonces_are_random_hex() {
    let a = generate_nonce().expect("nonce");
    let b = generate_nonce().expect("nonce");
    assert_eq!(a.len(), 32);
    assert_ne!(a, b);
}
