use super::*;

fn issuer() -> TokenIssuer {
    TokenIssuer::new(b"issuer-test-secret").expect("issuer")
}

#[test]
fn empty_secret_is_refused() {
    assert!(TokenIssuer::new(b"").is_err());
}

#[test]
fn minted_credential_verifies_to_its_subject() {
    let subject = SubjectId::new("D1");
    let credential = issuer().mint(&subject).expect("mint");
    assert_eq!(issuer().verify(credential.as_str()), Ok(subject));
}

#[test]
fn default_claims_are_exactly_id_and_iat() {
    let credential = issuer().mint_at(&SubjectId::new("D1"), 1_742_066_868, None).expect("mint");
    let claims_b64 = credential
        .as_str()
        .split('.')
        .nth(1)
        .expect("claims segment");
    use base64::Engine as _;
    let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(claims_b64)
        .expect("decode claims");
    assert_eq!(
        String::from_utf8(raw).expect("utf8 claims"),
        r#"{"id":"D1","iat":1742066868}"#
    );
}

#[test]
fn header_and_claims_keep_the_web_service_byte_layout() {
    let credential = issuer()
        .with_ttl(Some(60))
        .mint_at(&SubjectId::new("D1"), 1_000, Some(2))
        .expect("mint");
    use base64::Engine as _;
    let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let mut parts = credential.as_str().split('.');
    let header = b64.decode(parts.next().expect("header")).expect("decode header");
    let claims = b64.decode(parts.next().expect("claims")).expect("decode claims");
    assert_eq!(header, br#"{"alg":"HS256","typ":"JWT"}"#);
    assert_eq!(claims, br#"{"id":"D1","iat":1000,"exp":1060,"ver":2}"#);
}

#[test]
fn mints_at_different_instants_differ_but_both_verify() {
    let subject = SubjectId::new("P9");
    let a = issuer().mint_at(&subject, 1_000, None).expect("mint");
    let b = issuer().mint_at(&subject, 1_001, None).expect("mint");
    assert_ne!(a, b);
    assert_eq!(issuer().verify(a.as_str()), Ok(subject.clone()));
    assert_eq!(issuer().verify(b.as_str()), Ok(subject));
}

#[test]
fn wrong_secret_is_invalid_credential() {
    let other = TokenIssuer::new(b"some-other-secret").expect("issuer");
    let credential = other.mint(&SubjectId::new("P9")).expect("mint");
    assert_eq!(
        issuer().verify(credential.as_str()),
        Err(AuthError::InvalidCredential("invalid signature".to_string()))
    );
}

#[test]
fn empty_string_is_malformed() {
    assert_eq!(
        issuer().verify(""),
        Err(AuthError::InvalidCredential("jwt malformed".to_string()))
    );
}

#[test]
fn credentials_without_ttl_never_expire() {
    let credential = issuer().mint_at(&SubjectId::new("P9"), 0, None).expect("mint");
    let claims = issuer()
        .decode_at(credential.as_str(), u64::MAX / 2)
        .expect("still valid");
    assert_eq!(claims.exp, None);
}

#[test]
fn ttl_adds_exp_and_enforces_it() {
    let issuer = issuer().with_ttl(Some(60));
    let credential = issuer.mint_at(&SubjectId::new("P9"), 1_000, None).expect("mint");

    let claims = issuer.decode_at(credential.as_str(), 1_059).expect("valid");
    assert_eq!(claims.exp, Some(1_060));
    assert_eq!(
        issuer.decode_at(credential.as_str(), 1_060),
        Err(AuthError::InvalidCredential("jwt expired".to_string()))
    );
}

#[test]
fn ttl_bounds_credentials_minted_without_exp() {
    let legacy = issuer()
        .mint_at(&SubjectId::new("D1"), 1_000, None)
        .expect("mint");
    let bounded = issuer().with_ttl(Some(60));

    assert!(bounded.decode_at(legacy.as_str(), 1_030).is_ok());
    assert_eq!(
        bounded.decode_at(legacy.as_str(), 10_000_000_000),
        Err(AuthError::InvalidCredential("jwt expired".to_string()))
    );
}

#[test]
fn ttl_caps_a_longer_exp() {
    let long_lived = issuer()
        .with_ttl(Some(86_400))
        .mint_at(&SubjectId::new("D1"), 1_000, None)
        .expect("mint");
    let bounded = issuer().with_ttl(Some(60));
    assert_eq!(
        bounded.decode_at(long_lived.as_str(), 1_060),
        Err(AuthError::InvalidCredential("jwt expired".to_string()))
    );
}

#[test]
fn version_claim_round_trips() {
    let credential = issuer().mint_at(&SubjectId::new("P9"), 1_000, Some(3)).expect("mint");
    let claims = issuer().decode(credential.as_str()).expect("valid");
    assert_eq!(claims.version(), 3);
}

#[test]
fn token_issued_by_the_legacy_service_shape_verifies() {
    // Compact token assembled by hand in the shape the web frontend stores.
    use base64::Engine as _;
    use hmac::Mac as _;
    let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = b64.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = b64.encode(br#"{"id":"67d416f2ac839bb1d51c2ba4","iat":1742066868}"#);
    let message = format!("{}.{}", header, claims);
    let mut mac = crate::token::codec::HmacSha256::new_from_slice(b"issuer-test-secret")
        .expect("mac");
    mac.update(message.as_bytes());
    let sig = b64.encode(mac.finalize().into_bytes());

    let subject = issuer()
        .verify(&format!("{}.{}", message, sig))
        .expect("verifies");
    assert_eq!(subject.as_str(), "67d416f2ac839bb1d51c2ba4");
}
