//! Tests for the auth module

use super::*;
use crate::error::Error;
use jsonwebtoken::{encode, EncodingKey, Header};
use test_case::test_case;

const SECRET: &str = "test-secret";

fn provider() -> JwtIdentityProvider {
    JwtIdentityProvider::new(SECRET, 300)
}

#[test_case("Bearer abc", Some("abc") ; "standard")]
#[test_case("bearer abc", Some("abc") ; "lowercase scheme")]
#[test_case("Basic abc", None ; "wrong scheme")]
#[test_case("Bearer", None ; "missing token")]
#[test_case("Bearer a b", None ; "extra parts")]
fn test_bearer_token(header: &str, expected: Option<&str>) {
    assert_eq!(bearer_token(header).ok(), expected);
}

#[tokio::test]
async fn test_identify_access_token() {
    let provider = provider();
    let token = provider.issue_access_token(42).unwrap();

    let identity = provider
        .identify(Some(&format!("Bearer {token}")))
        .await
        .unwrap();
    assert_eq!(identity, Identity { user_id: 42 });
}

#[tokio::test]
async fn test_identify_rejects_refresh_token() {
    let provider = provider();
    let token = provider.issue(42, TokenType::Refresh, 3600).unwrap();

    let err = provider
        .identify(Some(&format!("Bearer {token}")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
}

#[tokio::test]
async fn test_identify_missing_header() {
    let err = provider().identify(None).await.unwrap_err();
    assert!(err.to_string().contains("Missing Authorization header"));
}

#[tokio::test]
async fn test_identify_wrong_secret() {
    let token = JwtIdentityProvider::new("other-secret", 300)
        .issue_access_token(1)
        .unwrap();

    let result = provider().identify(Some(&format!("Bearer {token}"))).await;
    assert!(matches!(result, Err(Error::Auth { .. })));
}

#[tokio::test]
async fn test_identify_expired_token() {
    let mut claims = Claims::new(1, TokenType::Access, 0);
    claims.iat -= 7200;
    claims.exp -= 3600;
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let result = provider().identify(Some(&format!("Bearer {token}"))).await;
    assert!(matches!(result, Err(Error::Auth { .. })));
}

#[tokio::test]
async fn test_identify_non_numeric_subject() {
    let mut claims = Claims::new(1, TokenType::Access, 300);
    claims.sub = "alice".to_string();
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let result = provider().identify(Some(&format!("Bearer {token}"))).await;
    assert!(matches!(result, Err(Error::Auth { .. })));
}

#[test]
fn test_verify_round_trip() {
    let provider = provider();
    let token = provider.issue(7, TokenType::Access, 60).unwrap();
    let claims = provider.verify(&token).unwrap();
    assert_eq!(claims.sub, "7");
    assert_eq!(claims.token_type, TokenType::Access);
}
