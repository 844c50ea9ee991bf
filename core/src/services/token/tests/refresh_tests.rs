//! Unit tests for the refresh token service

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::claims::{Amr, Subject};
use crate::domain::entities::client::ClientConfig;
use crate::errors::{DomainError, TokenError};
use crate::repositories::refresh_token::MockRefreshTokenRepository;
use crate::services::clock::test_support::ManualClock;
use crate::services::token::RefreshTokenService;

fn test_service() -> (RefreshTokenService<MockRefreshTokenRepository>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(ManualClock::default_start()));
    let service = RefreshTokenService::new(MockRefreshTokenRepository::new(), clock.clone());
    (service, clock)
}

fn account_subject() -> Subject {
    Subject::Account {
        id: "u1".to_string(),
        email: "u1@example.com".to_string(),
    }
}

#[tokio::test]
async fn issue_and_verify_round_trip() {
    let (service, _clock) = test_service();
    let client = ClientConfig::new("web-app");

    let issued = service
        .issue(&account_subject(), "device-1", Amr::Pwd, &client)
        .await
        .unwrap();

    assert_eq!(issued.token.len(), 32);
    assert!(issued.token.chars().all(|c| c.is_ascii_alphanumeric()));

    let entity = service.verify("device-1", &issued.token).await.unwrap();
    assert_eq!(entity.id, issued.id);
    assert_eq!(entity.subject, account_subject().encode());
    assert_eq!(entity.amr, Amr::Pwd);
    // Storage never holds the plaintext
    assert_ne!(entity.token_hash, issued.token);
}

#[tokio::test]
async fn verify_rejects_wrong_token_string() {
    let (service, _clock) = test_service();
    let client = ClientConfig::new("web-app");

    service
        .issue(&account_subject(), "device-1", Amr::Pwd, &client)
        .await
        .unwrap();

    let result = service.verify("device-1", "not-the-token").await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    ));
}

#[tokio::test]
async fn verify_rejects_wrong_device() {
    let (service, _clock) = test_service();
    let client = ClientConfig::new("web-app");

    let issued = service
        .issue(&account_subject(), "device-1", Amr::Pwd, &client)
        .await
        .unwrap();

    let result = service.verify("device-2", &issued.token).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    ));
}

#[tokio::test]
async fn rotate_replaces_the_token_string() {
    let (service, _clock) = test_service();
    let client = ClientConfig::new("web-app");

    let issued = service
        .issue(&account_subject(), "device-1", Amr::Pwd, &client)
        .await
        .unwrap();

    let rotated = service.rotate(issued.id, &issued.token, &client).await.unwrap();
    assert_ne!(rotated, issued.token);

    // Old string is dead, new one resolves to the same chain
    let stale = service.verify("device-1", &issued.token).await;
    assert!(matches!(
        stale.unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    ));
    let entity = service.verify("device-1", &rotated).await.unwrap();
    assert_eq!(entity.id, issued.id);
}

#[tokio::test]
async fn rotate_rejects_unknown_id() {
    let (service, _clock) = test_service();
    let client = ClientConfig::new("web-app");

    let result = service.rotate(Uuid::new_v4(), "whatever", &client).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    ));
}

#[tokio::test]
async fn rotate_rejects_mismatched_string() {
    let (service, _clock) = test_service();
    let client = ClientConfig::new("web-app");

    let issued = service
        .issue(&account_subject(), "device-1", Amr::Pwd, &client)
        .await
        .unwrap();

    let result = service.rotate(issued.id, "not-the-token", &client).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    ));
}

#[tokio::test]
async fn expired_token_is_rejected_on_verify_and_rotate() {
    let (service, clock) = test_service();
    let client = ClientConfig::new("web-app");

    // Otp tokens live ten minutes
    let issued = service
        .issue(&account_subject(), "device-1", Amr::Otp, &client)
        .await
        .unwrap();

    clock.advance(Duration::minutes(11));

    let verified = service.verify("device-1", &issued.token).await;
    assert!(matches!(
        verified.unwrap_err(),
        DomainError::Token(TokenError::ExpiredToken)
    ));
    let rotated = service.rotate(issued.id, &issued.token, &client).await;
    assert!(matches!(
        rotated.unwrap_err(),
        DomainError::Token(TokenError::ExpiredToken)
    ));
}

#[tokio::test]
async fn chain_expiry_caps_rotations() {
    let (service, clock) = test_service();
    let mut client = ClientConfig::new("web-app");
    client.refresh_chain_expiry = Duration::hours(1);

    // Net tokens live three days, far beyond the chain ceiling
    let issued = service
        .issue(&account_subject(), "device-1", Amr::Net, &client)
        .await
        .unwrap();

    clock.advance(Duration::minutes(30));
    let rotated = service.rotate(issued.id, &issued.token, &client).await.unwrap();

    // Past the ceiling the chain dies even though the string itself is fresh
    clock.advance(Duration::minutes(31));
    let result = service.rotate(issued.id, &rotated, &client).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::ExpiredToken)
    ));
}

#[tokio::test]
async fn revoke_removes_the_chain() {
    let (service, _clock) = test_service();
    let client = ClientConfig::new("web-app");

    let issued = service
        .issue(&account_subject(), "device-1", Amr::Pwd, &client)
        .await
        .unwrap();

    service.revoke(issued.id).await.unwrap();

    let verified = service.verify("device-1", &issued.token).await;
    assert!(matches!(
        verified.unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    ));

    // Revoking again reports the chain as already gone
    let again = service.revoke(issued.id).await;
    assert!(matches!(
        again.unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    ));
}

#[tokio::test]
async fn cleanup_removes_only_expired_tokens() {
    let (service, clock) = test_service();
    let client = ClientConfig::new("web-app");

    let short = service
        .issue(&account_subject(), "device-1", Amr::Otp, &client)
        .await
        .unwrap();
    let long = service
        .issue(&account_subject(), "device-2", Amr::Net, &client)
        .await
        .unwrap();

    clock.advance(Duration::minutes(11));

    assert_eq!(service.cleanup_expired().await.unwrap(), 1);
    assert!(service.verify("device-1", &short.token).await.is_err());
    assert!(service.verify("device-2", &long.token).await.is_ok());
}
