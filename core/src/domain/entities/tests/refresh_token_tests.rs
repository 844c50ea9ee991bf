//! Unit tests for the refresh token entity

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::claims::Amr;
use crate::domain::entities::refresh_token::RefreshToken;

fn token_at_start() -> RefreshToken {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    RefreshToken::new(
        "device-7",
        "account|u1|u1@example.com",
        Amr::Pwd,
        "hash-1",
        start,
        start + Duration::minutes(30),
        Duration::days(10),
    )
}

#[test]
fn token_is_expired_after_its_expiry() {
    let token = token_at_start();

    assert!(!token.is_expired(token.expire_at));
    assert!(token.is_expired(token.expire_at + Duration::seconds(1)));
}

#[test]
fn chain_expiry_is_measured_from_creation() {
    let mut token = token_at_start();
    let near_chain_end = token.created_at + Duration::days(10) - Duration::minutes(1);

    // Rotations move the token expiry but not the chain start
    token.rotate("hash-2", near_chain_end + Duration::minutes(30));
    assert_eq!(
        token.created_at,
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    );

    assert!(!token.is_chain_expired(near_chain_end));
    assert!(token.is_chain_expired(token.created_at + Duration::days(10) + Duration::seconds(1)));
}

#[test]
fn rotate_replaces_the_stored_hash() {
    let mut token = token_at_start();
    let new_expiry = token.expire_at + Duration::minutes(30);

    token.rotate("hash-2", new_expiry);

    assert_eq!(token.token_hash, "hash-2");
    assert_eq!(token.expire_at, new_expiry);
}
