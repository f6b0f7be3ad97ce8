//! Unit tests for the OTP service

use std::sync::Arc;

use chrono::{Duration, Utc};

use gp_shared::config::OtpConfig;

use crate::errors::{DomainError, OtpError};
use crate::services::cache::{CacheStore, MemoryCacheStore};

use super::service::{OtpChallenge, OtpService};

const PHONE: &str = "09123456789";
const OTHER_PHONE: &str = "09987654321";

fn service() -> (OtpService<MemoryCacheStore>, Arc<MemoryCacheStore>) {
    let cache = Arc::new(MemoryCacheStore::new());
    (OtpService::new(cache.clone(), OtpConfig::default()), cache)
}

fn unwrap_otp_error(result: Result<(), DomainError>) -> OtpError {
    match result.unwrap_err() {
        DomainError::Otp(e) => e,
        other => panic!("expected an OTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_issue_returns_code_of_configured_length() {
    let (service, _) = service();

    let code = service.issue(PHONE).await.unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_issue_within_cooldown_is_rejected() {
    let (service, _) = service();

    service.issue(PHONE).await.unwrap();

    let err = match service.issue(PHONE).await.unwrap_err() {
        DomainError::Otp(e) => e,
        other => panic!("expected an OTP error, got {:?}", other),
    };
    match err {
        OtpError::SendCooldownActive {
            retry_after_seconds,
        } => assert!(retry_after_seconds > 0),
        other => panic!("expected SendCooldownActive, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cooldowns_are_isolated_per_phone() {
    let (service, _) = service();

    // Two different phones inside the same cooldown window both succeed
    service.issue(PHONE).await.unwrap();
    service.issue(OTHER_PHONE).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_issue_allowed_again_after_cooldown() {
    let (service, _) = service();

    service.issue(PHONE).await.unwrap();
    tokio::time::advance(std::time::Duration::from_secs(121)).await;
    service.issue(PHONE).await.unwrap();
}

#[tokio::test]
async fn test_verify_without_challenge_is_not_found() {
    let (service, _) = service();

    let err = unwrap_otp_error(service.verify(PHONE, "123456").await);
    assert_eq!(err, OtpError::ChallengeNotFound);
}

#[tokio::test]
async fn test_verify_succeeds_at_most_once() {
    let (service, _) = service();

    let code = service.issue(PHONE).await.unwrap();
    service.verify(PHONE, &code).await.unwrap();

    // Repeating the same code immediately yields NotFound: the challenge
    // was consumed by the first success
    let err = unwrap_otp_error(service.verify(PHONE, &code).await);
    assert_eq!(err, OtpError::ChallengeNotFound);
}

#[tokio::test]
async fn test_verify_expired_challenge_deletes_it() {
    let (service, cache) = service();

    service.issue(PHONE).await.unwrap();

    // Rewrite the stored challenge with an expiry in the past
    let key = OtpService::<MemoryCacheStore>::otp_key_for_tests(PHONE);
    let stored = cache.get(&key).await.unwrap().unwrap();
    let mut challenge: OtpChallenge = serde_json::from_str(&stored).unwrap();
    challenge.expires_at = Utc::now() - Duration::seconds(1);
    cache
        .set(&key, &serde_json::to_string(&challenge).unwrap(), 60)
        .await
        .unwrap();

    let err = unwrap_otp_error(service.verify(PHONE, &challenge.code).await);
    assert_eq!(err, OtpError::ChallengeExpired);

    // The expired challenge is gone, subsequent attempts see NotFound
    let err = unwrap_otp_error(service.verify(PHONE, &challenge.code).await);
    assert_eq!(err, OtpError::ChallengeNotFound);
}

#[tokio::test]
async fn test_mismatches_count_down_then_lock() {
    let (service, _) = service();

    let code = service.issue(PHONE).await.unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    // Attempts 1-4 report how many more mismatches get an answer: 3, 2, 1, 0
    for expected_remaining in [3u32, 2, 1, 0] {
        let err = unwrap_otp_error(service.verify(PHONE, wrong).await);
        assert_eq!(
            err,
            OtpError::CodeMismatch {
                remaining_attempts: expected_remaining
            }
        );
    }

    // Attempt 5 locks the phone
    let err = unwrap_otp_error(service.verify(PHONE, wrong).await);
    assert_eq!(err, OtpError::AttemptsExhausted);

    // Locked even when the correct code is finally supplied
    let err = unwrap_otp_error(service.verify(PHONE, &code).await);
    assert_eq!(err, OtpError::AttemptsExhausted);
}

#[tokio::test(start_paused = true)]
async fn test_reissue_after_lockout_allows_verification() {
    let (service, _) = service();

    let code = service.issue(PHONE).await.unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    for _ in 0..5 {
        let _ = service.verify(PHONE, wrong).await;
    }
    let err = unwrap_otp_error(service.verify(PHONE, &code).await);
    assert_eq!(err, OtpError::AttemptsExhausted);

    tokio::time::advance(std::time::Duration::from_secs(121)).await;

    let new_code = service.issue(PHONE).await.unwrap();
    service.verify(PHONE, &new_code).await.unwrap();
}

#[tokio::test]
async fn test_issue_overwrites_previous_challenge() {
    let (service, cache) = service();

    let first = service.issue(PHONE).await.unwrap();

    // Clear the cooldown marker to permit an immediate re-issue
    cache.delete(&format!("otp:send:limit:{}", PHONE)).await.unwrap();
    let second = service.issue(PHONE).await.unwrap();

    if first != second {
        let err = unwrap_otp_error(service.verify(PHONE, &first).await);
        assert_eq!(
            err,
            OtpError::CodeMismatch {
                remaining_attempts: 3
            }
        );
    }
    service.verify(PHONE, &second).await.unwrap();
}

#[test]
fn test_code_comparison_is_input_independent() {
    // The same comparison function handles every shape of input and
    // decides on content only through the constant-time primitive
    type Service = OtpService<MemoryCacheStore>;

    assert!(Service::codes_match_for_tests("123456", "123456"));
    assert!(!Service::codes_match_for_tests("123456", "654321"));
    // Length mismatch short-circuits without content inspection
    assert!(!Service::codes_match_for_tests("123456", "12345"));
    assert!(!Service::codes_match_for_tests("123456", ""));
}

#[tokio::test]
async fn test_generated_codes_cover_full_width() {
    let (service, _) = service();

    // Codes keep leading zeros: always exactly six digits
    for _ in 0..32 {
        let code = service.generate_code_for_tests();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}
