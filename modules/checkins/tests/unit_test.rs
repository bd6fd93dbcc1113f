use chrono::NaiveDate;

use checkins::contract::{error::CheckInsError, model::*};
use checkins::domain::error::DomainError;
// Note: These internal module imports are only for testing
// External consumers should only use the `contract` module

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_user_id() {
    let id = UserId::from("abc-123");
    assert_eq!(id.as_str(), "abc-123");
    assert_eq!(id.to_string(), "abc-123");
    assert_eq!(id, UserId::new("abc-123".to_string()));
    assert_eq!(id.into_inner(), "abc-123");
}

#[test]
fn test_contract_errors() {
    let error = CheckInsError::already_checked_in(d("2024-01-02"));
    match error {
        CheckInsError::AlreadyCheckedIn { date } => assert_eq!(date, d("2024-01-02")),
        _ => panic!("Expected AlreadyCheckedIn error"),
    }
    assert!(!error.is_retryable());

    let error = CheckInsError::validation("bad date");
    match &error {
        CheckInsError::Validation { message } => assert_eq!(message, "bad date"),
        _ => panic!("Expected Validation error"),
    }
    assert!(!error.is_retryable());

    let error = CheckInsError::unavailable("db down");
    assert!(error.is_retryable());
    assert_eq!(error.to_string(), "Service unavailable: db down");

    assert_eq!(CheckInsError::internal(), CheckInsError::Internal);
}

#[test]
fn test_domain_errors_map_to_contract() {
    let id = UserId::from("u-1");

    let error: CheckInsError = DomainError::duplicate_check_in(id.clone(), d("2024-01-02")).into();
    assert_eq!(error, CheckInsError::AlreadyCheckedIn { date: d("2024-01-02") });

    let error: CheckInsError = DomainError::invalid_date("2024-13-01").into();
    match error {
        CheckInsError::Validation { message } => assert!(message.contains("2024-13-01")),
        _ => panic!("Expected Validation error"),
    }

    let error: CheckInsError = DomainError::user_not_found(id).into();
    assert_eq!(error, CheckInsError::Internal);

    let error: CheckInsError = DomainError::storage("connection refused").into();
    assert_eq!(error, CheckInsError::unavailable("connection refused"));

    let error: CheckInsError = DomainError::auth("token expired").into();
    assert!(error.is_retryable());
}

#[test]
fn test_domain_error_messages() {
    let error = DomainError::duplicate_check_in(UserId::from("u-1"), d("2024-01-02"));
    assert_eq!(error.to_string(), "User u-1 already checked in on 2024-01-02");

    let error = DomainError::invalid_date("01/02/2024");
    assert_eq!(
        error.to_string(),
        "Invalid date literal '01/02/2024', expected YYYY-MM-DD"
    );
}

#[test]
fn test_user_stats_default() {
    let stats = UserStats::default();
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.max_streak, 0);
    assert_eq!(stats.power, 0);
    assert_eq!(stats.last_check_in_date, None);
}

#[test]
fn test_power_tier_ordering() {
    assert!(PowerTier::Beginner < PowerTier::Novice);
    assert!(PowerTier::Expert < PowerTier::Master);
    assert_eq!(PowerTier::for_power(0), PowerTier::Beginner);
    assert_eq!(PowerTier::for_power(250), PowerTier::Master);
}
