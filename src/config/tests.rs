use super::{ConfigError, Grouping, WorkflowConfig};
use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

#[test]
fn test_default_config_matches_documented_limits() -> Result<()> {
    let config = WorkflowConfig::default();

    assert_eq!(config.max_amount, Decimal::from_str("1000000.00")?);
    assert_eq!(config.max_purpose_length, 240);
    assert_eq!(config.recent_recipient_limit, 5);
    assert_eq!(config.currency.grouping, Grouping::Thousands);
    assert!(config.validate().is_ok());

    Ok(())
}

#[test]
fn test_partial_json_keeps_defaults_for_missing_fields() -> Result<()> {
    let config = WorkflowConfig::from_json(r#"{
        "max_amount": "5000",
        "currency": { "symbol": "₹", "grouping": "lakh" },
        "submit_timeout_ms": 1500
    }"#)?;

    assert_eq!(config.max_amount, Decimal::from(5000));
    assert_eq!(config.currency.symbol, "₹");
    assert_eq!(config.currency.grouping, Grouping::Lakh);
    assert_eq!(config.submit_timeout(), Duration::from_millis(1500));
    assert_eq!(config.max_purpose_length, 240);

    Ok(())
}

#[test]
fn test_invalid_json_and_invalid_values_are_rejected() {
    assert!(matches!(WorkflowConfig::from_json("{ not json"), Err(ConfigError::Parse(_))));
    assert!(matches!(WorkflowConfig::from_json(r#"{ "max_amount": "0" }"#), Err(ConfigError::Invalid(_))));
    assert!(matches!(WorkflowConfig::from_json(r#"{ "max_purpose_length": 0 }"#), Err(ConfigError::Invalid(_))));
    assert!(matches!(WorkflowConfig::from_json(r#"{ "utc_offset_minutes": 1440 }"#), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_builder_methods_override_defaults() {
    let config = WorkflowConfig::new()
        .with_max_amount(Decimal::from(10))
        .with_recent_recipient_limit(3)
        .with_lookup_debounce(Duration::from_millis(50))
        .with_lookup_cache_timeout(Duration::from_secs(2))
        .with_utc_offset_minutes(330);

    assert_eq!(config.max_amount, Decimal::from(10));
    assert_eq!(config.recent_recipient_limit, 3);
    assert_eq!(config.lookup_debounce(), Duration::from_millis(50));
    assert_eq!(config.lookup_cache_ttl(), Duration::from_secs(2));
    assert_eq!(config.utc_offset_minutes, 330);
}

#[test]
fn test_builder_values_are_checked_by_validate() {
    assert!(WorkflowConfig::new().with_max_amount(Decimal::ZERO).validate().is_err());
    assert!(WorkflowConfig::new().with_max_purpose_length(0).validate().is_err());
    assert!(WorkflowConfig::new().with_utc_offset_minutes(i32::MAX / 30).validate().is_err());
    assert!(WorkflowConfig::new().with_utc_offset_minutes(i32::MIN).validate().is_err());
    assert!(WorkflowConfig::new().with_submit_timeout(Duration::ZERO).validate().is_err());
    assert!(WorkflowConfig::new().with_utc_offset_minutes(-(23 * 60 + 59)).validate().is_ok());
}
