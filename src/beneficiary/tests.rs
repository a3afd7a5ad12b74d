use super::{BeneficiaryResolver, RecipientLookup, ResolveError};
use crate::api::InMemoryBankingApi;
use crate::models::BeneficiarySource;
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn api() -> Arc<InMemoryBankingApi> {
    Arc::new(
        InMemoryBankingApi::new()
            .with_account("Dev Patel", "ACC001", Decimal::from(5000))
            .with_beneficiary("b-1", "Asha Rao", "ACC100", Some("First Bank"))
            .with_beneficiary("b-2", "Ravi Kumar", "ACC200", None)
            .with_known_account("ACC777", "Meera Shah")
    )
}

#[tokio::test]
async fn test_resolve_prefers_verified_detail() -> Result<()> {
    let resolver = BeneficiaryResolver::new(api());
    resolver.load_list().await?;

    let resolved = resolver.resolve("b-1").await?;

    assert_eq!(resolved.source, BeneficiarySource::Verified);
    assert!(resolved.is_verified());
    assert_eq!(resolved.info.bank_name.as_deref(), Some("First Bank"));

    Ok(())
}

#[tokio::test]
async fn test_resolve_falls_back_to_saved_list_on_fetch_failure() -> Result<()> {
    let api = api();
    let resolver = BeneficiaryResolver::new(api.clone());
    let saved = resolver.load_list().await?;

    assert_eq!(saved.len(), 2);

    api.set_fail_beneficiary_details(true);
    let resolved = resolver.resolve("b-1").await?;

    assert_eq!(resolved.source, BeneficiarySource::Cached);
    assert_eq!(resolved.info.account_number, "ACC100");
    assert_eq!(resolved.info.bank_name, None);

    Ok(())
}

#[tokio::test]
async fn test_resolve_without_detail_or_saved_entry_is_not_found() {
    let api = api();
    let resolver = BeneficiaryResolver::new(api.clone());
    api.set_fail_beneficiary_details(true);

    assert_eq!(resolver.resolve("b-1").await, Err(ResolveError::NotFound("b-1".to_string())));
}

#[tokio::test]
async fn test_reloading_the_list_replaces_previous_entries() -> Result<()> {
    let resolver = BeneficiaryResolver::new(Arc::new(InMemoryBankingApi::new()));

    assert!(resolver.load_list().await?.is_empty());
    assert!(resolver.saved("b-1").is_none());

    Ok(())
}

#[tokio::test]
async fn test_lookup_resolves_and_caches_known_accounts() {
    let api = api();
    let lookup = RecipientLookup::new(api.clone(), Duration::from_millis(5), 16, Duration::from_secs(60));

    let first = lookup.lookup(" ACC777 ").await;
    let second = lookup.lookup("ACC777").await;

    assert_eq!(first.as_ref().map(|holder| holder.holder_name.as_str()), Some("Meera Shah"));
    assert_eq!(first, second);
    assert_eq!(api.lookup_calls(), 1);
}

#[tokio::test]
async fn test_lookup_degrades_to_none_for_unknown_or_blank_accounts() {
    let api = api();
    let lookup = RecipientLookup::new(api.clone(), Duration::from_millis(5), 16, Duration::from_secs(60));

    assert_eq!(lookup.lookup("ACC404").await, None);
    assert_eq!(lookup.lookup("   ").await, None);
    assert_eq!(api.lookup_calls(), 1);
}

#[tokio::test]
async fn test_lookup_only_fetches_after_typing_settles() {
    let api = api();
    let lookup = RecipientLookup::new(api.clone(), Duration::from_millis(40), 16, Duration::from_secs(60));

    let typing = async {
        lookup.lookup("ACC7").await
    };
    let settled = async {
        sleep(Duration::from_millis(10)).await;
        lookup.lookup("ACC777").await
    };

    let (typing, settled) = tokio::join!(typing, settled);

    assert_eq!(typing, None);
    assert!(settled.is_some());
    assert_eq!(api.lookup_calls(), 1);
}

#[tokio::test]
async fn test_lookup_cache_expires_after_ttl() {
    let api = api();
    let lookup = RecipientLookup::new(api.clone(), Duration::from_millis(1), 16, Duration::from_millis(50));

    assert!(lookup.lookup("ACC777").await.is_some());
    sleep(Duration::from_millis(120)).await;
    assert!(lookup.lookup("ACC777").await.is_some());

    assert_eq!(api.lookup_calls(), 2);
}
