use super::{BeneficiaryInfo, Direction, Field, TransactionStatus, TransferDraft};

fn beneficiary(nickname: Option<&str>) -> BeneficiaryInfo {
    BeneficiaryInfo {
        id: "b-1".to_string(),
        beneficiary_name: "Asha Rao".to_string(),
        account_number: "ACC100".to_string(),
        bank_name: None,
        nickname: nickname.map(str::to_string)
    }
}

#[test]
fn test_every_draft_mutation_rolls_the_idempotency_key() {
    let mut draft = TransferDraft::new();
    let initial_key = draft.idempotency_key();

    draft.set_to_account("ACC999");
    let after_account = draft.idempotency_key();
    assert_ne!(initial_key, after_account);

    draft.set_amount_text("10");
    assert_ne!(after_account, draft.idempotency_key());

    let unchanged = draft.clone();
    assert_eq!(unchanged.idempotency_key(), draft.idempotency_key());
}

#[test]
fn test_effective_purpose_substitutes_custom_text_for_other() {
    let mut draft = TransferDraft::new();
    draft.set_purpose("Gift");
    draft.set_custom_purpose("ignored");

    assert_eq!(draft.effective_purpose(), "Gift");
    assert_eq!(draft.purpose_field(), Field::Purpose);

    draft.set_purpose("Others");
    draft.set_custom_purpose("  Tuition for spring term  ");

    assert!(draft.uses_custom_purpose());
    assert_eq!(draft.effective_purpose(), "Tuition for spring term");
    assert_eq!(draft.purpose_field(), Field::CustomPurpose);

    draft.set_purpose("other");
    draft.set_custom_purpose("");

    assert_eq!(draft.custom_purpose(), None);
    assert_eq!(draft.effective_purpose(), "");
}

#[test]
fn test_clearing_a_draft_empties_every_field() {
    let mut draft = TransferDraft::new();
    draft.set_to_account("ACC1");
    draft.set_amount_text("5");
    draft.set_purpose("Other");
    draft.set_custom_purpose("Rent");

    assert!(!draft.is_empty());

    draft.clear();

    assert!(draft.is_empty());
    assert_eq!(draft.to_account(), "");
    assert_eq!(draft.amount_text(), "");
}

#[test]
fn test_status_parsing_tolerates_naming_variants() {
    assert_eq!(TransactionStatus::parse("COMPLETED"), TransactionStatus::Completed);
    assert_eq!(TransactionStatus::parse("success"), TransactionStatus::Completed);
    assert_eq!(TransactionStatus::parse(" Pending "), TransactionStatus::Pending);
    assert_eq!(TransactionStatus::parse("approved"), TransactionStatus::Approved);
    assert_eq!(TransactionStatus::parse("DECLINED"), TransactionStatus::Rejected);
    assert_eq!(TransactionStatus::parse("ON_HOLD"), TransactionStatus::Other("ON_HOLD".to_string()));
}

#[test]
fn test_direction_parsing_defaults_to_unknown() {
    assert_eq!(Direction::parse("debit"), Direction::Outbound);
    assert_eq!(Direction::parse("OUTGOING"), Direction::Outbound);
    assert_eq!(Direction::parse("credit"), Direction::Inbound);
    assert_eq!(Direction::parse("sideways"), Direction::Unknown);
}

#[test]
fn test_beneficiary_display_name_prefers_nickname() {
    assert_eq!(beneficiary(Some("Mom")).display_name(), "Mom");
    assert_eq!(beneficiary(Some("  ")).display_name(), "Asha Rao");
    assert_eq!(beneficiary(None).display_name(), "Asha Rao");
}
