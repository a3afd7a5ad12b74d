use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use transfer_workflow::api::HistoryEntryPayload;
use transfer_workflow::projection::{PrintSink, ReceiptFormat};
use transfer_workflow::session::schedule_forced_sign_out;
use transfer_workflow::{
    ConfirmOutcome, InMemoryBankingApi, Phase, SessionContext, SessionControl, TransferWorkflow, WorkflowConfig,
    WorkflowError
};

fn seeded_api() -> InMemoryBankingApi {
    let mut api = InMemoryBankingApi::new()
        .with_account("Dev Patel", "ACC001", Decimal::from(10_000))
        .with_beneficiary("b-1", "Asha Rao", "ACC100", Some("First Bank"))
        .with_known_account("ACC777", "Meera Iyer");

    for to_account in ["ACC100", "ACC200", "ACC300", "ACC100", "ACC400", "ACC500", "ACC600"] {
        api = api.with_history(HistoryEntryPayload {
            direction: Some("OUTBOUND".to_string()),
            to_account: Some(to_account.to_string()),
            amount: Some(Decimal::ONE),
            ..Default::default()
        });
    }

    api.with_history(HistoryEntryPayload {
        direction: Some("INBOUND".to_string()),
        from_account: Some("ACC900".to_string()),
        amount: Some(Decimal::ONE),
        ..Default::default()
    })
}

#[derive(Default)]
struct CapturingPrinter {
    documents: Mutex<Vec<String>>
}

impl PrintSink for CapturingPrinter {
    fn print(&self, document: &str) -> io::Result<()> {
        self.documents.lock().map_err(|_| io::Error::other("poisoned"))?.push(document.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSession {
    reasons: Mutex<Vec<String>>
}

#[async_trait]
impl SessionControl for RecordingSession {
    async fn sign_out(&self, reason: &str) -> Result<()> {
        self.reasons.lock().map_err(|_| anyhow!("poisoned"))?.push(reason.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn test_transfer_to_saved_beneficiary_end_to_end() -> Result<()> {
    let api = Arc::new(seeded_api());
    let workflow = TransferWorkflow::start(SessionContext::new("u-1", "ROLE_CUSTOMER"), api.clone(), WorkflowConfig::default()).await?;

    assert_eq!(workflow.recent_recipients(), vec!["ACC100", "ACC200", "ACC300", "ACC400", "ACC500"]);

    workflow.select_beneficiary("b-1").await?;
    workflow.set_amount("1234.5")?;
    workflow.set_purpose("Other")?;
    workflow.set_custom_purpose("  School fees ")?;

    let payload = workflow.submit()?;

    assert_eq!(payload.to_account, "ACC100");
    assert_eq!(payload.purpose, "School fees");
    assert_eq!(payload.projected_balance, Some(Decimal::new(876_550, 2)));
    assert_eq!(workflow.phase(), Phase::AwaitingConfirmation);

    assert!(matches!(workflow.confirm().await, ConfirmOutcome::Completed(_)));
    assert_eq!(api.submit_calls(), 1);

    let receipt = workflow.receipt().ok_or_else(|| anyhow!("receipt missing"))?;

    assert_eq!(receipt.from_account, "****C001");
    assert_eq!(receipt.to_account, "****C100");
    assert_eq!(receipt.amount, "$1,234.50");
    assert_eq!(receipt.status_label, "Completed");
    assert_eq!(receipt.timestamp, "Not available");

    let directory = tempfile::tempdir()?;
    let text_path = workflow.receipts().export(&receipt, ReceiptFormat::PlainText, directory.path())?;
    let csv_path = workflow.receipts().export(&receipt, ReceiptFormat::Csv, directory.path())?;

    let text = std::fs::read_to_string(&text_path)?;
    assert!(text.contains("****C100"));
    assert!(text.contains("$1,234.50"));

    let mut reader = csv::Reader::from_path(&csv_path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push((record[0].to_string(), record[1].to_string()));
    }
    assert!(rows.contains(&("Status".to_string(), "Completed".to_string())));

    let printer = CapturingPrinter::default();
    workflow.receipts().print(&receipt, &printer)?;
    assert_eq!(printer.documents.lock().map_err(|_| anyhow!("poisoned"))?.len(), 1);

    assert!(workflow.dismiss_receipt());
    assert_eq!(workflow.view().phase, Phase::Drafting);

    Ok(())
}

#[tokio::test]
async fn test_overdraft_never_reaches_the_backend() -> Result<()> {
    let api = Arc::new(seeded_api());
    let workflow = TransferWorkflow::start(SessionContext::new("u-1", "customer"), api.clone(), WorkflowConfig::default()).await?;

    workflow.set_to_account("ACC777")?;
    workflow.set_amount("10000.01")?;
    workflow.set_purpose("Rent")?;

    let view = workflow.view();
    assert!(!view.can_submit);
    assert_eq!(view.projected_balance, Some(Decimal::new(-1, 2)));

    assert!(matches!(workflow.submit(), Err(WorkflowError::Validation(_))));
    assert_eq!(workflow.confirm().await, ConfirmOutcome::Ignored);
    assert_eq!(api.submit_calls(), 0);

    Ok(())
}

#[tokio::test]
async fn test_manual_recipient_lookup_uses_cache() -> Result<()> {
    let api = Arc::new(seeded_api());
    let config = WorkflowConfig::from_json(r#"{ "lookup_debounce_ms": 5 }"#)?;
    let workflow = TransferWorkflow::start(SessionContext::new("u-1", "customer"), api.clone(), config).await?;

    let holder = workflow.lookup_recipient(" ACC777 ").await.ok_or_else(|| anyhow!("holder missing"))?;
    assert_eq!(holder.holder_name, "Meera Iyer");

    workflow.lookup_recipient("ACC777").await;
    assert_eq!(api.lookup_calls(), 1);

    assert!(workflow.lookup_recipient("ACC404").await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_only_customers_can_initiate_transfers() -> Result<()> {
    let api = Arc::new(seeded_api());

    assert!(TransferWorkflow::start(SessionContext::new("c-1", "user"), api.clone(), WorkflowConfig::default()).await.is_ok());

    for role in ["ROLE_AUDITOR", "manager", "admin", "teller"] {
        let denied = TransferWorkflow::start(SessionContext::new("x-1", role), api.clone(), WorkflowConfig::default()).await;
        assert!(matches!(denied, Err(WorkflowError::AccessDenied(_))), "{role} should be denied");
    }

    Ok(())
}

#[tokio::test]
async fn test_forced_sign_out_fires_after_delay() -> Result<()> {
    let session = Arc::new(RecordingSession::default());
    let countdown = schedule_forced_sign_out(session.clone(), Duration::from_millis(20), "Password changed");

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(countdown.is_finished());
    assert_eq!(*session.reasons.lock().map_err(|_| anyhow!("poisoned"))?, vec!["Password changed".to_string()]);

    Ok(())
}
