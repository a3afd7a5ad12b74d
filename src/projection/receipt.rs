use chrono::{DateTime, FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{CurrencyFormat, Grouping, WorkflowConfig};
use crate::models::{TransactionRecord, TransactionStatus};

const MASK_PREFIX: &str = "****";
const VISIBLE_DIGITS: usize = 4;
const NOT_AVAILABLE: &str = "Not available";

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Info,
    Warning,
    Danger,
    Neutral
}

/// Display-ready rendering of a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptView {
    pub reference: String,
    pub from_account: String,
    pub to_account: String,
    pub amount: String,
    pub purpose: String,
    pub status_label: String,
    pub status_tone: StatusTone,
    pub timestamp: String,
    pub requires_manager_approval: bool
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptFormat {
    PlainText,
    Csv
}

impl ReceiptFormat {
    fn extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Csv => "csv"
        }
    }
}

/// Destination for print renderings.
pub trait PrintSink {
    fn print(&self, document: &str) -> io::Result<()>;
}

/// Keeps the last four characters of an account number.
pub fn mask_account(account: &str) -> String {
    let account = account.trim();
    let length = account.chars().count();

    if length <= VISIBLE_DIGITS {
        return account.to_string();
    }

    let tail: String = account.chars().skip(length - VISIBLE_DIGITS).collect();
    format!("{MASK_PREFIX}{tail}")
}

pub fn format_currency(amount: Decimal, format: &CurrencyFormat) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    format!("{sign}{}{}.{fraction}", format.symbol, group_digits(integer, format.grouping))
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let mut groups = Vec::new();
    let mut rest = digits;
    let mut width = 3;

    while rest.len() > width {
        let (head, tail) = rest.split_at(rest.len() - width);
        groups.push(tail);
        rest = head;

        if grouping == Grouping::Lakh {
            width = 2;
        }
    }

    groups.push(rest);
    groups.reverse();
    groups.join(",")
}

/// Turns server transaction records into receipts and exports them.
#[derive(Debug, Clone)]
pub struct ReceiptProjector {
    currency: CurrencyFormat,
    offset: FixedOffset
}

impl ReceiptProjector {
    pub fn new(config: &WorkflowConfig) -> Self {
        let offset = config.utc_offset_minutes.checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or(Utc.fix());

        Self {
            currency: config.currency.clone(),
            offset
        }
    }

    pub fn project(&self, record: &TransactionRecord) -> ReceiptView {
        let (status_label, status_tone) = status_badge(&record.status, record.requires_manager_approval);

        ReceiptView {
            reference: non_empty_or_placeholder(&record.id),
            from_account: mask_account(&record.from_account),
            to_account: mask_account(&record.to_account),
            amount: format_currency(record.amount, &self.currency),
            purpose: record.purpose.clone(),
            status_label: status_label.to_string(),
            status_tone,
            timestamp: self.format_timestamp(record.created_at),
            requires_manager_approval: record.requires_manager_approval
        }
    }

    fn format_timestamp(&self, timestamp: Option<DateTime<Utc>>) -> String {
        match timestamp {
            Some(timestamp) => timestamp.with_timezone(&self.offset)
                .format("%d %b %Y, %I:%M %p (UTC%:z)")
                .to_string(),
            None => NOT_AVAILABLE.to_string()
        }
    }

    pub fn render(&self, view: &ReceiptView, format: ReceiptFormat) -> anyhow::Result<String> {
        match format {
            ReceiptFormat::PlainText => Ok(render_text(view)),
            ReceiptFormat::Csv => render_csv(view)
        }
    }

    /// Writes the receipt into `directory` and returns the file path.
    pub fn export(&self, view: &ReceiptView, format: ReceiptFormat, directory: &Path) -> anyhow::Result<PathBuf> {
        let path = directory.join(file_name(view, format));
        std::fs::write(&path, self.render(view, format)?)?;

        info!("Receipt [{}] exported to {}", view.reference, path.display());

        Ok(path)
    }

    pub fn print(&self, view: &ReceiptView, sink: &dyn PrintSink) -> io::Result<()> {
        sink.print(&render_text(view))
    }
}

fn status_badge(status: &TransactionStatus, requires_manager_approval: bool) -> (&'static str, StatusTone) {
    match status {
        TransactionStatus::Completed => ("Completed", StatusTone::Success),
        TransactionStatus::Approved => ("Approved", StatusTone::Info),
        TransactionStatus::Pending if requires_manager_approval => ("Pending Approval", StatusTone::Warning),
        TransactionStatus::Pending => ("Pending", StatusTone::Warning),
        TransactionStatus::Rejected => ("Rejected", StatusTone::Danger),
        TransactionStatus::Other(_) => ("Pending", StatusTone::Neutral)
    }
}

fn non_empty_or_placeholder(value: &str) -> String {
    if value.trim().is_empty() { NOT_AVAILABLE.to_string() } else { value.trim().to_string() }
}

fn rows(view: &ReceiptView) -> Vec<(&'static str, &str)> {
    vec![
        ("Reference", view.reference.as_str()),
        ("Date", view.timestamp.as_str()),
        ("From", view.from_account.as_str()),
        ("To", view.to_account.as_str()),
        ("Amount", view.amount.as_str()),
        ("Purpose", view.purpose.as_str()),
        ("Status", view.status_label.as_str())
    ]
}

fn render_text(view: &ReceiptView) -> String {
    let mut body = String::from("Transfer Receipt\n\n");

    for (label, value) in rows(view) {
        body.push_str(&format!("{label:<10} {value}\n"));
    }

    if view.requires_manager_approval {
        body.push_str("\nThis transfer requires manager approval before it is processed.\n");
    }

    body
}

fn render_csv(view: &ReceiptView) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["field", "value"])?;

    for (label, value) in rows(view) {
        writer.write_record([label, value])?;
    }

    let approval = if view.requires_manager_approval { "true" } else { "false" };
    writer.write_record(["Requires manager approval", approval])?;

    let bytes = writer.into_inner().map_err(|error| anyhow::anyhow!("CSV flush failed: {error}"))?;

    Ok(String::from_utf8(bytes)?)
}

fn file_name(view: &ReceiptView, format: ReceiptFormat) -> String {
    let reference: String = view.reference.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let reference = if reference.is_empty() || view.reference == NOT_AVAILABLE { "pending".to_string() } else { reference };

    format!("receipt-{reference}.{}", format.extension())
}
