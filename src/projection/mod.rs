mod balance;
mod receipt;
mod recipients;

pub use balance::project_balance;
pub use receipt::{format_currency, mask_account, PrintSink, ReceiptFormat, ReceiptProjector, ReceiptView, StatusTone};
pub use recipients::recent_recipients;
