pub mod list_service;
pub mod name_service;
pub mod summary_service;
pub mod transaction_service;

pub use list_service::ListService;
pub use name_service::NameService;
pub use summary_service::{IncomeModel, NameCounts, SummaryService, Totals};
pub use transaction_service::TransactionService;

use crate::{domain::RecordId, errors::LedgerError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Validation failures reported by the CRUD services. State is unchanged when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("List not found: {0}")]
    ListNotFound(RecordId),
    #[error("Name not found: {0}")]
    NameNotFound(RecordId),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(RecordId),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("Invalid amount: {0} (must be a positive number)")]
    InvalidAmount(f64),
    #[error("Invalid fee amount: {0} (must be zero or more)")]
    InvalidFee(f64),
    #[error("Invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Trims `value`, rejecting it when nothing remains.
pub(crate) fn require_text(value: &str, field: &'static str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ServiceError::EmptyField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
