pub mod common;
pub mod ledger;
pub mod list;
pub mod name;
pub mod transaction;

pub use common::{Displayable, Identifiable, RecordId};
pub use ledger::Ledger;
pub use list::FeeList;
pub use name::{NameEntry, PaymentStatus};
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionPatch};

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
