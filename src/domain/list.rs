//! Fee lists: a titled grouping owning its names and transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    common::{Displayable, Identifiable, RecordId},
    name::{NameEntry, PaymentStatus},
    transaction::Transaction,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeeList {
    pub id: RecordId,
    pub title: String,
    /// Flat fee charged per person.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub names: Vec<NameEntry>,
    /// Newest first.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl FeeList {
    pub fn new(id: RecordId, title: impl Into<String>, amount: Option<f64>) -> Self {
        Self {
            id,
            title: title.into(),
            amount,
            created_at: Utc::now(),
            names: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn name(&self, id: &str) -> Option<&NameEntry> {
        self.names.iter().find(|entry| entry.id.as_str() == id)
    }

    pub fn name_mut(&mut self, id: &str) -> Option<&mut NameEntry> {
        self.names.iter_mut().find(|entry| entry.id.as_str() == id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id.as_str() == id)
    }

    pub fn transaction_mut(&mut self, id: &str) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id.as_str() == id)
    }

    /// Identifier not yet used by any name on this list.
    pub fn fresh_name_id(&self) -> RecordId {
        RecordId::generate_unique(|candidate| self.name(candidate).is_some())
    }

    /// Identifier not yet used by any transaction on this list.
    pub fn fresh_transaction_id(&self) -> RecordId {
        RecordId::generate_unique(|candidate| self.transaction(candidate).is_some())
    }

    pub fn count_with_status(&self, status: PaymentStatus) -> usize {
        self.names.iter().filter(|entry| entry.status == status).count()
    }
}

impl Identifiable for FeeList {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for FeeList {
    fn display_label(&self) -> String {
        format!(
            "{} ({} names, {} transactions)",
            self.title,
            self.names.len(),
            self.transactions.len()
        )
    }
}
