//! Income and expense entries recorded against a fee list.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable, RecordId};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Income,
    Expense,
}

impl TransactionKind {
    /// Only the exact label `expense` selects [`TransactionKind::Expense`].
    pub fn from_label(label: &str) -> Self {
        if label == "expense" {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    /// Amount with its sign applied (expenses negative).
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{} {} {} [{}]", self.date, self.kind, self.amount, self.id)
    }
}

/// User-supplied fields for a new transaction, validated on insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub kind: String,
    pub amount: f64,
    pub category: String,
    /// `YYYY-MM-DD`; blank means today.
    pub date: Option<String>,
    pub description: String,
}

impl TransactionDraft {
    pub fn new(kind: impl Into<String>, amount: f64) -> Self {
        Self {
            kind: kind.into(),
            amount,
            ..Self::default()
        }
    }

    pub fn income(amount: f64) -> Self {
        Self::new("income", amount)
    }

    pub fn expense(amount: f64) -> Self {
        Self::new("expense", amount)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update for an existing transaction. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub kind: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl TransactionPatch {
    pub fn has_effect(&self) -> bool {
        self.kind.is_some()
            || self.amount.is_some()
            || self.category.is_some()
            || self.date.is_some()
            || self.description.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_expense_label_is_expense() {
        assert_eq!(TransactionKind::from_label("expense"), TransactionKind::Expense);
        assert_eq!(TransactionKind::from_label("Expense"), TransactionKind::Income);
        assert_eq!(TransactionKind::from_label("refund"), TransactionKind::Income);
    }

    #[test]
    fn serializes_kind_under_type_key() {
        let txn = Transaction {
            id: RecordId::from("t1"),
            kind: TransactionKind::Expense,
            amount: 1500.0,
            category: "Printing".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            description: String::new(),
        };
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["date"], "2024-03-09");
        assert_eq!(txn.signed_amount(), -1500.0);
    }

    #[test]
    fn empty_patch_has_no_effect() {
        assert!(!TransactionPatch::default().has_effect());
        let patch = TransactionPatch {
            amount: Some(10.0),
            ..TransactionPatch::default()
        };
        assert!(patch.has_effect());
    }
}
