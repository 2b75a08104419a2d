//! Person entries tracked on a fee list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable, RecordId};

/// Whether a person has settled the list's fee.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    NotPaid,
}

impl PaymentStatus {
    /// Only the exact label `paid` selects [`PaymentStatus::Paid`].
    pub fn from_label(label: &str) -> Self {
        if label == "paid" {
            PaymentStatus::Paid
        } else {
            PaymentStatus::NotPaid
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PaymentStatus::Paid => PaymentStatus::NotPaid,
            PaymentStatus::NotPaid => PaymentStatus::Paid,
        }
    }

    pub fn is_paid(self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::NotPaid => "not_paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::NotPaid => "Not Paid",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NameEntry {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub status: PaymentStatus,
}

impl NameEntry {
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: PaymentStatus::NotPaid,
        }
    }
}

impl Identifiable for NameEntry {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for NameEntry {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.name, self.status)
    }
}
