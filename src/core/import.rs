//! Validation and repair of externally supplied ledger documents.
//!
//! Accepted shapes:
//! - `{ "lists": [...], "activeListId": "..." }`
//! - a bare array of lists (the names-ledger format)
//! - `{ "lists": { "<key>": {...}, ... } }`, the keyed-object form realtime
//!   stores produce for arrays
//!
//! Missing ids, titles, timestamps, statuses and amounts are defaulted; every
//! repair is recorded as a warning on the [`ImportReport`].

use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::domain::{
    FeeList, Ledger, NameEntry, PaymentStatus, RecordId, Transaction, TransactionKind,
};
use crate::errors::LedgerError;
use crate::utils::time;

/// Title given to lists imported without one.
pub const PLACEHOLDER_TITLE: &str = "Untitled list";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("invalid format: expected a JSON object or array")]
    NotAnObject,
    #[error("invalid format: document has no `lists` field")]
    MissingLists,
    #[error("invalid format: `lists` must be an array, found {0}")]
    InvalidListsShape(&'static str),
}

/// A repaired ledger and the repairs applied to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub ledger: Ledger,
    pub warnings: Vec<String>,
}

/// Parses `raw` as JSON and normalizes it.
pub fn normalize_str(raw: &str) -> Result<ImportReport, LedgerError> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(normalize(&value)?)
}

pub fn normalize(raw: &Value) -> Result<ImportReport, ImportError> {
    let (entries, active, revision) = match raw {
        Value::Array(items) => (items.iter().collect::<Vec<_>>(), None, 0),
        Value::Object(doc) => {
            let lists = doc.get("lists").ok_or(ImportError::MissingLists)?;
            let entries = match lists {
                Value::Array(items) => items.iter().collect(),
                Value::Object(keyed) => ordered_values(keyed),
                Value::Null => return Err(ImportError::MissingLists),
                other => return Err(ImportError::InvalidListsShape(type_name(other))),
            };
            let active = doc
                .get("activeListId")
                .and_then(Value::as_str)
                .map(str::to_string);
            let revision = doc.get("revision").and_then(Value::as_u64).unwrap_or(0);
            (entries, active, revision)
        }
        _ => return Err(ImportError::NotAnObject),
    };

    let mut normalizer = Normalizer::default();
    let mut ledger = Ledger {
        lists: Vec::with_capacity(entries.len()),
        active_list_id: None,
        revision,
    };
    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            Value::Object(fields) => {
                let list = normalizer.list(fields, &ledger);
                ledger.lists.push(list);
            }
            other => normalizer.warn(format!(
                "skipped list #{index}: expected an object, found {}",
                type_name(other)
            )),
        }
    }

    ledger.active_list_id = active.map(RecordId::from);
    ledger.repair_active();

    debug!(
        lists = ledger.lists.len(),
        warnings = normalizer.warnings.len(),
        "normalized ledger document"
    );
    Ok(ImportReport {
        ledger,
        warnings: normalizer.warnings,
    })
}

#[derive(Default)]
struct Normalizer {
    warnings: Vec<String>,
}

impl Normalizer {
    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn list(&mut self, fields: &Map<String, Value>, ledger: &Ledger) -> FeeList {
        let id = match text_id(fields.get("id")) {
            Some(id) if !ledger.contains_list(id.as_str()) => id,
            Some(id) => {
                let fresh = ledger.fresh_list_id();
                self.warn(format!("list id `{id}` is duplicated; reassigned `{fresh}`"));
                fresh
            }
            None => ledger.fresh_list_id(),
        };

        let title = match fields.get("title").and_then(Value::as_str).map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => {
                self.warn(format!("list `{id}` has no title"));
                PLACEHOLDER_TITLE.to_string()
            }
        };

        let created_at = fields
            .get("createdAt")
            .or_else(|| fields.get("created"))
            .and_then(Value::as_str)
            .and_then(time::parse_timestamp)
            .unwrap_or_else(time::now);

        let amount = match fields.get("amount") {
            None | Some(Value::Null) => None,
            Some(value) => match coerce_number(value) {
                Some(fee) if fee >= 0.0 => Some(fee),
                _ => {
                    self.warn(format!("list `{id}` has an invalid fee amount; cleared"));
                    None
                }
            },
        };

        let mut list = FeeList {
            id,
            title,
            amount,
            created_at,
            names: Vec::new(),
            transactions: Vec::new(),
        };
        for entry in collection(fields.get("names")) {
            if let Some(name) = self.name(entry, &list) {
                list.names.push(name);
            }
        }
        for entry in collection(fields.get("transactions")) {
            if let Some(txn) = self.transaction(entry, &list) {
                list.transactions.push(txn);
            }
        }
        list
    }

    fn name(&mut self, entry: &Value, list: &FeeList) -> Option<NameEntry> {
        let (raw_id, name, status) = match entry {
            Value::String(name) => (None, name.as_str(), PaymentStatus::NotPaid),
            Value::Object(fields) => {
                let status = match fields.get("status").and_then(Value::as_str) {
                    Some(label) => PaymentStatus::from_label(label),
                    None if fields.get("paid").and_then(Value::as_bool) == Some(true) => {
                        PaymentStatus::Paid
                    }
                    None => PaymentStatus::NotPaid,
                };
                let name = fields.get("name").and_then(Value::as_str).unwrap_or("");
                (text_id(fields.get("id")), name, status)
            }
            other => {
                self.warn(format!(
                    "list `{}`: skipped name entry of type {}",
                    list.id,
                    type_name(other)
                ));
                return None;
            }
        };

        let name = name.trim();
        if name.is_empty() {
            self.warn(format!("list `{}`: dropped a blank name", list.id));
            return None;
        }
        let id = match raw_id {
            Some(id) if list.name(id.as_str()).is_none() => id,
            _ => list.fresh_name_id(),
        };
        let mut entry = NameEntry::new(id, name);
        entry.status = status;
        Some(entry)
    }

    fn transaction(&mut self, entry: &Value, list: &FeeList) -> Option<Transaction> {
        let Value::Object(fields) = entry else {
            self.warn(format!(
                "list `{}`: skipped transaction entry of type {}",
                list.id,
                type_name(entry)
            ));
            return None;
        };

        let id = match text_id(fields.get("id")) {
            Some(id) if list.transaction(id.as_str()).is_none() => id,
            _ => list.fresh_transaction_id(),
        };
        let kind = fields
            .get("type")
            .and_then(Value::as_str)
            .map(TransactionKind::from_label)
            .unwrap_or_default();
        let amount = fields.get("amount").and_then(coerce_number).unwrap_or(0.0);
        let date: NaiveDate = fields
            .get("date")
            .and_then(Value::as_str)
            .and_then(time::parse_date)
            .unwrap_or_else(time::today);

        Some(Transaction {
            id,
            kind,
            amount,
            category: text_field(fields, "category"),
            date,
            description: text_field(fields, "description"),
        })
    }
}

/// Items of a JSON array, or the values of a keyed object.
fn collection(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(keyed)) => ordered_values(keyed),
        _ => Vec::new(),
    }
}

/// Values of a keyed object, in numeric key order when every key is an index.
fn ordered_values(keyed: &Map<String, Value>) -> Vec<&Value> {
    let indexed: Option<Vec<(usize, &Value)>> = keyed
        .iter()
        .map(|(key, value)| key.parse::<usize>().ok().map(|index| (index, value)))
        .collect();
    match indexed {
        Some(mut pairs) => {
            pairs.sort_by_key(|(index, _)| *index);
            pairs.into_iter().map(|(_, value)| value).collect()
        }
        None => keyed.values().collect(),
    }
}

fn text_id(value: Option<&Value>) -> Option<RecordId> {
    let id = match value? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    let id = RecordId::from(id);
    (!id.is_blank()).then_some(id)
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().replace(',', "").parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
