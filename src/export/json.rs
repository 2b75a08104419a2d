use std::path::Path;

use crate::domain::Ledger;
use crate::errors::LedgerError;

/// Pretty-printed ledger document, readable back through import.
pub fn export_json(ledger: &Ledger) -> Result<String, LedgerError> {
    Ok(serde_json::to_string_pretty(ledger)?)
}

pub fn write_json(ledger: &Ledger, path: &Path) -> Result<(), LedgerError> {
    let json = export_json(ledger)?;
    super::write_document(path, &json)
}
