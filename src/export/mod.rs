//! Output-only renderings of the ledger: JSON documents, CSV, and printable HTML.

pub mod csv;
pub mod json;
pub mod print;

use std::path::Path;

use crate::errors::LedgerError;
use crate::utils::paths::write_atomic;

pub use self::csv::{transactions_csv, CSV_HEADER};
pub use json::{export_json, write_json};
pub use print::{print_list_html, print_summary_html, PrintFilter};

/// Writes a rendered export to `path`, replacing any previous file.
pub fn write_document(path: &Path, contents: &str) -> Result<(), LedgerError> {
    write_atomic(path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote export");
    Ok(())
}
