use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::FeeList;
use crate::errors::LedgerError;
use crate::utils::time::DATE_FORMAT;

pub const CSV_HEADER: [&str; 5] = ["Date", "Type", "Amount", "Category", "Description"];

/// One row per transaction in list order, every field quoted.
pub fn transactions_csv(list: &FeeList) -> Result<String, LedgerError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for txn in &list.transactions {
        let date = txn.date.format(DATE_FORMAT).to_string();
        let amount = txn.amount.to_string();
        writer.write_record([
            date.as_str(),
            txn.kind.as_str(),
            amount.as_str(),
            txn.category.as_str(),
            txn.description.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| LedgerError::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| LedgerError::Storage(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;

    #[test]
    fn empty_list_has_only_header() {
        let list = FeeList::new(RecordId::from("l1"), "Dues", None);
        assert_eq!(
            transactions_csv(&list).unwrap(),
            "\"Date\",\"Type\",\"Amount\",\"Category\",\"Description\"\n"
        );
    }
}
