//! Standalone HTML documents meant for a browser's print dialog.

use std::fmt::Write as _;

use crate::core::services::{IncomeModel, SummaryService};
use crate::currency::MoneyFormatter;
use crate::domain::{FeeList, Ledger, PaymentStatus};
use crate::utils::time::DATE_FORMAT;

/// Which names a printed list includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrintFilter {
    #[default]
    All,
    Paid,
    NotPaid,
}

impl PrintFilter {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "paid" => Some(Self::Paid),
            "not_paid" | "not-paid" | "unpaid" => Some(Self::NotPaid),
            _ => None,
        }
    }

    pub fn includes(self, status: PaymentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Paid => status == PaymentStatus::Paid,
            Self::NotPaid => status == PaymentStatus::NotPaid,
        }
    }

    fn caption(self) -> &'static str {
        match self {
            Self::All => "All names",
            Self::Paid => "Paid names",
            Self::NotPaid => "Unpaid names",
        }
    }
}

pub fn print_list_html(
    list: &FeeList,
    filter: PrintFilter,
    model: IncomeModel,
    formatter: &MoneyFormatter,
) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h2>{}</h2>", escape_html(&list.title));
    let _ = writeln!(
        body,
        "<p>Fee per person: {}<br>Created: {}</p>",
        escape_html(&formatter.format_optional(list.amount)),
        list.created_at.format(DATE_FORMAT)
    );

    let _ = writeln!(body, "<h3>{}</h3>", filter.caption());
    body.push_str("<table>\n<tr><th>#</th><th>Name</th><th>Status</th></tr>\n");
    let shown = list
        .names
        .iter()
        .filter(|entry| filter.includes(entry.status));
    for (index, entry) in shown.enumerate() {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            index + 1,
            escape_html(&entry.name),
            entry.status
        );
    }
    body.push_str("</table>\n");

    if !list.transactions.is_empty() {
        body.push_str("<h3>Transactions</h3>\n<table>\n");
        body.push_str(
            "<tr><th>Date</th><th>Type</th><th>Amount</th><th>Category</th><th>Description</th></tr>\n",
        );
        for txn in &list.transactions {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                txn.date.format(DATE_FORMAT),
                txn.kind,
                escape_html(&formatter.format(txn.amount)),
                escape_html(&txn.category),
                escape_html(&txn.description)
            );
        }
        body.push_str("</table>\n");
    }

    let totals = SummaryService::totals_for_list(list, model);
    let counts = SummaryService::name_counts(list);
    let _ = writeln!(
        body,
        "<p>Paid: {} of {}<br>Income: {}<br>Expense: {}<br>Net: {}</p>",
        counts.paid,
        counts.total(),
        escape_html(&formatter.format(totals.income)),
        escape_html(&formatter.format(totals.expense)),
        escape_html(&formatter.format(totals.net))
    );

    document(&list.title, &body)
}

/// Per-list income, expense and net with a grand total row.
pub fn print_summary_html(ledger: &Ledger, model: IncomeModel, formatter: &MoneyFormatter) -> String {
    let mut body = String::from("<h2>Summary</h2>\n<table>\n");
    body.push_str("<tr><th>List</th><th>Income</th><th>Expense</th><th>Net</th></tr>\n");
    for list in &ledger.lists {
        let totals = SummaryService::totals_for_list(list, model);
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&list.title),
            escape_html(&formatter.format(totals.income)),
            escape_html(&formatter.format(totals.expense)),
            escape_html(&formatter.format(totals.net))
        );
    }
    let grand = SummaryService::global_totals(ledger, model);
    let _ = writeln!(
        body,
        "<tr><th>Total</th><th>{}</th><th>{}</th><th>{}</th></tr>",
        escape_html(&formatter.format(grand.income)),
        escape_html(&formatter.format(grand.expense)),
        escape_html(&formatter.format(grand.net))
    );
    body.push_str("</table>\n");
    document("Summary", &body)
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>table {{ border-collapse: collapse; }} th, td {{ border: 1px solid #444; padding: 6px 10px; }}</style>\n\
         </head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
