use std::path::Path;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::SummaryService;
use crate::core::SyncOutcome;
use crate::export::{self, PrintFilter};

use super::{required, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("totals", "Income, expense and net for the active list", "totals", cmd_totals),
        CommandDefinition::new("summary", "Totals for every list", "summary", cmd_summary),
        CommandDefinition::new(
            "import",
            "Replace all data with a JSON file",
            "import <path>",
            cmd_import,
        ),
        CommandDefinition::new(
            "export-json",
            "Write all data as JSON",
            "export-json <path>",
            cmd_export_json,
        ),
        CommandDefinition::new(
            "export-csv",
            "Write the active list's transactions as CSV",
            "export-csv <path>",
            cmd_export_csv,
        ),
        CommandDefinition::new(
            "print",
            "Write a printable HTML page for the active list",
            "print <path> [all|paid|not_paid]",
            cmd_print,
        ),
        CommandDefinition::new(
            "print-summary",
            "Write a printable HTML summary of every list",
            "print-summary <path>",
            cmd_print_summary,
        ),
        CommandDefinition::new("sync", "Reconcile with the remote copy", "sync", cmd_sync),
    ]
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let list = context.active_list()?;
    let totals = SummaryService::totals_for_list(list, context.manager.income_model());
    let formatter = &context.formatter;
    output::section(format!("Totals: {}", list.title));
    output::info(format!("  Income  : {}", formatter.format(totals.income)));
    output::info(format!("  Expense : {}", formatter.format(totals.expense)));
    output::info(format!("  Net     : {}", formatter.format(totals.net)));
    if list.amount.is_some() {
        output::info(format!(
            "  Owed    : {}",
            formatter.format(SummaryService::outstanding(list))
        ));
    }
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let model = context.manager.income_model();
    let ledger = context.manager.ledger();
    let formatter = &context.formatter;
    output::section("Summary");
    for list in &ledger.lists {
        let totals = SummaryService::totals_for_list(list, model);
        output::info(format!(
            "  {:<24} income {:>14}  expense {:>14}  net {:>14}",
            list.title,
            formatter.format(totals.income),
            formatter.format(totals.expense),
            formatter.format(totals.net)
        ));
    }
    let grand = context.manager.global_totals();
    output::info(format!(
        "  {:<24} income {:>14}  expense {:>14}  net {:>14}",
        "All lists",
        formatter.format(grand.income),
        formatter.format(grand.expense),
        formatter.format(grand.net)
    ));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required(args, 0, "import <path>")?);
    if !context.manager.ledger().is_empty()
        && !context.confirm("Importing replaces every list. Continue?")?
    {
        output::info("Cancelled.");
        return Ok(());
    }
    let warnings = context.manager.import_file(path)?;
    for warning in &warnings {
        output::warning(warning);
    }
    output::success(format!(
        "Imported {} list(s) from {}.",
        context.manager.ledger().lists.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_export_json(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required(args, 0, "export-json <path>")?);
    export::write_json(context.manager.ledger(), path)?;
    output::success(format!("Exported to {}.", path.display()));
    Ok(())
}

fn cmd_export_csv(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required(args, 0, "export-csv <path>")?);
    let csv = export::transactions_csv(context.active_list()?)?;
    export::write_document(path, &csv)?;
    output::success(format!("Exported transactions to {}.", path.display()));
    Ok(())
}

fn cmd_print(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "print <path> [all|paid|not_paid]";
    let path = Path::new(required(args, 0, usage)?);
    let filter = match args.get(1) {
        Some(label) => PrintFilter::from_label(label)
            .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))?,
        None => PrintFilter::All,
    };
    let html = export::print_list_html(
        context.active_list()?,
        filter,
        context.manager.income_model(),
        &context.formatter,
    );
    export::write_document(path, &html)?;
    output::success(format!("Wrote {}. Open it in a browser to print.", path.display()));
    Ok(())
}

fn cmd_print_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required(args, 0, "print-summary <path>")?);
    let html = export::print_summary_html(
        context.manager.ledger(),
        context.manager.income_model(),
        &context.formatter,
    );
    export::write_document(path, &html)?;
    output::success(format!("Wrote {}.", path.display()));
    Ok(())
}

fn cmd_sync(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.manager.sync_now()? {
        None => output::info("No remote configured. Add a `remote` section to config.json."),
        Some(SyncOutcome::Applied { revision }) => {
            output::success(format!("Pulled remote revision {revision}."))
        }
        Some(SyncOutcome::Stale { .. }) => output::success("Pushed local data to the remote."),
        Some(SyncOutcome::Unchanged) => output::info("Already in sync."),
        Some(SyncOutcome::Conflict { revision }) => output::warning(format!(
            "Remote differs at revision {revision}; local data kept."
        )),
        Some(SyncOutcome::Invalid(err)) => {
            output::warning(format!("Remote document ignored: {err}"))
        }
    }
    Ok(())
}
