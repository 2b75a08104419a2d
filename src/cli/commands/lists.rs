use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::SummaryService;
use crate::domain::{Displayable, RecordId};
use crate::utils::time::DATE_FORMAT;

use super::{parse_optional_amount, required, CommandDefinition};

const COPY_NAMES_FLAG: &str = "--copy-names";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("lists", "Show every list", "lists", cmd_lists),
        CommandDefinition::new(
            "new-list",
            "Create a list and make it active",
            "new-list <title> [amount] [--copy-names]",
            cmd_new_list,
        ),
        CommandDefinition::new("use", "Make a list active", "use <list>", cmd_use),
        CommandDefinition::new("show", "Show the active list", "show", cmd_show),
        CommandDefinition::new(
            "rename-list",
            "Rename the active list",
            "rename-list <title>",
            cmd_rename_list,
        ),
        CommandDefinition::new(
            "set-amount",
            "Set or clear the fee per person",
            "set-amount <amount|none>",
            cmd_set_amount,
        ),
        CommandDefinition::new(
            "duplicate-list",
            "Copy a list with its names and transactions",
            "duplicate-list [list]",
            cmd_duplicate_list,
        ),
        CommandDefinition::new(
            "delete-list",
            "Delete a list",
            "delete-list [list]",
            cmd_delete_list,
        ),
    ]
}

fn cmd_lists(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.manager.ledger();
    if ledger.is_empty() {
        output::info("No lists yet. Create one with `new-list <title> [amount]`.");
        return Ok(());
    }
    output::section("Lists");
    let active = ledger.active_list_id.as_ref();
    for (index, list) in ledger.lists.iter().enumerate() {
        let marker = if Some(&list.id) == active { "*" } else { " " };
        output::info(format!(
            "{marker} {:>2}. {}  [{}]",
            index + 1,
            list.display_label(),
            list.id
        ));
    }
    Ok(())
}

fn cmd_new_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "new-list <title> [amount] [--copy-names]";
    let copy_names = args.contains(&COPY_NAMES_FLAG);
    let positional: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| *arg != COPY_NAMES_FLAG)
        .collect();
    let title = required(&positional, 0, usage)?;
    let amount = match positional.get(1) {
        Some(raw) => parse_optional_amount(raw)?,
        None => None,
    };

    let source = if copy_names {
        Some(context.active_list_id()?)
    } else {
        None
    };
    let id = context
        .manager
        .create_list(title, amount, source.as_ref().map(|id| id.as_str()))?;
    output::success(format!("Created list `{}` [{}].", title.trim(), id));
    Ok(())
}

fn cmd_use(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.resolve_list(required(args, 0, "use <list>")?)?;
    context.manager.select_list(id.as_str())?;
    let title = context.active_list()?.title.clone();
    output::success(format!("Active list: {title}"));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let list = context.active_list()?;
    let formatter = &context.formatter;
    let totals = SummaryService::totals_for_list(list, context.manager.income_model());
    let counts = SummaryService::name_counts(list);

    output::section(&list.title);
    output::info(format!("  Fee per person : {}", formatter.format_optional(list.amount)));
    output::info(format!("  Created        : {}", list.created_at.format(DATE_FORMAT)));
    output::info(format!(
        "  Paid           : {} of {}",
        counts.paid,
        counts.total()
    ));

    if list.names.is_empty() {
        output::info("  No names yet.");
    } else {
        output::info("  Names:");
        for (index, entry) in list.names.iter().enumerate() {
            output::info(format!(
                "  {:>3}. {:<24} {:<9} [{}]",
                index + 1,
                entry.name,
                entry.status.to_string(),
                entry.id
            ));
        }
    }

    if !list.transactions.is_empty() {
        output::info("  Transactions:");
        for (index, txn) in list.transactions.iter().enumerate() {
            output::info(format!(
                "  {:>3}. {} {:<7} {:>14} {} {} [{}]",
                index + 1,
                txn.date.format(DATE_FORMAT),
                txn.kind.to_string(),
                formatter.format(txn.amount),
                txn.category,
                txn.description,
                txn.id
            ));
        }
    }

    output::info(format!(
        "  Income {}  Expense {}  Net {}",
        formatter.format(totals.income),
        formatter.format(totals.expense),
        formatter.format(totals.net)
    ));
    Ok(())
}

fn cmd_rename_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let title = required(args, 0, "rename-list <title>")?;
    let id = context.active_list_id()?;
    context.manager.rename_list(id.as_str(), title)?;
    output::success(format!("Renamed list to `{}`.", title.trim()));
    Ok(())
}

fn cmd_set_amount(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let amount = parse_optional_amount(required(args, 0, "set-amount <amount|none>")?)?;
    let id = context.active_list_id()?;
    context.manager.set_list_amount(id.as_str(), amount)?;
    output::success(format!(
        "Fee per person: {}",
        context.formatter.format_optional(amount)
    ));
    Ok(())
}

fn target_list(context: &ShellContext, args: &[&str]) -> Result<RecordId, CommandError> {
    match args.first() {
        Some(arg) => context.resolve_list(arg),
        None => context.active_list_id(),
    }
}

fn cmd_duplicate_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = target_list(context, args)?;
    match context.manager.duplicate_list(id.as_str())? {
        Some(copy) => {
            let title = context.active_list()?.title.clone();
            output::success(format!("Created `{}` [{}].", title, copy));
        }
        None => output::warning("List not found; nothing duplicated."),
    }
    Ok(())
}

fn cmd_delete_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = target_list(context, args)?;
    let title = context
        .manager
        .ledger()
        .find_list(id.as_str())
        .map(|list| list.title.clone())
        .unwrap_or_default();
    if !context.confirm(&format!("Delete list `{title}`?"))? {
        output::info("Cancelled.");
        return Ok(());
    }
    match context.manager.delete_list(id.as_str())? {
        Some(removed) => output::success(format!("Deleted list `{}`.", removed.title)),
        None => output::warning("List not found; nothing deleted."),
    }
    Ok(())
}
