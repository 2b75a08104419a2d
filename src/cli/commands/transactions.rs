use crate::cli::context::{resolve_reference, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::domain::{RecordId, TransactionDraft, TransactionPatch};

use super::{parse_amount, required, CommandDefinition};

const ADD_USAGE: &str = "add-tx <income|expense> <amount> [category] [date] [description]";
const EDIT_USAGE: &str = "edit-tx <transaction> key=value... (type, amount, category, date, description)";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add-tx",
            "Record income or an expense on the active list",
            ADD_USAGE,
            cmd_add_tx,
        ),
        CommandDefinition::new("edit-tx", "Change fields of a transaction", EDIT_USAGE, cmd_edit_tx),
        CommandDefinition::new(
            "delete-tx",
            "Delete a transaction",
            "delete-tx <transaction>",
            cmd_delete_tx,
        ),
    ]
}

fn parse_kind(raw: &str) -> Result<String, CommandError> {
    let kind = raw.trim().to_ascii_lowercase();
    match kind.as_str() {
        "income" | "expense" => Ok(kind),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{raw}` is not a transaction type (use income or expense)"
        ))),
    }
}

fn resolve_transaction(
    context: &ShellContext,
    arg: &str,
) -> Result<(RecordId, RecordId), CommandError> {
    let list = context.active_list()?;
    let txn_id = resolve_reference(&list.transactions, arg).ok_or_else(|| {
        CommandError::InvalidArguments(format!("No transaction matches `{arg}`."))
    })?;
    Ok((list.id.clone(), txn_id))
}

fn cmd_add_tx(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = parse_kind(required(args, 0, ADD_USAGE)?)?;
    let amount = parse_amount(required(args, 1, ADD_USAGE)?)?;
    let mut draft = TransactionDraft::new(kind, amount);
    if let Some(category) = args.get(2) {
        draft = draft.with_category(*category);
    }
    if let Some(date) = args.get(3) {
        draft = draft.on(*date);
    }
    if let Some(rest) = args.get(4..).filter(|rest| !rest.is_empty()) {
        draft = draft.with_description(rest.join(" "));
    }

    let list_id = context.active_list_id()?;
    let id = context.manager.add_transaction(list_id.as_str(), draft)?;
    output::success(format!(
        "Recorded {} of {} [{}].",
        args[0].to_ascii_lowercase(),
        context.formatter.format(amount),
        id
    ));
    Ok(())
}

pub(crate) fn parse_patch(assignments: &[&str]) -> Result<TransactionPatch, CommandError> {
    let mut patch = TransactionPatch::default();
    for assignment in assignments {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected key=value, got `{assignment}`"))
        })?;
        match key.trim().to_ascii_lowercase().as_str() {
            "type" | "kind" => patch.kind = Some(parse_kind(value)?),
            "amount" => patch.amount = Some(parse_amount(value)?),
            "category" => patch.category = Some(value.to_string()),
            "date" => patch.date = Some(value.to_string()),
            "description" | "desc" => patch.description = Some(value.to_string()),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}`"
                )))
            }
        }
    }
    Ok(patch)
}

fn cmd_edit_tx(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (list_id, txn_id) = resolve_transaction(context, required(args, 0, EDIT_USAGE)?)?;
    let patch = parse_patch(&args[1..])?;
    if !patch.has_effect() {
        return Err(CommandError::InvalidArguments(format!("usage: {EDIT_USAGE}")));
    }
    context
        .manager
        .edit_transaction(list_id.as_str(), txn_id.as_str(), patch)?;
    output::success("Transaction updated.");
    Ok(())
}

fn cmd_delete_tx(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (list_id, txn_id) = resolve_transaction(context, required(args, 0, "delete-tx <transaction>")?)?;
    if !context.confirm("Delete this transaction?")? {
        output::info("Cancelled.");
        return Ok(());
    }
    match context
        .manager
        .delete_transaction(list_id.as_str(), txn_id.as_str())?
    {
        Some(removed) => output::success(format!(
            "Deleted {} of {}.",
            removed.kind.as_str(),
            context.formatter.format(removed.amount)
        )),
        None => output::warning("Transaction not found; nothing deleted."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_parses_known_fields() {
        let patch = parse_patch(&["amount=1,200", "type=Expense", "description=Bus fare"]).unwrap();
        assert_eq!(patch.amount, Some(1200.0));
        assert_eq!(patch.kind.as_deref(), Some("expense"));
        assert_eq!(patch.description.as_deref(), Some("Bus fare"));
        assert!(patch.category.is_none());
    }

    #[test]
    fn patch_rejects_unknown_or_malformed_fields() {
        assert!(parse_patch(&["colour=red"]).is_err());
        assert!(parse_patch(&["amount"]).is_err());
        assert!(parse_patch(&["type=gift"]).is_err());
    }
}
