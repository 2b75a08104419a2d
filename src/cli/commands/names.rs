use crate::cli::context::{resolve_reference, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::domain::RecordId;

use super::{required, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add-name",
            "Add a person to the active list",
            "add-name <name>",
            cmd_add_name,
        ),
        CommandDefinition::new(
            "toggle",
            "Flip a person between paid and not paid",
            "toggle <name>",
            cmd_toggle,
        ),
        CommandDefinition::new(
            "edit-name",
            "Change a person's name",
            "edit-name <name> <new name>",
            cmd_edit_name,
        ),
        CommandDefinition::new(
            "delete-name",
            "Remove a person from the active list",
            "delete-name <name>",
            cmd_delete_name,
        ),
        CommandDefinition::new(
            "clear-unpaid",
            "Remove everyone who has not paid",
            "clear-unpaid",
            cmd_clear_unpaid,
        ),
    ]
}

/// Active list id plus the name `arg` points at.
fn resolve_name(context: &ShellContext, arg: &str) -> Result<(RecordId, RecordId), CommandError> {
    let list = context.active_list()?;
    let name_id = resolve_reference(&list.names, arg)
        .ok_or_else(|| CommandError::InvalidArguments(format!("No name matches `{arg}`.")))?;
    Ok((list.id.clone(), name_id))
}

fn cmd_add_name(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    let list_id = context.active_list_id()?;
    let id = context.manager.add_name(list_id.as_str(), &name)?;
    output::success(format!("Added `{}` [{}].", name.trim(), id));
    Ok(())
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (list_id, name_id) = resolve_name(context, required(args, 0, "toggle <name>")?)?;
    match context
        .manager
        .toggle_name_status(list_id.as_str(), name_id.as_str())?
    {
        Some(status) => {
            let name = context
                .manager
                .ledger()
                .find_name(list_id.as_str(), name_id.as_str())
                .map(|entry| entry.name.clone())
                .unwrap_or_default();
            output::success(format!("{name}: {status}"));
        }
        None => output::warning("Name not found; nothing changed."),
    }
    Ok(())
}

fn cmd_edit_name(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "edit-name <name> <new name>";
    let (list_id, name_id) = resolve_name(context, required(args, 0, usage)?)?;
    let new_name = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
    context
        .manager
        .edit_name(list_id.as_str(), name_id.as_str(), &new_name)?;
    output::success(format!("Renamed to `{}`.", new_name.trim()));
    Ok(())
}

fn cmd_delete_name(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (list_id, name_id) = resolve_name(context, required(args, 0, "delete-name <name>")?)?;
    match context.manager.delete_name(list_id.as_str(), name_id.as_str())? {
        Some(removed) => output::success(format!("Removed `{}`.", removed.name)),
        None => output::warning("Name not found; nothing removed."),
    }
    Ok(())
}

fn cmd_clear_unpaid(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let list_id = context.active_list_id()?;
    if !context.confirm("Remove every unpaid name from this list?")? {
        output::info("Cancelled.");
        return Ok(());
    }
    match context.manager.clear_unpaid_names(list_id.as_str())? {
        Some(removed) => output::success(format!("Removed {removed} unpaid name(s).")),
        None => output::warning("List not found; nothing removed."),
    }
    Ok(())
}
