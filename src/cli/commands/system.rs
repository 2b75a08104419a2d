use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::utils::build_info;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("help", "Show available commands", "help [command]", cmd_help),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry.get(&name.to_lowercase()) {
            Some(command) => {
                output::section(format!("Help: {}", command.name));
                output::info(format!("  {}", command.description));
                output::info(format!("  Usage: {}", command.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output::section("Available commands");
    for command in context.registry.iter() {
        output::info(format!("  {:<16} {}", command.name, command.description));
    }
    output::hint("Use `help <command>` for details. Names and transactions accept an id or a row number.");
    Ok(())
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Fee Ledger {}", meta.version));
    output::info(format!("  Build hash   : {} ({})", meta.git_hash, meta.git_status));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Data dir     : {}", context.config_manager.base_dir().display()));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
