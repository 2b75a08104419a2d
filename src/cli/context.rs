//! Shell state, dispatch, and the error types shared by command handlers.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;

use crate::config::{Config, ConfigManager};
use crate::core::services::ServiceError;
use crate::core::{LedgerManager, SyncOutcome};
use crate::currency::MoneyFormatter;
use crate::domain::{FeeList, Identifiable, RecordId};
use crate::errors::LedgerError;
use crate::sync::SyncError;

use super::commands::{self, CommandRegistry};
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that stop the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("input error: {0}")]
    Input(String),
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

/// Failures of a single command. The shell reports them and keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No active list. Create one with `new-list` or pick one with `use`.")]
    NoActiveList,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: LedgerManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub formatter: MoneyFormatter,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let persistence = config_manager.persistence(&config)?;
        let mut manager = LedgerManager::open(persistence, config.income_model);
        if let Err(err) = manager.subscribe_remote() {
            output::warning(format!("Remote updates unavailable: {err}"));
        }

        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            formatter: config.formatter(),
            manager,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        match self.manager.active_list() {
            Some(list) => format!("fee-ledger [{}] > ", list.title),
            None => "fee-ledger > ".into(),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|definition| definition.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let result = handler(self, args);
        self.pump_remote();
        match result {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    /// Applies queued remote snapshots between commands.
    pub(crate) fn pump_remote(&mut self) {
        let outcomes = self.manager.pump_remote(|_| {});
        for outcome in outcomes {
            match outcome {
                SyncOutcome::Applied { revision } => {
                    output::info(format!("Remote update applied (revision {revision})."))
                }
                SyncOutcome::Conflict { revision } => output::warning(format!(
                    "Remote copy diverged at revision {revision}; keeping local data."
                )),
                SyncOutcome::Invalid(err) => {
                    output::warning(format!("Ignored invalid remote document: {err}"))
                }
                SyncOutcome::Unchanged | SyncOutcome::Stale { .. } => {}
            }
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    /// Asks before destructive commands; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    pub(crate) fn active_list(&self) -> Result<&FeeList, CommandError> {
        self.manager.active_list().ok_or(CommandError::NoActiveList)
    }

    pub(crate) fn active_list_id(&self) -> Result<RecordId, CommandError> {
        self.active_list().map(|list| list.id.clone())
    }

    /// Resolves `arg` as a list id, or as a 1-based position in the overview.
    pub(crate) fn resolve_list(&self, arg: &str) -> Result<RecordId, CommandError> {
        resolve_reference(&self.manager.ledger().lists, arg)
            .ok_or_else(|| CommandError::InvalidArguments(format!("No list matches `{arg}`.")))
    }
}

/// Matches `arg` against item ids first, then as a 1-based position.
pub(crate) fn resolve_reference<T: Identifiable>(items: &[T], arg: &str) -> Option<RecordId> {
    let arg = arg.trim();
    if let Some(item) = items.iter().find(|item| item.id().as_str() == arg) {
        return Some(item.id().clone());
    }
    let position: usize = arg.strip_prefix('#').unwrap_or(arg).parse().ok()?;
    position
        .checked_sub(1)
        .and_then(|index| items.get(index))
        .map(|item| item.id().clone())
}
