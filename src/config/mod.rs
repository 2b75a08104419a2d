use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use crate::core::services::IncomeModel;
use crate::currency::{MoneyFormatter, DEFAULT_SYMBOL};
use crate::errors::LedgerError;
use crate::storage::{JsonFileStore, LedgerPersistence, RemoteMirror};
use crate::sync::{FileRemote, MemoryRemote, RemoteStore, DEFAULT_DOCUMENT_PATH};
use crate::utils::paths::{self, ensure_dir, write_atomic};

const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_REMOTE_DIR: &str = "remote";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub income_model: IncomeModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: default_symbol(),
            income_model: IncomeModel::default(),
            remote: None,
        }
    }
}

impl Config {
    pub fn formatter(&self) -> MoneyFormatter {
        MoneyFormatter::with_symbol(self.currency_symbol.clone())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemoteKind {
    /// JSON documents under a shared directory.
    File,
    /// In-process store; only useful within a single run.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    pub kind: RemoteKind,
    /// Root directory for `file` remotes. Relative paths resolve against the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default = "default_document_path")]
    pub document_path: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl RemoteConfig {
    pub fn file(location: impl Into<String>) -> Self {
        Self {
            kind: RemoteKind::File,
            location: Some(location.into()),
            document_path: default_document_path(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }

    pub fn memory() -> Self {
        Self {
            kind: RemoteKind::Memory,
            location: None,
            document_path: default_document_path(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }

    pub fn resolve_location(&self, base: &Path) -> PathBuf {
        match self.location.as_deref().map(str::trim) {
            Some(location) if !location.is_empty() => {
                let path = PathBuf::from(location);
                if path.is_absolute() {
                    path
                } else {
                    base.join(path)
                }
            }
            _ => base.join(DEFAULT_REMOTE_DIR),
        }
    }

    pub fn build(&self, base: &Path) -> Arc<dyn RemoteStore> {
        match self.kind {
            RemoteKind::File => Arc::new(
                FileRemote::new(self.resolve_location(base))
                    .with_poll_interval(Duration::from_millis(self.poll_interval_ms.max(1))),
            ),
            RemoteKind::Memory => Arc::new(MemoryRemote::new()),
        }
    }
}

/// Loads and saves `config.json` in the data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// File-backed local store under `<base>/store`, mirrored to the configured remote.
    pub fn persistence(&self, config: &Config) -> Result<LedgerPersistence, LedgerError> {
        let local = JsonFileStore::new(paths::store_dir_in(&self.base))?;
        let mut persistence = LedgerPersistence::new(Box::new(local));
        if let Some(remote) = config.remote.as_ref() {
            let store = remote.build(&self.base);
            persistence = persistence.with_remote(RemoteMirror::new(store, &remote.document_path));
        }
        Ok(persistence)
    }
}

fn default_symbol() -> String {
    DEFAULT_SYMBOL.into()
}

fn default_document_path() -> String {
    DEFAULT_DOCUMENT_PATH.into()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}
