//! Whole-document persistence of the ledger, locally and to an optional remote mirror.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::import;
use crate::domain::Ledger;
use crate::sync::{RemoteStore, Subscription, SyncError};

use super::{LocalStore, Result};

/// Key holding the ledger document in the local store.
pub const LEDGER_KEY: &str = "fee_ledger_state";
/// Key under which the names-ledger format kept a bare array of lists.
pub const LEGACY_LISTS_KEY: &str = "lists";

/// A remote store plus the fixed document path the ledger is mirrored to.
#[derive(Clone)]
pub struct RemoteMirror {
    store: Arc<dyn RemoteStore>,
    path: String,
}

impl RemoteMirror {
    pub fn new(store: Arc<dyn RemoteStore>, path: impl Into<String>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

pub struct LedgerPersistence {
    local: Box<dyn LocalStore>,
    remote: Option<RemoteMirror>,
}

impl LedgerPersistence {
    pub fn new(local: Box<dyn LocalStore>) -> Self {
        Self {
            local,
            remote: None,
        }
    }

    pub fn with_remote(mut self, mirror: RemoteMirror) -> Self {
        self.remote = Some(mirror);
        self
    }

    pub fn remote(&self) -> Option<&RemoteMirror> {
        self.remote.as_ref()
    }

    /// Writes the ledger locally, then mirrors it remotely.
    ///
    /// Only local failures are returned; a failed remote push is logged and dropped.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        self.save_local(ledger)?;
        self.push_remote(ledger);
        Ok(())
    }

    pub fn save_local(&self, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string(ledger)?;
        self.local.put(LEDGER_KEY, &json)?;
        debug!(lists = ledger.lists.len(), revision = ledger.revision, "saved ledger");
        Ok(())
    }

    /// Pushes the full document to the remote mirror. Returns whether it landed.
    pub fn push_remote(&self, ledger: &Ledger) -> bool {
        let Some(mirror) = self.remote.as_ref() else {
            return false;
        };
        let pushed = serde_json::to_value(ledger)
            .map_err(SyncError::from)
            .and_then(|document| mirror.store.push(&mirror.path, &document));
        match pushed {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %mirror.path, error = %err, "remote push failed; local copy kept");
                false
            }
        }
    }

    /// Reads the local document. Absent or unreadable documents yield an empty ledger.
    pub fn load(&self) -> Ledger {
        match self.local.get(LEDGER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Ledger>(&raw) {
                Ok(mut ledger) => {
                    ledger.repair_dangling_active();
                    info!(lists = ledger.lists.len(), revision = ledger.revision, "loaded ledger");
                    ledger
                }
                Err(err) => {
                    warn!(error = %err, "stored ledger is unparsable; starting empty");
                    Ledger::empty()
                }
            },
            Ok(None) => self.load_legacy(),
            Err(err) => {
                warn!(error = %err, "could not read stored ledger; starting empty");
                Ledger::empty()
            }
        }
    }

    fn load_legacy(&self) -> Ledger {
        let raw = match self.local.get(LEGACY_LISTS_KEY) {
            Ok(Some(raw)) => raw,
            _ => return Ledger::empty(),
        };
        match import::normalize_str(&raw) {
            Ok(report) => {
                info!(
                    lists = report.ledger.lists.len(),
                    repairs = report.warnings.len(),
                    "migrated legacy list document"
                );
                report.ledger
            }
            Err(err) => {
                warn!(error = %err, "legacy list document is unusable; starting empty");
                Ledger::empty()
            }
        }
    }

    pub fn fetch_remote(&self) -> std::result::Result<Option<Value>, SyncError> {
        match self.remote.as_ref() {
            Some(mirror) => mirror.store.fetch(&mirror.path),
            None => Ok(None),
        }
    }

    /// Subscribes to the remote document; `None` when no remote is configured.
    pub fn subscribe_remote(&self) -> std::result::Result<Option<Subscription>, SyncError> {
        match self.remote.as_ref() {
            Some(mirror) => mirror.store.subscribe(&mirror.path).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{ListService, NameService};
    use crate::domain::RecordId;
    use crate::storage::MemoryStore;
    use crate::sync::MemoryRemote;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::empty();
        let id = ListService::create(&mut ledger, "Exam Fee", Some(2000.0), None).unwrap();
        NameService::add(&mut ledger, id.as_str(), "Ada").unwrap();
        ledger
    }

    #[test]
    fn load_without_document_is_empty() {
        let persistence = LedgerPersistence::new(Box::new(MemoryStore::new()));
        assert_eq!(persistence.load(), Ledger::empty());
    }

    #[test]
    fn unparsable_document_degrades_to_empty() {
        let store = MemoryStore::new();
        store.put(LEDGER_KEY, "{broken").unwrap();
        let persistence = LedgerPersistence::new(Box::new(store));
        assert_eq!(persistence.load(), Ledger::empty());
    }

    #[test]
    fn save_then_load_is_identity() {
        let persistence = LedgerPersistence::new(Box::new(MemoryStore::new()));
        let ledger = sample_ledger();
        persistence.save(&ledger).unwrap();
        assert_eq!(persistence.load(), ledger);
    }

    #[test]
    fn reload_keeps_unset_active_list() {
        let persistence = LedgerPersistence::new(Box::new(MemoryStore::new()));
        let mut ledger = sample_ledger();
        ledger.active_list_id = None;
        persistence.save(&ledger).unwrap();
        assert_eq!(persistence.load(), ledger);
    }

    #[test]
    fn reload_redirects_dangling_active_list() {
        let persistence = LedgerPersistence::new(Box::new(MemoryStore::new()));
        let mut ledger = sample_ledger();
        ledger.active_list_id = Some(RecordId::from("gone"));
        persistence.save(&ledger).unwrap();
        let loaded = persistence.load();
        assert_eq!(loaded.active_list_id, Some(ledger.lists[0].id.clone()));
    }

    #[test]
    fn legacy_list_array_is_migrated() {
        let store = MemoryStore::new();
        store
            .put(
                LEGACY_LISTS_KEY,
                r#"[{"title":"Dues","amount":"500","created":"2024-02-01T00:00:00Z","names":[{"name":"Ada","paid":true}]}]"#,
            )
            .unwrap();
        let ledger = LedgerPersistence::new(Box::new(store)).load();
        assert_eq!(ledger.lists.len(), 1);
        assert_eq!(ledger.lists[0].amount, Some(500.0));
        assert!(ledger.lists[0].names[0].status.is_paid());
        assert_eq!(ledger.active_list_id, Some(ledger.lists[0].id.clone()));
    }

    #[test]
    fn remote_failure_does_not_block_local_save() {
        let remote = MemoryRemote::new();
        remote.set_offline(true).unwrap();
        let store = MemoryStore::new();
        let persistence = LedgerPersistence::new(Box::new(store.clone()))
            .with_remote(RemoteMirror::new(Arc::new(remote.clone()), "doc"));

        let ledger = sample_ledger();
        persistence.save(&ledger).expect("local save succeeds");
        assert!(store.get(LEDGER_KEY).unwrap().is_some());
        remote.set_offline(false).unwrap();
        assert_eq!(remote.fetch("doc").unwrap(), None);
    }

    #[test]
    fn save_mirrors_document_remotely() {
        let remote = MemoryRemote::new();
        let persistence = LedgerPersistence::new(Box::new(MemoryStore::new()))
            .with_remote(RemoteMirror::new(Arc::new(remote.clone()), "doc"));
        let ledger = sample_ledger();
        persistence.save(&ledger).unwrap();
        let pushed = remote.fetch("doc").unwrap().expect("remote document");
        assert_eq!(serde_json::from_value::<Ledger>(pushed).unwrap(), ledger);
    }
}
