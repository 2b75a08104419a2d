use std::{fs, path::Path};

use crossbeam::channel::TryRecvError;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::import::{self, ImportError};
use crate::core::services::{
    IncomeModel, ListService, NameService, ServiceResult, SummaryService, Totals,
    TransactionService,
};
use crate::domain::{
    FeeList, Ledger, NameEntry, PaymentStatus, RecordId, Transaction, TransactionDraft,
    TransactionPatch,
};
use crate::errors::LedgerError;
use crate::storage::LedgerPersistence;
use crate::sync::{Subscription, SyncError};

/// What happened to one remote snapshot handed to the manager.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Newer than local state; it replaced the ledger.
    Applied { revision: u64 },
    /// Same revision and same content as local state.
    Unchanged,
    /// Older than local state; ignored.
    Stale { remote: u64, local: u64 },
    /// Same revision as local state but different content; local state kept.
    Conflict { revision: u64 },
    /// Not a usable ledger document.
    Invalid(ImportError),
}

/// Facade that owns the ledger, runs every mutation through the services, and
/// persists the whole document after each one that succeeds.
pub struct LedgerManager {
    ledger: Ledger,
    persistence: LedgerPersistence,
    income_model: IncomeModel,
    remote_updates: Option<Subscription>,
}

impl LedgerManager {
    /// Loads the stored ledger (or starts empty) behind `persistence`.
    pub fn open(persistence: LedgerPersistence, income_model: IncomeModel) -> Self {
        let ledger = persistence.load();
        Self::with_ledger(ledger, persistence, income_model)
    }

    pub fn with_ledger(
        ledger: Ledger,
        persistence: LedgerPersistence,
        income_model: IncomeModel,
    ) -> Self {
        Self {
            ledger,
            persistence,
            income_model,
            remote_updates: None,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn persistence(&self) -> &LedgerPersistence {
        &self.persistence
    }

    pub fn income_model(&self) -> IncomeModel {
        self.income_model
    }

    pub fn active_list(&self) -> Option<&FeeList> {
        self.ledger.active_list()
    }

    pub fn active_list_id(&self) -> Option<RecordId> {
        self.ledger.active_list().map(|list| list.id.clone())
    }

    /// Runs `mutate` on a working copy and swaps it in only once it is saved.
    fn mutate<T, F>(&mut self, mutate: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut Ledger) -> ServiceResult<T>,
    {
        let mut working = self.ledger.clone();
        let value = mutate(&mut working)?;
        self.commit(working)?;
        Ok(value)
    }

    /// Like [`Self::mutate`] for no-op-on-miss operations: `None` saves nothing.
    fn mutate_if<T, F>(&mut self, mutate: F) -> ServiceResult<Option<T>>
    where
        F: FnOnce(&mut Ledger) -> Option<T>,
    {
        let mut working = self.ledger.clone();
        let outcome = mutate(&mut working);
        if outcome.is_some() {
            self.commit(working)?;
        }
        Ok(outcome)
    }

    fn commit(&mut self, mut working: Ledger) -> ServiceResult<()> {
        working.touch();
        self.persistence.save(&working)?;
        self.ledger = working;
        Ok(())
    }

    pub fn create_list(
        &mut self,
        title: &str,
        amount: Option<f64>,
        copy_names_from: Option<&str>,
    ) -> ServiceResult<RecordId> {
        self.mutate(|ledger| ListService::create(ledger, title, amount, copy_names_from))
    }

    pub fn duplicate_list(&mut self, id: &str) -> ServiceResult<Option<RecordId>> {
        self.mutate_if(|ledger| ListService::duplicate(ledger, id))
    }

    pub fn delete_list(&mut self, id: &str) -> ServiceResult<Option<FeeList>> {
        self.mutate_if(|ledger| ListService::delete(ledger, id))
    }

    pub fn rename_list(&mut self, id: &str, title: &str) -> ServiceResult<()> {
        self.mutate(|ledger| ListService::rename(ledger, id, title))
    }

    pub fn set_list_amount(&mut self, id: &str, amount: Option<f64>) -> ServiceResult<()> {
        self.mutate(|ledger| ListService::set_amount(ledger, id, amount))
    }

    pub fn select_list(&mut self, id: &str) -> ServiceResult<()> {
        self.mutate(|ledger| ListService::select(ledger, id))
    }

    pub fn add_name(&mut self, list_id: &str, name: &str) -> ServiceResult<RecordId> {
        self.mutate(|ledger| NameService::add(ledger, list_id, name))
    }

    pub fn toggle_name_status(
        &mut self,
        list_id: &str,
        name_id: &str,
    ) -> ServiceResult<Option<PaymentStatus>> {
        self.mutate_if(|ledger| NameService::toggle_status(ledger, list_id, name_id))
    }

    pub fn edit_name(&mut self, list_id: &str, name_id: &str, new_name: &str) -> ServiceResult<()> {
        self.mutate(|ledger| NameService::edit(ledger, list_id, name_id, new_name))
    }

    pub fn delete_name(&mut self, list_id: &str, name_id: &str) -> ServiceResult<Option<NameEntry>> {
        self.mutate_if(|ledger| NameService::remove(ledger, list_id, name_id))
    }

    pub fn clear_unpaid_names(&mut self, list_id: &str) -> ServiceResult<Option<usize>> {
        self.mutate_if(|ledger| NameService::clear_unpaid(ledger, list_id))
    }

    pub fn add_transaction(
        &mut self,
        list_id: &str,
        draft: TransactionDraft,
    ) -> ServiceResult<RecordId> {
        self.mutate(|ledger| TransactionService::add(ledger, list_id, draft))
    }

    pub fn edit_transaction(
        &mut self,
        list_id: &str,
        txn_id: &str,
        patch: TransactionPatch,
    ) -> ServiceResult<()> {
        self.mutate(|ledger| TransactionService::update(ledger, list_id, txn_id, patch))
    }

    pub fn delete_transaction(
        &mut self,
        list_id: &str,
        txn_id: &str,
    ) -> ServiceResult<Option<Transaction>> {
        self.mutate_if(|ledger| TransactionService::remove(ledger, list_id, txn_id))
    }

    pub fn totals_for_list(&self, list_id: &str) -> Option<Totals> {
        self.ledger
            .find_list(list_id)
            .map(|list| SummaryService::totals_for_list(list, self.income_model))
    }

    pub fn global_totals(&self) -> Totals {
        SummaryService::global_totals(&self.ledger, self.income_model)
    }

    /// Replaces the ledger with a normalized copy of `raw` and persists it.
    /// Returns the repairs applied. State is untouched when `raw` is rejected.
    pub fn import_str(&mut self, raw: &str) -> ServiceResult<Vec<String>> {
        let report = import::normalize_str(raw)?;
        let mut imported = report.ledger;
        imported.revision = imported.revision.max(self.ledger.revision);
        self.commit(imported)?;
        info!(
            lists = self.ledger.lists.len(),
            repairs = report.warnings.len(),
            "imported ledger"
        );
        Ok(report.warnings)
    }

    pub fn import_file(&mut self, path: &Path) -> ServiceResult<Vec<String>> {
        let raw = fs::read_to_string(path).map_err(LedgerError::from)?;
        self.import_str(&raw)
    }

    /// Starts listening for remote snapshots. Returns `false` when no remote is configured.
    pub fn subscribe_remote(&mut self) -> Result<bool, SyncError> {
        match self.persistence.subscribe_remote()? {
            Some(receiver) => {
                self.remote_updates = Some(receiver);
                info!("subscribed to remote ledger updates");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.remote_updates.is_some()
    }

    /// Applies every snapshot queued since the last call, invoking `on_update`
    /// after each one that replaced the ledger.
    pub fn pump_remote<F>(&mut self, mut on_update: F) -> Vec<SyncOutcome>
    where
        F: FnMut(&Ledger),
    {
        let mut outcomes = Vec::new();
        loop {
            let Some(receiver) = self.remote_updates.as_ref() else {
                break;
            };
            let document = match receiver.try_recv() {
                Ok(document) => document,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("remote subscription closed");
                    self.remote_updates = None;
                    break;
                }
            };
            let outcome = self.apply_remote(&document);
            if matches!(outcome, SyncOutcome::Applied { .. }) {
                on_update(&self.ledger);
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Accepts `document` only when its revision is newer than local state.
    /// An accepted snapshot is saved locally and never pushed back.
    pub fn apply_remote(&mut self, document: &Value) -> SyncOutcome {
        let incoming = match import::normalize(document) {
            Ok(report) => report.ledger,
            Err(err) => {
                warn!(error = %err, "ignoring invalid remote snapshot");
                return SyncOutcome::Invalid(err);
            }
        };

        let local = self.ledger.revision;
        if incoming.revision > local {
            let revision = incoming.revision;
            self.ledger = incoming;
            if let Err(err) = self.persistence.save_local(&self.ledger) {
                warn!(error = %err, "failed to persist remote snapshot locally");
            }
            info!(revision, "applied remote snapshot");
            SyncOutcome::Applied { revision }
        } else if incoming.revision < local {
            debug!(remote = incoming.revision, local, "ignoring stale remote snapshot");
            SyncOutcome::Stale {
                remote: incoming.revision,
                local,
            }
        } else if incoming == self.ledger {
            SyncOutcome::Unchanged
        } else {
            warn!(revision = local, "remote snapshot conflicts with local state; keeping local");
            SyncOutcome::Conflict { revision: local }
        }
    }

    /// Pulls the remote document once. When the remote is missing or behind,
    /// the local document is pushed so both sides converge.
    pub fn sync_now(&mut self) -> Result<Option<SyncOutcome>, SyncError> {
        if self.persistence.remote().is_none() {
            return Ok(None);
        }
        let outcome = match self.persistence.fetch_remote()? {
            Some(document) => self.apply_remote(&document),
            None => SyncOutcome::Stale {
                remote: 0,
                local: self.ledger.revision,
            },
        };
        if matches!(outcome, SyncOutcome::Stale { .. }) {
            self.persistence.push_remote(&self.ledger);
        }
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::ServiceError;
    use crate::storage::{LocalStore, MemoryStore, RemoteMirror};
    use crate::sync::{MemoryRemote, RemoteStore};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn memory_manager() -> LedgerManager {
        LedgerManager::open(
            LedgerPersistence::new(Box::new(MemoryStore::new())),
            IncomeModel::Transactions,
        )
    }

    #[test]
    fn successful_mutations_bump_revision_and_persist() {
        let store = MemoryStore::new();
        let mut manager = LedgerManager::open(
            LedgerPersistence::new(Box::new(store.clone())),
            IncomeModel::Transactions,
        );
        let list = manager.create_list("Dues", Some(500.0), None).unwrap();
        manager.add_name(list.as_str(), "Ada").unwrap();
        assert_eq!(manager.ledger().revision, 2);

        let reopened = LedgerManager::open(
            LedgerPersistence::new(Box::new(store)),
            IncomeModel::Transactions,
        );
        assert_eq!(reopened.ledger(), manager.ledger());
    }

    #[test]
    fn failed_and_noop_mutations_leave_revision_alone() {
        let mut manager = memory_manager();
        let list = manager.create_list("Dues", None, None).unwrap();
        let before = manager.ledger().clone();

        let err = manager
            .add_transaction(list.as_str(), TransactionDraft::income(0.0))
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidAmount(_)));
        assert_eq!(manager.delete_list("missing").unwrap(), None);
        assert_eq!(manager.toggle_name_status(list.as_str(), "missing").unwrap(), None);
        assert_eq!(manager.ledger(), &before);
    }

    /// Store whose writes start failing once `broken` is set.
    #[derive(Clone, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        broken: Arc<AtomicBool>,
    }

    impl LocalStore for FlakyStore {
        fn get(&self, key: &str) -> crate::storage::Result<Option<String>> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &str) -> crate::storage::Result<()> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(LedgerError::Storage("disk full".into()));
            }
            self.inner.put(key, value)
        }

        fn remove(&self, key: &str) -> crate::storage::Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_save_rolls_back_in_memory_state() {
        let store = FlakyStore::default();
        let mut manager = LedgerManager::open(
            LedgerPersistence::new(Box::new(store.clone())),
            IncomeModel::Transactions,
        );
        let list = manager.create_list("Dues", None, None).unwrap();
        let name = manager.add_name(list.as_str(), "Ada").unwrap();
        let before = manager.ledger().clone();

        store.broken.store(true, Ordering::SeqCst);
        assert!(manager
            .add_transaction(list.as_str(), TransactionDraft::income(100.0))
            .is_err());
        assert!(manager.toggle_name_status(list.as_str(), name.as_str()).is_err());
        assert!(manager.import_str(r#"{"lists":[]}"#).is_err());
        assert_eq!(manager.ledger(), &before);

        store.broken.store(false, Ordering::SeqCst);
        manager.rename_list(list.as_str(), "Dues 2024").unwrap();
        let stored = LedgerPersistence::new(Box::new(store)).load();
        assert_eq!(&stored, manager.ledger());
        assert!(stored.lists[0].transactions.is_empty());
        assert_eq!(stored.revision, before.revision + 1);
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut manager = memory_manager();
        manager.create_list("Keep", None, None).unwrap();
        let before = manager.ledger().clone();
        assert!(manager.import_str("{\"nope\": 1}").is_err());
        assert!(manager.import_str("not json").is_err());
        assert_eq!(manager.ledger(), &before);
    }

    #[test]
    fn import_never_moves_revision_backwards() {
        let mut manager = memory_manager();
        for title in ["a", "b", "c"] {
            manager.create_list(title, None, None).unwrap();
        }
        manager
            .import_str(r#"{"lists":[{"title":"Fees"}],"revision":1}"#)
            .unwrap();
        assert_eq!(manager.ledger().revision, 4);
        assert_eq!(manager.ledger().lists[0].title, "Fees");
    }

    #[test]
    fn remote_snapshots_are_ordered_by_revision() {
        let mut manager = memory_manager();
        manager.create_list("Local", None, None).unwrap();
        manager.create_list("Local 2", None, None).unwrap();

        let stale = serde_json::json!({"lists": [{"title": "Old"}], "revision": 1});
        assert_eq!(
            manager.apply_remote(&stale),
            SyncOutcome::Stale { remote: 1, local: 2 }
        );

        let conflicting = serde_json::json!({"lists": [{"title": "Other"}], "revision": 2});
        assert_eq!(
            manager.apply_remote(&conflicting),
            SyncOutcome::Conflict { revision: 2 }
        );
        assert_eq!(manager.ledger().lists.len(), 2);

        let newer = serde_json::json!({"lists": [{"id": "r1", "title": "Remote"}], "revision": 9});
        assert_eq!(manager.apply_remote(&newer), SyncOutcome::Applied { revision: 9 });
        assert_eq!(manager.ledger().lists[0].title, "Remote");
        assert_eq!(manager.active_list_id(), Some(RecordId::from("r1")));
    }

    #[test]
    fn own_pushes_come_back_unchanged() {
        let remote = MemoryRemote::new();
        let persistence = LedgerPersistence::new(Box::new(MemoryStore::new()))
            .with_remote(RemoteMirror::new(Arc::new(remote.clone()), "doc"));
        let mut manager = LedgerManager::open(persistence, IncomeModel::Transactions);
        assert!(manager.subscribe_remote().unwrap());

        manager.create_list("Dues", None, None).unwrap();
        let mut updates = 0;
        let outcomes = manager.pump_remote(|_| updates += 1);
        assert_eq!(outcomes, vec![SyncOutcome::Unchanged]);
        assert_eq!(updates, 0);

        let mut newer = manager.ledger().clone();
        newer.lists[0].title = "Edited elsewhere".into();
        newer.touch();
        remote
            .push("doc", &serde_json::to_value(&newer).unwrap())
            .unwrap();
        let outcomes = manager.pump_remote(|ledger| {
            updates += 1;
            assert_eq!(ledger.lists[0].title, "Edited elsewhere");
        });
        assert_eq!(outcomes, vec![SyncOutcome::Applied { revision: 2 }]);
        assert_eq!(updates, 1);
    }

    #[test]
    fn sync_now_pushes_when_remote_is_empty() {
        let remote = MemoryRemote::new();
        let persistence = LedgerPersistence::new(Box::new(MemoryStore::new()))
            .with_remote(RemoteMirror::new(Arc::new(remote.clone()), "doc"));
        let mut manager =
            LedgerManager::with_ledger(Ledger::empty(), persistence, IncomeModel::Transactions);
        let outcome = manager.sync_now().unwrap();
        assert_eq!(outcome, Some(SyncOutcome::Stale { remote: 0, local: 0 }));
        assert!(remote.fetch("doc").unwrap().is_some());
    }

    #[test]
    fn sync_without_remote_is_noop() {
        let mut manager = memory_manager();
        assert_eq!(manager.sync_now().unwrap(), None);
        assert!(!manager.subscribe_remote().unwrap());
        assert!(manager.pump_remote(|_| {}).is_empty());
    }
}
