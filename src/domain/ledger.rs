use serde::{Deserialize, Serialize};

use crate::domain::{
    common::RecordId, list::FeeList, name::NameEntry, transaction::Transaction,
};

/// Every fee list plus the pointer to the one currently being edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub lists: Vec<FeeList>,
    #[serde(default)]
    pub active_list_id: Option<RecordId>,
    /// Bumped on every persisted mutation; orders remote snapshots.
    #[serde(default)]
    pub revision: u64,
}

impl Ledger {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn active_list(&self) -> Option<&FeeList> {
        let id = self.active_list_id.as_ref()?;
        self.find_list(id.as_str())
    }

    pub fn active_list_mut(&mut self) -> Option<&mut FeeList> {
        let id = self.active_list_id.clone()?;
        self.find_list_mut(id.as_str())
    }

    pub fn find_list(&self, id: &str) -> Option<&FeeList> {
        self.lists.iter().find(|list| list.id.as_str() == id)
    }

    pub fn find_list_mut(&mut self, id: &str) -> Option<&mut FeeList> {
        self.lists.iter_mut().find(|list| list.id.as_str() == id)
    }

    pub fn find_name(&self, list_id: &str, name_id: &str) -> Option<&NameEntry> {
        self.find_list(list_id)?.name(name_id)
    }

    pub fn find_transaction(&self, list_id: &str, txn_id: &str) -> Option<&Transaction> {
        self.find_list(list_id)?.transaction(txn_id)
    }

    pub fn contains_list(&self, id: &str) -> bool {
        self.find_list(id).is_some()
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.lists.iter().position(|list| list.id.as_str() == id)
    }

    /// Identifier not yet used by any list in this ledger.
    pub fn fresh_list_id(&self) -> RecordId {
        RecordId::generate_unique(|candidate| self.contains_list(candidate))
    }

    /// Points a dangling active id at the first list, or clears it.
    pub fn repair_active(&mut self) {
        let resolves = self
            .active_list_id
            .as_ref()
            .is_some_and(|id| self.contains_list(id.as_str()));
        if !resolves {
            self.active_list_id = self.lists.first().map(|list| list.id.clone());
        }
    }

    /// Redirects an active id that no longer resolves. An unset active id stays unset.
    pub fn repair_dangling_active(&mut self) {
        let dangling = self
            .active_list_id
            .as_ref()
            .is_some_and(|id| !self.contains_list(id.as_str()));
        if dangling {
            self.active_list_id = self.lists.first().map(|list| list.id.clone());
        }
    }

    pub fn touch(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
