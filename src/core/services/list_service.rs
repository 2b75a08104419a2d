//! Creation, duplication, and removal of fee lists.

use tracing::debug;

use crate::domain::{FeeList, Ledger, NameEntry, RecordId};
use crate::utils::time;

use super::{require_text, ServiceError, ServiceResult};

/// Suffix appended to the title of a duplicated list.
pub const COPY_MARKER: &str = " (Copy)";

pub struct ListService;

impl ListService {
    /// Creates a list at the front of the ledger and makes it active.
    ///
    /// When `copy_names_from` resolves, that list's names are copied with fresh
    /// ids and every status reset to unpaid. The source list is left untouched.
    pub fn create(
        ledger: &mut Ledger,
        title: &str,
        amount: Option<f64>,
        copy_names_from: Option<&str>,
    ) -> ServiceResult<RecordId> {
        let title = require_text(title, "List title")?;
        validate_fee(amount)?;

        let mut list = FeeList::new(ledger.fresh_list_id(), title, amount);
        if let Some(source) = copy_names_from.and_then(|id| ledger.find_list(id)) {
            for entry in &source.names {
                let copy = NameEntry::new(list.fresh_name_id(), entry.name.clone());
                list.names.push(copy);
            }
        }

        let id = list.id.clone();
        debug!(list = %id, names = list.names.len(), "created list");
        ledger.lists.insert(0, list);
        ledger.active_list_id = Some(id.clone());
        Ok(id)
    }

    /// Deep-copies a list under fresh ids and makes the copy active.
    /// Returns `None` without touching the ledger when `id` is unknown.
    pub fn duplicate(ledger: &mut Ledger, id: &str) -> Option<RecordId> {
        let source = ledger.find_list(id)?;

        let mut copy = FeeList::new(
            ledger.fresh_list_id(),
            format!("{}{}", source.title, COPY_MARKER),
            source.amount,
        );
        for entry in &source.names {
            let mut name = NameEntry::new(copy.fresh_name_id(), entry.name.clone());
            name.status = entry.status;
            copy.names.push(name);
        }
        for txn in &source.transactions {
            let mut cloned = txn.clone();
            cloned.id = copy.fresh_transaction_id();
            copy.transactions.push(cloned);
        }
        copy.created_at = time::now();

        let new_id = copy.id.clone();
        debug!(source = id, copy = %new_id, "duplicated list");
        ledger.lists.insert(0, copy);
        ledger.active_list_id = Some(new_id.clone());
        Some(new_id)
    }

    /// Removes a list. Deleting the active list activates the first remaining one.
    pub fn delete(ledger: &mut Ledger, id: &str) -> Option<FeeList> {
        let index = ledger.position_of(id)?;
        let removed = ledger.lists.remove(index);
        let was_active = ledger
            .active_list_id
            .as_ref()
            .is_some_and(|active| active == &removed.id);
        if was_active {
            ledger.active_list_id = ledger.lists.first().map(|list| list.id.clone());
        }
        debug!(list = id, was_active, "deleted list");
        Some(removed)
    }

    pub fn rename(ledger: &mut Ledger, id: &str, title: &str) -> ServiceResult<()> {
        let title = require_text(title, "List title")?;
        let list = ledger
            .find_list_mut(id)
            .ok_or_else(|| ServiceError::ListNotFound(id.into()))?;
        list.title = title;
        Ok(())
    }

    pub fn set_amount(ledger: &mut Ledger, id: &str, amount: Option<f64>) -> ServiceResult<()> {
        validate_fee(amount)?;
        let list = ledger
            .find_list_mut(id)
            .ok_or_else(|| ServiceError::ListNotFound(id.into()))?;
        list.amount = amount;
        Ok(())
    }

    pub fn select(ledger: &mut Ledger, id: &str) -> ServiceResult<()> {
        let list = ledger
            .find_list(id)
            .ok_or_else(|| ServiceError::ListNotFound(id.into()))?;
        ledger.active_list_id = Some(list.id.clone());
        Ok(())
    }
}

fn validate_fee(amount: Option<f64>) -> ServiceResult<()> {
    match amount {
        Some(value) if !value.is_finite() || value < 0.0 => Err(ServiceError::InvalidFee(value)),
        _ => Ok(()),
    }
}
