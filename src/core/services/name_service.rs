//! Person entries and their paid status.

use tracing::debug;

use crate::domain::{Ledger, NameEntry, PaymentStatus, RecordId};

use super::{require_text, ServiceError, ServiceResult};

pub struct NameService;

impl NameService {
    /// Appends an unpaid entry to the list and returns its identifier.
    pub fn add(ledger: &mut Ledger, list_id: &str, name: &str) -> ServiceResult<RecordId> {
        let list = ledger
            .find_list_mut(list_id)
            .ok_or_else(|| ServiceError::ListNotFound(list_id.into()))?;
        let name = require_text(name, "Name")?;
        let entry = NameEntry::new(list.fresh_name_id(), name);
        let id = entry.id.clone();
        list.names.push(entry);
        debug!(list = list_id, name = %id, "added name");
        Ok(id)
    }

    /// Flips paid/unpaid and returns the new status; `None` when either id is unknown.
    pub fn toggle_status(
        ledger: &mut Ledger,
        list_id: &str,
        name_id: &str,
    ) -> Option<PaymentStatus> {
        let entry = ledger.find_list_mut(list_id)?.name_mut(name_id)?;
        entry.status = entry.status.toggled();
        debug!(list = list_id, name = name_id, status = entry.status.as_str(), "toggled status");
        Some(entry.status)
    }

    pub fn edit(
        ledger: &mut Ledger,
        list_id: &str,
        name_id: &str,
        new_name: &str,
    ) -> ServiceResult<()> {
        let new_name = require_text(new_name, "Name")?;
        let list = ledger
            .find_list_mut(list_id)
            .ok_or_else(|| ServiceError::ListNotFound(list_id.into()))?;
        let entry = list
            .name_mut(name_id)
            .ok_or_else(|| ServiceError::NameNotFound(name_id.into()))?;
        entry.name = new_name;
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, list_id: &str, name_id: &str) -> Option<NameEntry> {
        let list = ledger.find_list_mut(list_id)?;
        let index = list.names.iter().position(|entry| entry.id.as_str() == name_id)?;
        Some(list.names.remove(index))
    }

    /// Drops every unpaid entry, returning how many were removed.
    pub fn clear_unpaid(ledger: &mut Ledger, list_id: &str) -> Option<usize> {
        let list = ledger.find_list_mut(list_id)?;
        let before = list.names.len();
        list.names.retain(|entry| entry.status == PaymentStatus::Paid);
        let removed = before - list.names.len();
        debug!(list = list_id, removed, "cleared unpaid names");
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeeList;

    fn ledger() -> Ledger {
        let mut ledger = Ledger::empty();
        ledger
            .lists
            .push(FeeList::new(RecordId::from("L1"), "Dues", Some(1000.0)));
        ledger
    }

    #[test]
    fn add_rejects_unknown_list_and_blank_name() {
        let mut ledger = ledger();
        assert!(matches!(
            NameService::add(&mut ledger, "L9", "Ada"),
            Err(ServiceError::ListNotFound(_))
        ));
        assert!(matches!(
            NameService::add(&mut ledger, "L1", "  "),
            Err(ServiceError::EmptyField(_))
        ));
        assert!(ledger.lists[0].names.is_empty());
    }

    #[test]
    fn add_appends_unpaid_entries_in_order() {
        let mut ledger = ledger();
        NameService::add(&mut ledger, "L1", "Ada").unwrap();
        NameService::add(&mut ledger, "L1", " Bola ").unwrap();
        let names: Vec<_> = ledger.lists[0].names.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Bola"]);
        assert!(ledger.lists[0]
            .names
            .iter()
            .all(|n| n.status == PaymentStatus::NotPaid));
    }

    #[test]
    fn toggle_flips_and_ignores_unknown_ids() {
        let mut ledger = ledger();
        let id = NameService::add(&mut ledger, "L1", "Ada").unwrap();
        assert_eq!(
            NameService::toggle_status(&mut ledger, "L1", id.as_str()),
            Some(PaymentStatus::Paid)
        );
        assert_eq!(
            NameService::toggle_status(&mut ledger, "L1", id.as_str()),
            Some(PaymentStatus::NotPaid)
        );
        assert_eq!(NameService::toggle_status(&mut ledger, "L1", "ghost"), None);
        assert_eq!(NameService::toggle_status(&mut ledger, "L9", id.as_str()), None);
    }

    #[test]
    fn edit_rejects_empty_name() {
        let mut ledger = ledger();
        let id = NameService::add(&mut ledger, "L1", "Ada").unwrap();
        assert!(NameService::edit(&mut ledger, "L1", id.as_str(), "").is_err());
        NameService::edit(&mut ledger, "L1", id.as_str(), "Adaeze").unwrap();
        assert_eq!(ledger.find_name("L1", id.as_str()).unwrap().name, "Adaeze");
        assert!(matches!(
            NameService::edit(&mut ledger, "L1", "ghost", "X"),
            Err(ServiceError::NameNotFound(_))
        ));
    }

    #[test]
    fn clear_unpaid_keeps_only_paid() {
        let mut ledger = ledger();
        let ada = NameService::add(&mut ledger, "L1", "Ada").unwrap();
        NameService::add(&mut ledger, "L1", "Bola").unwrap();
        NameService::add(&mut ledger, "L1", "Chidi").unwrap();
        NameService::toggle_status(&mut ledger, "L1", ada.as_str());

        assert_eq!(NameService::clear_unpaid(&mut ledger, "L1"), Some(2));
        assert_eq!(ledger.lists[0].names.len(), 1);
        assert_eq!(ledger.lists[0].names[0].id, ada);
        assert_eq!(NameService::clear_unpaid(&mut ledger, "L9"), None);
    }

    #[test]
    fn remove_returns_deleted_entry() {
        let mut ledger = ledger();
        let id = NameService::add(&mut ledger, "L1", "Ada").unwrap();
        let removed = NameService::remove(&mut ledger, "L1", id.as_str()).unwrap();
        assert_eq!(removed.name, "Ada");
        assert!(NameService::remove(&mut ledger, "L1", id.as_str()).is_none());
    }
}
