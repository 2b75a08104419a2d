//! Business logic helpers for managing transactions.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{
    Ledger, RecordId, Transaction, TransactionDraft, TransactionKind, TransactionPatch,
};
use crate::utils::time;

use super::{ServiceError, ServiceResult};

/// Provides validated CRUD helpers for list transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates the draft and prepends it to the list, newest first.
    pub fn add(
        ledger: &mut Ledger,
        list_id: &str,
        draft: TransactionDraft,
    ) -> ServiceResult<RecordId> {
        let list = ledger
            .find_list_mut(list_id)
            .ok_or_else(|| ServiceError::ListNotFound(list_id.into()))?;
        let amount = validate_amount(draft.amount)?;
        let date = resolve_date(draft.date.as_deref())?;

        let txn = Transaction {
            id: list.fresh_transaction_id(),
            kind: TransactionKind::from_label(&draft.kind),
            amount,
            category: draft.category.trim().to_string(),
            date,
            description: draft.description.trim().to_string(),
        };
        let id = txn.id.clone();
        debug!(list = list_id, txn = %id, kind = txn.kind.as_str(), amount, "added transaction");
        list.transactions.insert(0, txn);
        Ok(id)
    }

    /// Applies every field of `patch` or none of them.
    pub fn update(
        ledger: &mut Ledger,
        list_id: &str,
        txn_id: &str,
        patch: TransactionPatch,
    ) -> ServiceResult<()> {
        let list = ledger
            .find_list_mut(list_id)
            .ok_or_else(|| ServiceError::ListNotFound(list_id.into()))?;
        let txn = list
            .transaction_mut(txn_id)
            .ok_or_else(|| ServiceError::TransactionNotFound(txn_id.into()))?;

        let amount = patch.amount.map(validate_amount).transpose()?;
        let date = match patch.date.as_deref() {
            Some(raw) => Some(resolve_date(Some(raw))?),
            None => None,
        };

        if let Some(kind) = patch.kind.as_deref() {
            txn.kind = TransactionKind::from_label(kind);
        }
        if let Some(amount) = amount {
            txn.amount = amount;
        }
        if let Some(category) = patch.category {
            txn.category = category.trim().to_string();
        }
        if let Some(date) = date {
            txn.date = date;
        }
        if let Some(description) = patch.description {
            txn.description = description.trim().to_string();
        }
        debug!(list = list_id, txn = txn_id, "updated transaction");
        Ok(())
    }

    /// Removes the transaction, returning it; `None` when either id is unknown.
    pub fn remove(ledger: &mut Ledger, list_id: &str, txn_id: &str) -> Option<Transaction> {
        let list = ledger.find_list_mut(list_id)?;
        let index = list
            .transactions
            .iter()
            .position(|txn| txn.id.as_str() == txn_id)?;
        Some(list.transactions.remove(index))
    }
}

fn validate_amount(amount: f64) -> ServiceResult<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ServiceError::InvalidAmount(amount))
    }
}

/// Blank means today; anything else must parse as `YYYY-MM-DD`.
fn resolve_date(raw: Option<&str>) -> ServiceResult<NaiveDate> {
    match raw.map(str::trim) {
        None | Some("") => Ok(time::today()),
        Some(value) => time::parse_date(value).ok_or_else(|| ServiceError::InvalidDate(value.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeeList;

    fn base_ledger() -> Ledger {
        let mut ledger = Ledger::empty();
        ledger.lists.push(FeeList::new(RecordId::from("L1"), "Dues", None));
        ledger
    }

    #[test]
    fn add_prepends_newest_first() {
        let mut ledger = base_ledger();
        let first = TransactionService::add(&mut ledger, "L1", TransactionDraft::income(100.0)).unwrap();
        let second =
            TransactionService::add(&mut ledger, "L1", TransactionDraft::expense(40.0)).unwrap();
        let ids: Vec<_> = ledger.lists[0].transactions.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn add_rejects_non_positive_amounts() {
        let mut ledger = base_ledger();
        for amount in [0.0, -5.0, f64::NAN] {
            let err = TransactionService::add(&mut ledger, "L1", TransactionDraft::income(amount))
                .expect_err("amount must be rejected");
            assert!(matches!(err, ServiceError::InvalidAmount(_)), "unexpected error: {err:?}");
        }
        assert!(ledger.lists[0].transactions.is_empty());
    }

    #[test]
    fn add_defaults_kind_and_date() {
        let mut ledger = base_ledger();
        let id = TransactionService::add(
            &mut ledger,
            "L1",
            TransactionDraft::new("Expense", 25.0).on("  "),
        )
        .unwrap();
        let txn = ledger.find_transaction("L1", id.as_str()).unwrap();
        assert_eq!(txn.kind, TransactionKind::Income);
        assert_eq!(txn.date, time::today());
    }

    #[test]
    fn add_rejects_malformed_date() {
        let mut ledger = base_ledger();
        let err = TransactionService::add(
            &mut ledger,
            "L1",
            TransactionDraft::income(10.0).on("31/12/2024"),
        )
        .expect_err("date must be rejected");
        assert!(matches!(err, ServiceError::InvalidDate(_)));
    }

    #[test]
    fn update_is_all_or_nothing() {
        let mut ledger = base_ledger();
        let id = TransactionService::add(
            &mut ledger,
            "L1",
            TransactionDraft::income(10.0).with_category("Dues"),
        )
        .unwrap();
        let before = ledger.clone();

        let patch = TransactionPatch {
            category: Some("Printing".into()),
            amount: Some(-3.0),
            ..TransactionPatch::default()
        };
        assert!(TransactionService::update(&mut ledger, "L1", id.as_str(), patch).is_err());
        assert_eq!(ledger, before);

        let patch = TransactionPatch {
            kind: Some("expense".into()),
            amount: Some(12.5),
            date: Some("2024-02-29".into()),
            ..TransactionPatch::default()
        };
        TransactionService::update(&mut ledger, "L1", id.as_str(), patch).unwrap();
        let txn = ledger.find_transaction("L1", id.as_str()).unwrap();
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(txn.amount, 12.5);
        assert_eq!(txn.category, "Dues");
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn update_fails_for_missing_transaction() {
        let mut ledger = base_ledger();
        let err = TransactionService::update(&mut ledger, "L1", "ghost", TransactionPatch::default())
            .expect_err("update must fail for unknown id");
        assert!(matches!(err, ServiceError::TransactionNotFound(_)));
    }

    #[test]
    fn remove_returns_deleted_transaction() {
        let mut ledger = base_ledger();
        let id = TransactionService::add(&mut ledger, "L1", TransactionDraft::income(9.0)).unwrap();
        let removed = TransactionService::remove(&mut ledger, "L1", id.as_str()).unwrap();
        assert_eq!(removed.id, id);
        assert!(ledger.find_transaction("L1", id.as_str()).is_none());
        assert!(TransactionService::remove(&mut ledger, "L1", id.as_str()).is_none());
    }
}
