mod common;

use fee_ledger::{
    core::{
        import::{self, ImportError, PLACEHOLDER_TITLE},
        services::IncomeModel,
    },
    domain::{PaymentStatus, TransactionKind},
    errors::LedgerError,
};
use regex::Regex;
use serde_json::json;

use common::memory_manager;

#[test]
fn minimal_list_is_filled_in() {
    let report = import::normalize(&json!({"lists": [{"title": "Fees"}]})).unwrap();
    let ledger = report.ledger;
    assert_eq!(ledger.lists.len(), 1);

    let list = &ledger.lists[0];
    assert_eq!(list.title, "Fees");
    assert!(!list.id.is_blank());
    assert!(list.names.is_empty());
    assert!(list.transactions.is_empty());
    assert_eq!(ledger.active_list_id, Some(list.id.clone()));

    let serialized = serde_json::to_value(&ledger).unwrap();
    let created = serialized["lists"][0]["createdAt"].as_str().unwrap();
    let iso = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|\+00:00)$").unwrap();
    assert!(iso.is_match(created), "not ISO-8601: {created}");
}

#[test]
fn generated_ids_are_short_and_url_safe() {
    let report = import::normalize(&json!([{"title": "A"}, {"title": "B"}])).unwrap();
    let shape = Regex::new(r"^[0-9a-f]{12}$").unwrap();
    for list in &report.ledger.lists {
        assert!(shape.is_match(list.id.as_str()), "unexpected id {}", list.id);
    }
}

#[test]
fn rejects_unusable_documents() {
    assert_eq!(import::normalize(&json!("text")).unwrap_err(), ImportError::NotAnObject);
    assert_eq!(import::normalize(&json!({"data": []})).unwrap_err(), ImportError::MissingLists);
    assert!(matches!(
        import::normalize(&json!({"lists": 5})).unwrap_err(),
        ImportError::InvalidListsShape(_)
    ));
    assert!(matches!(
        import::normalize_str("{not json").unwrap_err(),
        LedgerError::Serde(_)
    ));
}

#[test]
fn repairs_messy_documents() {
    let raw = json!({
        "lists": {
            "1": {"id": "b", "title": "  ", "amount": "abc", "transactions": [
                {"type": "refund", "amount": "250", "date": "2024-06-05T10:00:00Z"},
                {"type": "expense", "amount": 90}
            ]},
            "0": {"id": "b", "title": "First", "names": [
                {"id": "n", "name": "Ada", "status": "paid"},
                {"id": "n", "name": "Bola", "status": "PAID?"},
                {"name": "   "}
            ]}
        },
        "activeListId": "missing",
        "revision": 7
    });
    let report = import::normalize(&raw).unwrap();
    let ledger = &report.ledger;

    assert_eq!(ledger.revision, 7);
    assert_eq!(ledger.lists.len(), 2);
    assert_eq!(ledger.lists[0].title, "First");
    assert_eq!(ledger.lists[0].id.as_str(), "b");
    assert_ne!(ledger.lists[1].id.as_str(), "b");
    assert_eq!(ledger.lists[1].title, PLACEHOLDER_TITLE);
    assert_eq!(ledger.lists[1].amount, None);
    assert_eq!(ledger.active_list_id, Some(ledger.lists[0].id.clone()));

    let names = &ledger.lists[0].names;
    assert_eq!(names.len(), 2);
    assert_eq!(names[0].status, PaymentStatus::Paid);
    assert_eq!(names[1].status, PaymentStatus::NotPaid);
    assert_ne!(names[0].id, names[1].id);

    let txns = &ledger.lists[1].transactions;
    assert_eq!(txns[0].kind, TransactionKind::Income);
    assert_eq!(txns[0].amount, 250.0);
    assert_eq!(txns[0].date.to_string(), "2024-06-05");
    assert_eq!(txns[1].kind, TransactionKind::Expense);
    assert!(!report.warnings.is_empty());
}

#[test]
fn manager_import_replaces_and_persists() {
    let mut manager = memory_manager(IncomeModel::Transactions);
    manager.create_list("Before", None, None).unwrap();
    let warnings = manager
        .import_str(r#"{"lists":[{"id":"x1","title":"After","amount":100}]}"#)
        .unwrap();
    assert!(warnings.is_empty());
    assert_eq!(manager.ledger().lists.len(), 1);
    assert_eq!(manager.ledger().lists[0].title, "After");
    assert_eq!(manager.persistence().load(), *manager.ledger());
}

#[test]
fn status_and_type_labels_match_exactly() {
    let raw = json!({"lists": [{
        "title": "Dues",
        "names": [
            {"name": "Ada", "status": "paid"},
            {"name": "Bola", "status": "Paid"},
            {"name": "Chidi", "status": " paid "}
        ],
        "transactions": [
            {"type": "expense", "amount": 10},
            {"type": "Expense", "amount": 20}
        ]
    }]});
    let list = &import::normalize(&raw).unwrap().ledger.lists[0];
    let statuses: Vec<_> = list.names.iter().map(|entry| entry.status).collect();
    assert_eq!(
        statuses,
        vec![PaymentStatus::Paid, PaymentStatus::NotPaid, PaymentStatus::NotPaid]
    );
    assert_eq!(list.transactions[0].kind, TransactionKind::Expense);
    assert_eq!(list.transactions[1].kind, TransactionKind::Income);
}
