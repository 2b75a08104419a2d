//! Income, expense, and net totals derived on demand from ledger data.

use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::domain::{FeeList, Ledger, PaymentStatus, TransactionKind};

/// Where a list's income comes from. One model is configured per deployment.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncomeModel {
    /// Income is the sum of income transactions.
    #[default]
    Transactions,
    /// Income is the per-person fee times the number of paid names.
    PaidNames,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

impl Totals {
    pub fn new(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            net: income - expense,
        }
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals {
            income: self.income + rhs.income,
            expense: self.expense + rhs.expense,
            net: self.net + rhs.net,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameCounts {
    pub paid: usize,
    pub not_paid: usize,
}

impl NameCounts {
    pub fn total(&self) -> usize {
        self.paid + self.not_paid
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals_for_list(list: &FeeList, model: IncomeModel) -> Totals {
        let expense = sum_of_kind(list, TransactionKind::Expense);
        let income = match model {
            IncomeModel::Transactions => sum_of_kind(list, TransactionKind::Income),
            IncomeModel::PaidNames => {
                let paid = list.count_with_status(PaymentStatus::Paid) as f64;
                list.amount.unwrap_or(0.0) * paid
            }
        };
        Totals::new(income, expense)
    }

    /// Element-wise sum of [`SummaryService::totals_for_list`] over every list.
    pub fn global_totals(ledger: &Ledger, model: IncomeModel) -> Totals {
        ledger
            .lists
            .iter()
            .map(|list| Self::totals_for_list(list, model))
            .fold(Totals::default(), Add::add)
    }

    pub fn name_counts(list: &FeeList) -> NameCounts {
        NameCounts {
            paid: list.count_with_status(PaymentStatus::Paid),
            not_paid: list.count_with_status(PaymentStatus::NotPaid),
        }
    }

    /// Fee still owed by unpaid names; zero when the list has no fee.
    pub fn outstanding(list: &FeeList) -> f64 {
        list.amount.unwrap_or(0.0) * list.count_with_status(PaymentStatus::NotPaid) as f64
    }
}

fn sum_of_kind(list: &FeeList, kind: TransactionKind) -> f64 {
    list.transactions
        .iter()
        .filter(|txn| txn.kind == kind)
        .map(|txn| txn.amount)
        .sum()
}
