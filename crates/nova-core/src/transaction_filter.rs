//! Filtering and sorting for the transaction list

use std::str::FromStr;

use chrono::NaiveDate;

use crate::dates::resolve_date;
use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    #[default]
    All,
    Income,
    Expenses,
    Recurring,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            Self::All => true,
            Self::Income => tx.is_income(),
            Self::Expenses => tx.is_expense(),
            Self::Recurring => tx.recurring,
        }
    }
}

impl FromStr for TransactionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "income" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expenses),
            "recurring" => Ok(Self::Recurring),
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Name,
    Amount,
    Category,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            _ => Err(format!("Unknown sort field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Apply a filter and a stable sort
///
/// Date order uses the resolved calendar date; entries whose date cannot be
/// resolved sort as the oldest. Name and category compare case-insensitively.
pub fn list_transactions<'a>(
    transactions: &'a [Transaction],
    filter: TransactionFilter,
    field: SortField,
    direction: SortDirection,
    today: NaiveDate,
) -> Vec<&'a Transaction> {
    let mut keyed: Vec<(Option<NaiveDate>, &Transaction)> = transactions
        .iter()
        .filter(|t| filter.matches(t))
        .map(|t| (resolve_date(&t.date, today), t))
        .collect();

    keyed.sort_by(|(date_a, a), (date_b, b)| {
        let ordering = match field {
            // None < Some, so unresolved dates come first ascending
            SortField::Date => date_a.cmp(date_b),
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Amount => a.amount.total_cmp(&b.amount),
            SortField::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, t)| t).collect()
}

/// Newest first, the default list order
pub fn recent_transactions(transactions: &[Transaction], today: NaiveDate) -> Vec<&Transaction> {
    list_transactions(
        transactions,
        TransactionFilter::All,
        SortField::Date,
        SortDirection::Descending,
        today,
    )
}
