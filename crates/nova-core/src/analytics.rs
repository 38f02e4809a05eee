//! Derived figures over the entity store
//!
//! Everything here is a pure function of the state it is given plus a
//! reference day, so callers recompute on demand instead of caching.

use std::fmt;

use chrono::NaiveDate;
use tracing::debug;

use crate::dates::{add_months, month_label, month_start, months_between, resolve_date};
use crate::models::{Account, AccountType, AppState, Transaction};
use crate::store::upcoming_bills_total;

/// Trailing months shown by the trend chart
pub const TREND_WINDOW_MONTHS: usize = 6;

/// Days used to spread a balance into a daily figure
const DAYS_PER_MONTH: f64 = 30.0;

const UNCATEGORIZED: &str = "Uncategorized";

/// Sum of balances over the given accounts
pub fn net_worth<'a, I>(accounts: I) -> f64
where
    I: IntoIterator<Item = &'a Account>,
{
    accounts.into_iter().map(|a| a.balance).sum()
}

/// Total expense (as a positive amount) for the calendar month containing `month`
///
/// Transactions whose date does not resolve are skipped.
pub fn monthly_spend<'a, I>(transactions: I, month: NaiveDate, today: NaiveDate) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let target = month_start(month);
    let total: f64 = transactions
        .into_iter()
        .filter(|t| t.is_expense())
        .filter(|t| match resolve_date(&t.date, today) {
            Some(date) => month_start(date) == target,
            None => {
                debug!(tx_id = %t.id, date = %t.date, "Skipping unresolvable date");
                false
            }
        })
        .map(|t| t.amount)
        .sum();
    total.abs()
}

/// Per-day discretionary figure from checking balances
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SafeToSpend {
    Daily(f64),
    /// No checking account in scope
    NotApplicable,
}

impl SafeToSpend {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Daily(amount) => Some(*amount),
            Self::NotApplicable => None,
        }
    }
}

impl fmt::Display for SafeToSpend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily(amount) => write!(f, "{}", crate::money::fmt_usd(*amount)),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Checking balance spread over 30 days; non-checking accounts are ignored
pub fn safe_to_spend<'a, I>(accounts: I) -> SafeToSpend
where
    I: IntoIterator<Item = &'a Account>,
{
    let checking: Vec<&Account> = accounts
        .into_iter()
        .filter(|a| a.account_type == AccountType::Checking)
        .collect();
    if checking.is_empty() {
        return SafeToSpend::NotApplicable;
    }
    SafeToSpend::Daily(net_worth(checking) / DAYS_PER_MONTH)
}

/// Expense totals per category, in first-seen order
///
/// Categories with no expense are absent rather than zero.
pub fn category_totals<'a, I>(transactions: I) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<(String, f64)> = Vec::new();
    for tx in transactions.into_iter().filter(|t| t.is_expense()) {
        let category = if tx.category.trim().is_empty() {
            UNCATEGORIZED
        } else {
            tx.category.as_str()
        };
        match totals.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total += tx.amount.abs(),
            None => totals.push((category.to_string(), tx.amount.abs())),
        }
    }
    totals
}

/// One month of the income/expense trend
#[derive(Debug, Clone, PartialEq)]
pub struct TrendBucket {
    /// Short month name ("Oct")
    pub label: String,
    pub income: f64,
    /// Positive magnitude
    pub expense: f64,
}

/// Six monthly buckets, oldest first, ending with the current month
pub fn monthly_trend<'a, I>(transactions: I, today: NaiveDate) -> Vec<TrendBucket>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    monthly_trend_window(transactions, today, TREND_WINDOW_MONTHS)
}

/// Trend over the trailing `window` months
///
/// A transaction lands in bucket `window - 1 - age`, where `age` is the
/// number of whole calendar months between its resolved date and `today`.
/// Anything outside the window, or with an unresolvable date, is dropped.
pub fn monthly_trend_window<'a, I>(
    transactions: I,
    today: NaiveDate,
    window: usize,
) -> Vec<TrendBucket>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let current = month_start(today);
    let mut buckets: Vec<TrendBucket> = (0..window)
        .map(|i| TrendBucket {
            label: month_label(add_months(current, i as i32 - window as i32 + 1)),
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    let mut dropped = 0usize;
    for tx in transactions {
        let Some(date) = resolve_date(&tx.date, today) else {
            dropped += 1;
            continue;
        };
        let age = months_between(date, today);
        if age < 0 || age as usize >= window {
            dropped += 1;
            continue;
        }
        let bucket = &mut buckets[window - 1 - age as usize];
        if tx.is_income() {
            bucket.income += tx.amount;
        } else if tx.is_expense() {
            bucket.expense += tx.amount.abs();
        }
    }

    debug!(window, dropped, "Computed monthly trend");
    buckets
}

/// Daily figure left after paying upcoming bills from checking
pub fn daily_cash_flow_forecast(checking_balance: f64, upcoming_bills: f64) -> f64 {
    (checking_balance - upcoming_bills) / DAYS_PER_MONTH
}

/// Forecast from the first checking account and all subscriptions
///
/// `None` when there is no checking account.
pub fn planning_forecast(state: &AppState) -> Option<f64> {
    let checking = state.accounts_of(AccountType::Checking).next()?;
    Some(daily_cash_flow_forecast(
        checking.balance,
        upcoming_bills_total(state),
    ))
}

/// Which accounts the dashboard summarizes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccountScope {
    #[default]
    All,
    Account(String),
}

impl AccountScope {
    fn includes(&self, account_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Account(id) => id == account_id,
        }
    }
}

/// Headline figures for the overview screen
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Net worth for `All`, the account balance otherwise
    pub net_worth: f64,
    pub monthly_spend: f64,
    pub safe_to_spend: SafeToSpend,
}

pub fn dashboard_summary(state: &AppState, scope: &AccountScope, today: NaiveDate) -> DashboardSummary {
    let accounts: Vec<&Account> = state
        .accounts
        .iter()
        .filter(|a| scope.includes(&a.id))
        .collect();
    let transactions = state
        .transactions
        .iter()
        .filter(|t| scope.includes(&t.account_id));

    DashboardSummary {
        net_worth: net_worth(accounts.iter().copied()),
        monthly_spend: monthly_spend(transactions, today, today),
        safe_to_spend: safe_to_spend(accounts.iter().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{account, date, sample_state, today, tx};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_net_worth() {
        let state = sample_state();
        assert!(approx(net_worth(&state.accounts), 118400.0));
        assert!(approx(net_worth(state.accounts_of(AccountType::Loan)), -17000.0));
        assert_eq!(net_worth(Vec::<&Account>::new()), 0.0);
    }

    #[test]
    fn test_monthly_spend_current_month() {
        let state = sample_state();
        assert!(approx(monthly_spend(&state.transactions, today(), today()), 161.49));
        assert!(approx(
            monthly_spend(&state.transactions, date(2026, 9, 1), today()),
            69.5
        ));
    }

    #[test]
    fn test_monthly_spend_ignores_same_month_last_year() {
        // "Nov 2" read on Oct 18 2026 resolves to Nov 2025
        let txs = vec![tx("1", "Old", "Nov 2", -50.0, "Misc")];
        assert_eq!(monthly_spend(&txs, date(2026, 11, 1), today()), 0.0);
        assert!(approx(monthly_spend(&txs, date(2025, 11, 1), today()), 50.0));
    }

    #[test]
    fn test_safe_to_spend() {
        let state = sample_state();
        match safe_to_spend(&state.accounts) {
            SafeToSpend::Daily(v) => assert!(approx(v, 4250.0 / 30.0)),
            other => panic!("expected daily figure, got {:?}", other),
        }

        let cards = [account("c", AccountType::Credit, -10.0, Some(20.0))];
        assert_eq!(safe_to_spend(&cards), SafeToSpend::NotApplicable);
        assert_eq!(SafeToSpend::NotApplicable.to_string(), "N/A");
        assert_eq!(SafeToSpend::Daily(141.666).to_string(), "$141.67");
    }

    #[test]
    fn test_category_totals_match_total_expense() {
        let state = sample_state();
        let totals = category_totals(&state.transactions);

        let names: Vec<_> = totals.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["Groceries", "Entertainment", "Transport", "Dining", "Shopping"]
        );
        assert!(!names.contains(&"Income"));

        let by_category: f64 = totals.iter().map(|(_, v)| v).sum();
        let all_expense: f64 = state
            .transactions
            .iter()
            .filter(|t| t.amount < 0.0)
            .map(|t| t.amount.abs())
            .sum();
        assert!(approx(by_category, all_expense));
        assert!(approx(totals[2].1, 69.5));
    }

    #[test]
    fn test_category_totals_uncategorized() {
        let txs = vec![tx("1", "Mystery", "Today", -5.0, "")];
        assert_eq!(category_totals(&txs), vec![("Uncategorized".to_string(), 5.0)]);
    }

    #[test]
    fn test_monthly_trend_buckets() {
        let state = sample_state();
        let trend = monthly_trend(&state.transactions, today());

        let labels: Vec<_> = trend.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["May", "Jun", "Jul", "Aug", "Sep", "Oct"]);

        assert!(approx(trend[5].income, 4200.0));
        assert!(approx(trend[5].expense, 161.49));
        assert!(approx(trend[4].expense, 69.5));
        assert!(approx(trend[3].expense, 30.0));
        assert!(approx(trend[0].income, 2500.0));
        assert_eq!(trend[1], TrendBucket { label: "Jun".into(), income: 0.0, expense: 0.0 });

        // Apr 1 is six months back and falls outside the window
        let expense: f64 = trend.iter().map(|b| b.expense).sum();
        assert!(approx(expense, 359.99 - 99.0));
    }

    #[test]
    fn test_monthly_trend_drops_twelve_months_back() {
        // Oct 19 resolves to Oct 2025, a full year back
        let txs = vec![tx("1", "Last year", "Oct 19", -40.0, "Misc")];
        let trend = monthly_trend(&txs, today());
        assert!(trend.iter().all(|b| b.expense == 0.0));
    }

    #[test]
    fn test_monthly_trend_across_year_boundary() {
        let txs = vec![
            tx("1", "Dec", "Dec 20", -10.0, "Misc"),
            tx("2", "Jan", "Jan 2", -20.0, "Misc"),
        ];
        let trend = monthly_trend(&txs, date(2027, 1, 10));
        let labels: Vec<_> = trend.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Aug", "Sep", "Oct", "Nov", "Dec", "Jan"]);
        assert!(approx(trend[4].expense, 10.0));
        assert!(approx(trend[5].expense, 20.0));
    }

    #[test]
    fn test_planning_forecast() {
        let state = sample_state();
        let forecast = planning_forecast(&state).unwrap();
        assert!(approx(forecast, (4250.0 - 80.97) / 30.0));
        assert!(approx(daily_cash_flow_forecast(300.0, 0.0), 10.0));

        let mut no_checking = state.clone();
        no_checking.accounts.retain(|a| a.account_type != AccountType::Checking);
        assert_eq!(planning_forecast(&no_checking), None);
    }

    #[test]
    fn test_dashboard_summary_scopes() {
        let state = sample_state();

        let all = dashboard_summary(&state, &AccountScope::All, today());
        assert!(approx(all.net_worth, 118400.0));
        assert!(approx(all.monthly_spend, 161.49));
        assert!(all.safe_to_spend.amount().is_some());

        let card = dashboard_summary(&state, &AccountScope::Account("a2".into()), today());
        assert!(approx(card.net_worth, -850.0));
        assert!(approx(card.monthly_spend, 161.49));
        assert_eq!(card.safe_to_spend, SafeToSpend::NotApplicable);

        let checking = dashboard_summary(&state, &AccountScope::Account("a1".into()), today());
        assert_eq!(checking.monthly_spend, 0.0);
    }
}
