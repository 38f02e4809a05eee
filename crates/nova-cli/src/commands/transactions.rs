//! Transaction and search command implementations

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use nova_core::search::{search, NavTarget, View, WealthTab};
use nova_core::store::{account_name, delete_transaction};
use nova_core::transaction_filter::{
    list_transactions, SortDirection, SortField, TransactionFilter,
};
use nova_core::{fmt_usd, Store};

use super::truncate;

pub fn cmd_transactions_list(
    store: &Store,
    filter: &str,
    sort: &str,
    descending: bool,
    today: NaiveDate,
) -> Result<()> {
    let filter: TransactionFilter = filter.parse().map_err(|e: String| anyhow!(e))?;
    let field: SortField = sort.parse().map_err(|e: String| anyhow!(e))?;
    let direction = if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    let state = store.state();
    let transactions = list_transactions(&state.transactions, filter, field, direction, today);

    if transactions.is_empty() {
        println!("No transactions match.");
        return Ok(());
    }

    println!();
    println!("💳 Transactions ({})", transactions.len());
    println!("   ─────────────────────────────────────────────────────────────────────────");
    for tx in transactions {
        let flags = match (tx.pending, tx.recurring) {
            (true, true) => "⏳🔁",
            (true, false) => "⏳",
            (false, true) => "🔁",
            (false, false) => "",
        };
        println!(
            "   {:>14} │ {:22} │ {:18} │ {:16} │ {:>12} {}",
            tx.id,
            truncate(&tx.name, 22),
            truncate(&tx.date, 18),
            truncate(account_name(state, &tx.account_id), 16),
            fmt_usd(tx.amount),
            flags
        );
    }

    Ok(())
}

pub fn cmd_transaction_delete(store: &mut Store, id: &str) -> Result<()> {
    let removed = store
        .apply(|state| delete_transaction(state, id))
        .context("Failed to delete transaction")?;
    println!(
        "✅ Deleted transaction {} ({}, {})",
        removed.id,
        removed.name,
        fmt_usd(removed.amount)
    );
    Ok(())
}

/// Where a result opens in the dashboard
fn nav_label(target: NavTarget) -> &'static str {
    match (target.view, target.wealth_tab) {
        (View::Transactions, _) => "Transactions",
        (View::Planning, _) => "Planning",
        (View::Wealth, Some(WealthTab::Debt)) => "Wealth › Debt",
        (View::Wealth, _) => "Wealth › Goals",
    }
}

pub fn cmd_search(store: &Store, query: &str) -> Result<()> {
    let results = search(store.state(), query);

    if results.is_empty() {
        println!("No results for \"{}\"", query.trim());
        return Ok(());
    }

    println!();
    println!("🔎 {} result(s) for \"{}\"", results.len(), query.trim());
    println!("   ─────────────────────────────────────────────────────────────");
    for result in results {
        println!(
            "   {:12} │ {:24} │ {:28} │ {}",
            result.kind.as_str(),
            truncate(&result.title, 24),
            truncate(&result.subtitle, 28),
            nav_label(result.target)
        );
    }

    Ok(())
}
