//! Dashboard and report command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use nova_core::analytics::{category_totals, dashboard_summary, monthly_trend, AccountScope};
use nova_core::transaction_filter::recent_transactions;
use nova_core::{fmt_usd, Store};

use super::truncate;

pub fn cmd_dashboard(store: &Store, account: Option<&str>, today: NaiveDate) -> Result<()> {
    let state = store.state();

    let scope = match account {
        Some(id) => {
            let account = state
                .account(id)
                .with_context(|| format!("Account not found: {}", id))?;
            println!();
            println!("📊 {} ({} ••{})", account.name, account.account_type.as_str(), account.mask);
            AccountScope::Account(id.to_string())
        }
        None => {
            println!();
            println!("📊 Welcome back, {}", state.user.name);
            AccountScope::All
        }
    };

    let summary = dashboard_summary(state, &scope, today);
    let worth_label = match scope {
        AccountScope::All => "Net worth",
        AccountScope::Account(_) => "Balance",
    };

    println!("   ─────────────────────────────────────────");
    println!("   {:16} {:>16}", worth_label, fmt_usd(summary.net_worth));
    println!("   {:16} {:>16}", "Spent this month", fmt_usd(summary.monthly_spend));
    let safe = match summary.safe_to_spend.amount() {
        Some(daily) => format!("{}/day", fmt_usd(daily)),
        None => summary.safe_to_spend.to_string(),
    };
    println!("   {:16} {:>16}", "Safe to spend", safe);

    if matches!(scope, AccountScope::All) {
        println!();
        println!("   Accounts");
        for account in &state.accounts {
            println!(
                "   {:20} │ {:10} │ {:>14}",
                truncate(&account.name, 20),
                account.account_type.as_str(),
                fmt_usd(account.balance)
            );
        }
    }

    let recent: Vec<_> = recent_transactions(&state.transactions, today)
        .into_iter()
        .filter(|t| match &scope {
            AccountScope::All => true,
            AccountScope::Account(id) => &t.account_id == id,
        })
        .take(5)
        .collect();
    if !recent.is_empty() {
        println!();
        println!("   Recent activity");
        for tx in recent {
            println!(
                "   {:24} │ {:18} │ {:>12}",
                truncate(&tx.name, 24),
                truncate(&tx.date, 18),
                fmt_usd(tx.amount)
            );
        }
    }

    Ok(())
}

pub fn cmd_categories(store: &Store) -> Result<()> {
    let totals = category_totals(&store.state().transactions);

    if totals.is_empty() {
        println!("No spending recorded yet.");
        return Ok(());
    }

    let grand_total: f64 = totals.iter().map(|(_, amount)| amount).sum();

    println!();
    println!("🏷️  Spending by Category");
    println!("   ─────────────────────────────────────────");
    for (category, amount) in &totals {
        let share = if grand_total > 0.0 {
            amount / grand_total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:20} │ {:>12} │ {:>5.1}%",
            truncate(category, 20),
            fmt_usd(*amount),
            share
        );
    }
    println!("   ─────────────────────────────────────────");
    println!("   {:20} │ {:>12}", "Total", fmt_usd(grand_total));

    Ok(())
}

pub fn cmd_trend(store: &Store, today: NaiveDate) -> Result<()> {
    let trend = monthly_trend(&store.state().transactions, today);

    println!();
    println!("📈 Income vs Expense (last {} months)", trend.len());
    println!("   ─────────────────────────────────────────");
    println!("   {:5} │ {:>12} │ {:>12}", "Month", "Income", "Expense");
    for bucket in &trend {
        println!(
            "   {:5} │ {:>12} │ {:>12}",
            bucket.label,
            fmt_usd(bucket.income),
            fmt_usd(bucket.expense)
        );
    }

    Ok(())
}
