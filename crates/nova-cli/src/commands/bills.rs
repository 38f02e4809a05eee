//! Bill and planning calendar command implementations

use anyhow::{Context, Result};
use nova_core::analytics::planning_forecast;
use nova_core::store::{add_bill, bills_due_on, upcoming_bills_total};
use nova_core::{fmt_usd, Store};

use super::{parse_date, truncate};

pub fn cmd_bills_list(store: &Store) -> Result<()> {
    let state = store.state();

    if state.subscriptions.is_empty() {
        println!("No bills on record. Add one with:");
        println!("  nova bill add Rent 1800 2026-11-01");
        return Ok(());
    }

    let mut bills: Vec<_> = state.subscriptions.iter().collect();
    bills.sort_by_key(|b| b.next_due);

    println!();
    println!("📅 Upcoming Bills");
    println!("   ─────────────────────────────────────────────────────────────");
    for bill in bills {
        println!(
            "   {} │ {:20} │ {:>10}/{:<7} │ {}",
            bill.next_due.format("%Y-%m-%d"),
            truncate(&bill.name, 20),
            fmt_usd(bill.amount),
            bill.cycle.as_str(),
            bill.id
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: {}", fmt_usd(upcoming_bills_total(state)));
    match planning_forecast(state) {
        Some(daily) => println!("   Daily cash flow after bills: {}/day", fmt_usd(daily)),
        None => println!("   Daily cash flow after bills: N/A (no checking account)"),
    }

    Ok(())
}

pub fn cmd_bill_add(store: &mut Store, name: &str, amount: f64, date: &str) -> Result<()> {
    let due = parse_date(date)?;
    let bill = store
        .apply(|state| add_bill(state, name, amount, due))
        .context("Failed to add bill")?;
    println!(
        "✅ Added bill {} (ID: {}) for {} due {}",
        bill.name,
        bill.id,
        fmt_usd(bill.amount),
        bill.next_due.format("%Y-%m-%d")
    );
    Ok(())
}

pub fn cmd_bills_due(store: &Store, date: &str) -> Result<()> {
    let day = parse_date(date)?;
    let due = bills_due_on(store.state(), day);

    if due.is_empty() {
        println!("No bills due on {}", day.format("%Y-%m-%d"));
        return Ok(());
    }

    println!("📅 Due {}", day.format("%A, %B %-d"));
    for bill in due {
        println!("   {:20} │ {:>10}", truncate(&bill.name, 20), fmt_usd(bill.amount));
    }
    Ok(())
}
