//! Goal, debt and tagging command implementations

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use nova_core::debt::{payoff_plan, PayoffHorizon, Strategy};
use nova_core::models::AccountType;
use nova_core::store::{add_debt, add_goal, debt_accounts, delete_account, delete_goal, NewDebt};
use nova_core::tags::{tag_to_debt, tag_to_goal};
use nova_core::{fmt_usd, EngineConfig, Store};

use super::truncate;

// ========== Goals ==========

pub fn cmd_goals_list(store: &Store) -> Result<()> {
    let goals = &store.state().goals;

    if goals.is_empty() {
        println!("No goals yet. Add one with:");
        println!("  nova goal add \"Emergency Fund\" 10000");
        return Ok(());
    }

    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");
    for goal in goals {
        println!(
            "   {:>14} │ {:20} │ {:>12} of {:>12} │ {:>5.1}%",
            goal.id,
            truncate(&goal.name, 20),
            fmt_usd(goal.current),
            fmt_usd(goal.target),
            goal.progress() * 100.0
        );
    }

    Ok(())
}

pub fn cmd_goal_add(store: &mut Store, name: &str, target: f64) -> Result<()> {
    let goal = store
        .apply(|state| add_goal(state, name, target))
        .context("Failed to add goal")?;
    println!(
        "✅ Added goal {} (ID: {}) targeting {} [{}]",
        goal.name,
        goal.id,
        fmt_usd(goal.target),
        goal.icon
    );
    Ok(())
}

pub fn cmd_goal_delete(store: &mut Store, id: &str) -> Result<()> {
    let goal = store
        .apply(|state| delete_goal(state, id))
        .context("Failed to delete goal")?;
    println!("✅ Deleted goal {} (ID: {})", goal.name, goal.id);
    Ok(())
}

// ========== Debts ==========

pub fn cmd_debts_list(store: &Store) -> Result<()> {
    let debts = debt_accounts(store.state());

    if debts.is_empty() {
        println!("🎉 No debts on record.");
        return Ok(());
    }

    println!();
    println!("💸 Debts");
    println!("   ─────────────────────────────────────────────────────────────");
    for debt in debts {
        let apr = debt
            .apr
            .map(|a| format!("{:.2}%", a))
            .unwrap_or_else(|| "?".to_string());
        println!(
            "   {:>14} │ {:20} │ {:6} │ {:>12} │ {:>7} APR",
            debt.id,
            truncate(&debt.name, 20),
            debt.account_type.as_str(),
            fmt_usd(debt.balance.abs()),
            apr
        );
    }

    Ok(())
}

pub fn cmd_debt_add(store: &mut Store, name: &str, balance: f64, apr: f64, kind: &str) -> Result<()> {
    let kind: AccountType = kind.parse().map_err(|e: String| anyhow!(e))?;
    let debt = NewDebt {
        name: name.to_string(),
        balance,
        apr,
        kind,
    };

    let account = store
        .apply(|state| add_debt(state, debt))
        .context("Failed to add debt")?;
    println!(
        "✅ Added {} {} (ID: {}) owing {} at {:.2}% APR",
        account.account_type.as_str(),
        account.name,
        account.id,
        fmt_usd(account.balance.abs()),
        apr
    );
    Ok(())
}

pub fn cmd_debt_delete(store: &mut Store, id: &str) -> Result<()> {
    let account = store
        .apply(|state| delete_account(state, id))
        .context("Failed to delete debt")?;
    println!("✅ Deleted {} (ID: {})", account.name, account.id);
    Ok(())
}

// ========== Payoff Planning ==========

pub fn cmd_debt_plan(
    store: &Store,
    config: &EngineConfig,
    strategy: &str,
    extra: Option<f64>,
    today: NaiveDate,
) -> Result<()> {
    let strategy: Strategy = strategy.parse().map_err(|e: String| anyhow!(e))?;
    let extra = extra.unwrap_or(config.extra_payment);

    let plan = payoff_plan(
        debt_accounts(store.state()),
        strategy,
        extra,
        config.min_payment_rate,
        today,
    )
    .context("Failed to build payoff plan")?;

    if plan.priority.is_empty() {
        println!("🎉 No debts to pay off.");
        return Ok(());
    }

    println!();
    println!("💸 Debt Payoff Plan ({})", plan.strategy);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total debt:        {}", fmt_usd(plan.total_debt));
    println!("   Minimum payment:   {}/mo", fmt_usd(plan.min_payment));
    println!("   Extra payment:     {}/mo", fmt_usd(plan.extra_payment));
    println!("   Debt-free in:      {}", plan.horizon);
    match plan.interest_saved {
        Some(saved) => println!("   Interest saved:    {}", fmt_usd(saved)),
        None => println!("   Interest saved:    n/a"),
    }
    if let PayoffHorizon::Unbounded = plan.baseline_horizon {
        println!("   ⚠️  Minimum payments alone never clear this debt");
    }

    println!();
    println!("   Payoff order");
    for (i, debt) in plan.priority.iter().enumerate() {
        let marker = if i == 0 { "👉" } else { "  " };
        println!(
            "   {} {}. {:20} │ {:>12} │ {:>6.2}%",
            marker,
            i + 1,
            truncate(&debt.name, 20),
            fmt_usd(debt.balance.abs()),
            debt.apr.unwrap_or(0.0)
        );
    }

    println!();
    println!("   Remaining balance");
    let peak = plan.total_debt.max(1.0);
    for point in &plan.trajectory {
        let width = ((point.remaining / peak) * 30.0).round() as usize;
        println!(
            "   {:4} {:>12} {}",
            point.label,
            fmt_usd(point.remaining),
            "█".repeat(width)
        );
    }

    Ok(())
}

// ========== Tagging ==========

pub fn cmd_tag_goal(store: &mut Store, transaction_id: &str, goal_id: &str) -> Result<()> {
    let rule = store
        .apply(|state| tag_to_goal(state, transaction_id, goal_id))
        .context("Failed to tag transaction")?;

    let state = store.state();
    let progress = state
        .goal(goal_id)
        .map(|g| format!("{} of {}", fmt_usd(g.current), fmt_usd(g.target)))
        .unwrap_or_default();
    println!(
        "✅ Tagged \"{}\" to goal {} ({})",
        rule.pattern, rule.target_name, progress
    );
    Ok(())
}

pub fn cmd_tag_debt(store: &mut Store, transaction_id: &str, debt_id: &str) -> Result<()> {
    let rule = store
        .apply(|state| tag_to_debt(state, transaction_id, debt_id))
        .context("Failed to tag transaction")?;

    let remaining = store
        .state()
        .account(debt_id)
        .map(|a| fmt_usd(a.balance.abs()))
        .unwrap_or_default();
    println!(
        "✅ Tagged \"{}\" as a payment on {} ({} remaining)",
        rule.pattern, rule.target_name, remaining
    );
    Ok(())
}

pub fn cmd_rules_list(store: &Store) -> Result<()> {
    let rules = &store.state().rules;

    if rules.is_empty() {
        println!("No tagging rules yet. Tag an expense with:");
        println!("  nova tag goal <TRANSACTION_ID> <GOAL_ID>");
        return Ok(());
    }

    println!();
    println!("📏 Tagging Rules");
    println!("   ─────────────────────────────────────────────────────────────");
    for rule in rules {
        println!(
            "   {:24} → {:4} {}",
            truncate(&rule.pattern, 24),
            rule.target.as_str(),
            rule.target_name
        );
    }

    Ok(())
}
