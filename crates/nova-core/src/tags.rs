//! Manual tagging of expenses to goals and debts
//!
//! Tagging an expense moves its amount into the target (goal contribution or
//! debt paydown), relabels the transaction and records a `TaggingRule` with
//! the transaction's name as the pattern. Rules are a record only: nothing
//! re-applies them to later transactions.
//!
//! Neither operation is idempotent. Tagging the same transaction twice
//! counts its amount twice, since nothing in a transaction marks it as
//! already tagged.

use tracing::info;

use crate::error::{Error, Result};
use crate::models::{AppState, TagTarget, TaggingRule};
use crate::store::next_id;

pub const GOAL_ICON: &str = "Target";
pub const DEBT_ICON: &str = "CreditCard";
pub const DEBT_PAYMENT_CATEGORY: &str = "Debt Payment";

/// Category label for an expense tagged to a goal
pub fn goal_category(goal_name: &str) -> String {
    format!("Goal: {}", goal_name)
}

/// Validate the transaction and return its index and expense magnitude
fn tagged_expense(state: &AppState, transaction_id: &str) -> Result<(usize, f64)> {
    let index = state
        .transactions
        .iter()
        .position(|t| t.id == transaction_id)
        .ok_or_else(|| Error::NotFound(format!("transaction {}", transaction_id)))?;
    let amount = state.transactions[index].amount;
    if !amount.is_finite() || amount >= 0.0 {
        return Err(Error::Validation(format!(
            "Only expenses can be tagged (transaction {} has amount {})",
            transaction_id, amount
        )));
    }
    Ok((index, amount.abs()))
}

fn record_rule(
    state: &mut AppState,
    pattern: String,
    target: TagTarget,
    target_id: &str,
    target_name: &str,
) -> TaggingRule {
    let rule = TaggingRule {
        id: next_id("r", |id| state.rules.iter().any(|r| r.id == id)),
        pattern,
        target,
        target_id: target_id.to_string(),
        target_name: target_name.to_string(),
    };
    state.rules.push(rule.clone());
    rule
}

/// Count an expense toward a savings goal
pub fn tag_to_goal(state: &mut AppState, transaction_id: &str, goal_id: &str) -> Result<TaggingRule> {
    let (tx_index, amount) = tagged_expense(state, transaction_id)?;
    let goal_index = state
        .goals
        .iter()
        .position(|g| g.id == goal_id)
        .ok_or_else(|| Error::NotFound(format!("goal {}", goal_id)))?;

    let goal = &mut state.goals[goal_index];
    goal.current += amount;
    let goal_name = goal.name.clone();
    let current = goal.current;

    let tx = &mut state.transactions[tx_index];
    tx.category = goal_category(&goal_name);
    tx.icon = GOAL_ICON.to_string();
    let pattern = tx.name.clone();

    let rule = record_rule(state, pattern, TagTarget::Goal, goal_id, &goal_name);
    info!(
        tx_id = %transaction_id,
        goal = %goal_name,
        amount,
        current,
        "Tagged expense to goal"
    );
    Ok(rule)
}

/// Count an expense as a payment against a credit or loan account
pub fn tag_to_debt(state: &mut AppState, transaction_id: &str, debt_id: &str) -> Result<TaggingRule> {
    let (tx_index, amount) = tagged_expense(state, transaction_id)?;
    let debt_index = state
        .accounts
        .iter()
        .position(|a| a.id == debt_id)
        .ok_or_else(|| Error::NotFound(format!("account {}", debt_id)))?;
    if !state.accounts[debt_index].is_debt() {
        return Err(Error::Validation(format!(
            "Account {} is not a credit or loan account",
            debt_id
        )));
    }

    let debt = &mut state.accounts[debt_index];
    debt.balance += amount;
    let debt_name = debt.name.clone();
    let balance = debt.balance;

    let tx = &mut state.transactions[tx_index];
    tx.category = DEBT_PAYMENT_CATEGORY.to_string();
    tx.icon = DEBT_ICON.to_string();
    let pattern = tx.name.clone();

    let rule = record_rule(state, pattern, TagTarget::Debt, debt_id, &debt_name);
    info!(
        tx_id = %transaction_id,
        debt = %debt_name,
        amount,
        balance,
        "Tagged expense as debt payment"
    );
    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_state;

    #[test]
    fn test_tag_to_goal() {
        let mut state = sample_state();
        let rule = tag_to_goal(&mut state, "1", "g1").unwrap();

        assert!((state.goal("g1").unwrap().current - 6645.50).abs() < 1e-9);
        let tx = state.transaction("1").unwrap();
        assert_eq!(tx.category, "Goal: Emergency Fund");
        assert_eq!(tx.icon, "Target");

        assert_eq!(rule.target, TagTarget::Goal);
        assert_eq!(rule.pattern, "Whole Foods Market");
        assert_eq!(rule.target_id, "g1");
        assert_eq!(rule.target_name, "Emergency Fund");
        assert!(rule.id.starts_with('r'));
        assert_eq!(state.rules, vec![rule]);
    }

    #[test]
    fn test_tag_to_goal_twice_double_counts() {
        let mut state = sample_state();
        tag_to_goal(&mut state, "1", "g1").unwrap();
        tag_to_goal(&mut state, "1", "g1").unwrap();

        assert!((state.goal("g1").unwrap().current - 6791.00).abs() < 1e-9);
        assert_eq!(state.rules.len(), 2);
        assert_ne!(state.rules[0].id, state.rules[1].id);
    }

    #[test]
    fn test_goal_contributions_are_uncapped() {
        let mut state = sample_state();
        state.goals[1].current = 4990.0;
        tag_to_goal(&mut state, "1", "g2").unwrap();
        let goal = state.goal("g2").unwrap();
        assert!(goal.current > goal.target);
    }

    #[test]
    fn test_tag_to_debt() {
        let mut state = sample_state();
        let rule = tag_to_debt(&mut state, "4", "a6").unwrap();

        assert!((state.account("a6").unwrap().balance - -2955.0).abs() < 1e-9);
        let tx = state.transaction("4").unwrap();
        assert_eq!(tx.category, "Debt Payment");
        assert_eq!(tx.icon, "CreditCard");
        assert_eq!(rule.target, TagTarget::Debt);
        assert_eq!(rule.target_name, "Account a6");
    }

    #[test]
    fn test_unresolved_ids_leave_state_untouched() {
        let mut state = sample_state();
        let before = state.clone();

        assert!(matches!(tag_to_goal(&mut state, "404", "g1"), Err(Error::NotFound(_))));
        assert!(matches!(tag_to_goal(&mut state, "1", "g404"), Err(Error::NotFound(_))));
        assert!(matches!(tag_to_debt(&mut state, "1", "a404"), Err(Error::NotFound(_))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_income_and_asset_targets_rejected() {
        let mut state = sample_state();
        let before = state.clone();

        // Salary is income
        assert!(tag_to_goal(&mut state, "2", "g1").unwrap_err().is_validation());
        // Checking is not a debt
        assert!(tag_to_debt(&mut state, "1", "a1").unwrap_err().is_validation());
        assert_eq!(state, before);
    }
}
