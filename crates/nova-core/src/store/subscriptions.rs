//! Bills and the planning calendar

use chrono::NaiveDate;
use tracing::info;

use super::next_id;
use crate::error::{Error, Result};
use crate::models::{AppState, BillingCycle, Subscription};

/// Add a monthly bill due on `due`
pub fn add_bill(state: &mut AppState, name: &str, amount: f64, due: NaiveDate) -> Result<Subscription> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Bill name is required".to_string()));
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation(
            "Bill amount must be a positive number".to_string(),
        ));
    }

    let bill = Subscription {
        id: next_id("s", |id| state.subscription(id).is_some()),
        name: name.to_string(),
        amount,
        cycle: BillingCycle::Monthly,
        next_due: due,
        icon: "AlertCircle".to_string(),
    };
    state.subscriptions.push(bill.clone());

    info!(id = %bill.id, name = %bill.name, due = %bill.next_due, "Bill added");
    Ok(bill)
}

/// Bills falling due on a calendar day
pub fn bills_due_on(state: &AppState, day: NaiveDate) -> Vec<&Subscription> {
    state
        .subscriptions
        .iter()
        .filter(|s| s.next_due == day)
        .collect()
}

/// Sum of all subscription amounts
pub fn upcoming_bills_total(state: &AppState) -> f64 {
    state.subscriptions.iter().map(|s| s.amount).sum()
}
