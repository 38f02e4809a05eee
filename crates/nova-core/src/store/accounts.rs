//! Account and debt operations

use tracing::{info, warn};

use super::next_id;
use crate::error::{Error, Result};
use crate::models::{Account, AccountType, AppState};

/// Display name for a transaction whose account no longer exists
pub const UNKNOWN_ACCOUNT: &str = "Unknown";

/// A manually entered debt
#[derive(Debug, Clone)]
pub struct NewDebt {
    pub name: String,
    /// Amount owed; positive input is stored negated
    pub balance: f64,
    pub apr: f64,
    pub kind: AccountType,
}

/// Resolve an account id to its name
///
/// Deleting an account does not touch its transactions, so a dangling
/// `accountId` resolves to "Unknown".
pub fn account_name<'a>(state: &'a AppState, account_id: &str) -> &'a str {
    match state.account(account_id) {
        Some(account) => &account.name,
        None => {
            warn!(account_id, "Transaction references a missing account");
            UNKNOWN_ACCOUNT
        }
    }
}

/// Credit and loan accounts, in stored order
pub fn debt_accounts(state: &AppState) -> Vec<&Account> {
    state.accounts.iter().filter(|a| a.is_debt()).collect()
}

/// Accounts holding a positive balance
pub fn asset_accounts(state: &AppState) -> Vec<&Account> {
    state.accounts.iter().filter(|a| a.balance > 0.0).collect()
}

pub fn add_debt(state: &mut AppState, debt: NewDebt) -> Result<Account> {
    let name = debt.name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Debt name is required".to_string()));
    }
    if !debt.balance.is_finite() {
        return Err(Error::Validation("Debt balance must be a number".to_string()));
    }
    if !debt.apr.is_finite() {
        return Err(Error::Validation("APR must be a number".to_string()));
    }
    if !debt.kind.is_debt() {
        return Err(Error::Validation(format!(
            "A debt must be a credit or loan account, not {}",
            debt.kind
        )));
    }

    let account = Account {
        id: next_id("a", |id| state.account(id).is_some()),
        name: name.to_string(),
        account_type: debt.kind,
        balance: -debt.balance.abs(),
        institution: "Manual Entry".to_string(),
        mask: "XXXX".to_string(),
        apr: Some(debt.apr),
    };
    state.accounts.push(account.clone());

    info!(id = %account.id, name = %account.name, balance = account.balance, "Debt added");
    Ok(account)
}

/// Remove an account; its transactions keep the dangling reference
pub fn delete_account(state: &mut AppState, account_id: &str) -> Result<Account> {
    let index = state
        .accounts
        .iter()
        .position(|a| a.id == account_id)
        .ok_or_else(|| Error::NotFound(format!("account {}", account_id)))?;
    let removed = state.accounts.remove(index);

    let orphaned = state
        .transactions
        .iter()
        .filter(|t| t.account_id == account_id)
        .count();
    info!(id = %removed.id, orphaned, "Account deleted");
    Ok(removed)
}
