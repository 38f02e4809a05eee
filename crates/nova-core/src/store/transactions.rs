//! Transaction lookup and removal

use tracing::info;

use crate::error::{Error, Result};
use crate::models::{AppState, Transaction};

pub fn find_transaction<'a>(state: &'a AppState, transaction_id: &str) -> Result<&'a Transaction> {
    state
        .transaction(transaction_id)
        .ok_or_else(|| Error::NotFound(format!("transaction {}", transaction_id)))
}

pub fn delete_transaction(state: &mut AppState, transaction_id: &str) -> Result<Transaction> {
    let index = state
        .transactions
        .iter()
        .position(|t| t.id == transaction_id)
        .ok_or_else(|| Error::NotFound(format!("transaction {}", transaction_id)))?;
    let removed = state.transactions.remove(index);
    info!(id = %removed.id, name = %removed.name, "Transaction deleted");
    Ok(removed)
}
