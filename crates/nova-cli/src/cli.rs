//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nova - Personal finance dashboard
#[derive(Parser)]
#[command(name = "nova")]
#[command(about = "Personal finance dashboard: balances, spending, goals and debt", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the state snapshot (defaults to ~/.local/share/nova)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file path (defaults to config.toml in the data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep state in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show net worth, monthly spend and safe-to-spend
    Dashboard {
        /// Limit the summary to one account ID
        #[arg(short, long)]
        account: Option<String>,
    },

    /// List transactions
    Transactions {
        /// Filter: all, income, expenses, recurring
        #[arg(short, long, default_value = "all")]
        filter: String,

        /// Sort field: date, name, amount, category
        #[arg(short, long, default_value = "date")]
        sort: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show spending by category
    Categories,

    /// Show income vs expense for the last six months
    Trend,

    /// Plan debt payoff
    Debt {
        /// Strategy: avalanche (highest APR first) or snowball (smallest balance first)
        #[arg(short, long, default_value = "avalanche")]
        strategy: String,

        /// Extra monthly payment on top of the minimum (defaults to config)
        #[arg(short, long)]
        extra: Option<f64>,
    },

    /// Search transactions, bills and goals
    Search {
        /// Text to look for
        query: String,
    },

    /// Ask the assistant a question
    Chat {
        /// Message to send
        message: String,
    },

    /// Generate a spending insight
    Insight {
        /// Retry this many times after a failure
        #[arg(short, long, default_value = "0")]
        retries: u32,
    },

    /// Tag an expense to a goal or debt
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// List tagging rules
    Rules,

    /// Manage savings goals
    Goal {
        #[command(subcommand)]
        action: Option<GoalAction>,
    },

    /// Manage debt accounts
    Debts {
        #[command(subcommand)]
        action: Option<DebtsAction>,
    },

    /// Manage bills
    Bill {
        #[command(subcommand)]
        action: Option<BillAction>,
    },

    /// Manage individual transactions
    Transaction {
        #[command(subcommand)]
        action: TransactionAction,
    },

    /// Update profile and security settings
    User {
        #[command(subcommand)]
        action: Option<UserAction>,
    },

    /// Discard all state and start again from sample data
    Reset,
}

#[derive(Subcommand)]
pub enum TagAction {
    /// Count an expense toward a savings goal
    Goal {
        /// Transaction ID
        transaction: String,
        /// Goal ID
        goal: String,
    },

    /// Count an expense as a payment on a debt
    Debt {
        /// Transaction ID
        transaction: String,
        /// Debt account ID
        debt: String,
    },
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// Add a goal (icon is picked from the name)
    Add {
        /// Goal name
        name: String,
        /// Target amount
        target: f64,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum DebtsAction {
    /// Add a debt
    Add {
        /// Debt name
        name: String,
        /// Amount owed
        balance: f64,
        /// Annual percentage rate
        apr: f64,
        /// Account type: credit or loan
        #[arg(short, long, default_value = "credit")]
        kind: String,
    },

    /// Delete a debt account
    Delete {
        /// Account ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum BillAction {
    /// Add a monthly bill
    Add {
        /// Bill name
        name: String,
        /// Amount due
        amount: f64,
        /// Next due date (YYYY-MM-DD)
        date: String,
    },

    /// Show bills due on a date
    Due {
        /// Date (YYYY-MM-DD)
        date: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionAction {
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Change the display name
    Name {
        /// New name
        name: String,
    },

    /// Turn a security setting on or off
    Security {
        /// Setting: mfa or biometric
        flag: String,
        /// on or off
        state: String,
    },
}
