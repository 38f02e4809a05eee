//! Nova CLI - Personal finance dashboard
//!
//! Usage:
//!   nova dashboard            Net worth, monthly spend, safe-to-spend
//!   nova transactions         List transactions
//!   nova debt --extra 250     Plan debt payoff
//!   nova chat "net worth?"    Ask the assistant

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use nova_core::InsightGenerator;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let today = commands::today();
    let (config, mut store) = commands::open_store(
        cli.config.as_deref(),
        cli.data_dir.as_deref(),
        cli.ephemeral,
        today,
    )?;

    match cli.command {
        Commands::Dashboard { account } => {
            commands::cmd_dashboard(&store, account.as_deref(), today)
        }
        Commands::Transactions { filter, sort, desc } => {
            commands::cmd_transactions_list(&store, &filter, &sort, desc, today)
        }
        Commands::Categories => commands::cmd_categories(&store),
        Commands::Trend => commands::cmd_trend(&store, today),
        Commands::Debt { strategy, extra } => {
            commands::cmd_debt_plan(&store, &config, &strategy, extra, today)
        }
        Commands::Search { query } => commands::cmd_search(&store, &query),
        Commands::Chat { message } => commands::cmd_chat(store, &config, &message, today)
            .await
            .map(|_| ()),
        Commands::Insight { retries } => {
            let generator = InsightGenerator::from_config(&config)?;
            commands::cmd_insight(&generator, &config, retries)
                .await
                .map(|_| ())
        }
        Commands::Tag { action } => match action {
            TagAction::Goal { transaction, goal } => {
                commands::cmd_tag_goal(&mut store, &transaction, &goal)
            }
            TagAction::Debt { transaction, debt } => {
                commands::cmd_tag_debt(&mut store, &transaction, &debt)
            }
        },
        Commands::Rules => commands::cmd_rules_list(&store),
        Commands::Goal { action } => match action {
            None => commands::cmd_goals_list(&store),
            Some(GoalAction::Add { name, target }) => {
                commands::cmd_goal_add(&mut store, &name, target)
            }
            Some(GoalAction::Delete { id }) => commands::cmd_goal_delete(&mut store, &id),
        },
        Commands::Debts { action } => match action {
            None => commands::cmd_debts_list(&store),
            Some(DebtsAction::Add {
                name,
                balance,
                apr,
                kind,
            }) => commands::cmd_debt_add(&mut store, &name, balance, apr, &kind),
            Some(DebtsAction::Delete { id }) => commands::cmd_debt_delete(&mut store, &id),
        },
        Commands::Bill { action } => match action {
            None => commands::cmd_bills_list(&store),
            Some(BillAction::Add { name, amount, date }) => {
                commands::cmd_bill_add(&mut store, &name, amount, &date)
            }
            Some(BillAction::Due { date }) => commands::cmd_bills_due(&store, &date),
        },
        Commands::Transaction { action } => match action {
            TransactionAction::Delete { id } => commands::cmd_transaction_delete(&mut store, &id),
        },
        Commands::User { action } => match action {
            None => commands::cmd_user_show(&store),
            Some(UserAction::Name { name }) => commands::cmd_user_name(&mut store, &name),
            Some(UserAction::Security { flag, state }) => {
                commands::cmd_user_security(&mut store, &flag, &state)
            }
        },
        Commands::Reset => commands::cmd_reset(&mut store, today),
    }
}
