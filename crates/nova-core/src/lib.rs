//! Nova Core Library
//!
//! Financial state and analytics engine for the Nova dashboard:
//! - Entity store with snapshot persistence (memory or file backends)
//! - Seed data for first launch
//! - Analytics: net worth, spend, category totals, monthly trend, forecasts
//! - Debt payoff planner (avalanche / snowball)
//! - Manual tagging of expenses to goals and debts
//! - Search across transactions, bills and goals
//! - Scripted chat assistant and simulated insight generator, both built on
//!   cancellable deferred tasks

pub mod analytics;
pub mod chat;
pub mod config;
pub mod dates;
pub mod debt;
pub mod error;
pub mod insights;
pub mod models;
pub mod money;
pub mod search;
pub mod seed;
pub mod store;
pub mod tags;
pub mod tasks;
pub mod transaction_filter;

/// Fixture builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{
    category_totals, daily_cash_flow_forecast, dashboard_summary, monthly_spend, monthly_trend,
    net_worth, planning_forecast, safe_to_spend, AccountScope, DashboardSummary, SafeToSpend,
    TrendBucket,
};
pub use chat::{classify, reply, ChatExchange, ChatPhase, ChatTimings, Intent, Responder};
pub use config::EngineConfig;
pub use debt::{payoff_plan, PayoffHorizon, PayoffPlan, Strategy};
pub use error::{Error, Result};
pub use insights::{InsightGenerator, InsightRequest, InsightStatus, Typewriter};
pub use models::{
    Account, AccountType, AppState, ChatMessage, ChatRole, Goal, SecurityFlag, Subscription,
    TagTarget, TaggingRule, Transaction,
};
pub use money::fmt_usd;
pub use search::{search, NavTarget, ResultKind, SearchResult, View, WealthTab};
pub use store::{FileBackend, MemoryBackend, SharedStore, StateBackend, Store};
pub use tags::{tag_to_debt, tag_to_goal};
pub use tasks::{CancelToken, DeferredTask, TaskOutcome};
pub use transaction_filter::{list_transactions, SortDirection, SortField, TransactionFilter};
