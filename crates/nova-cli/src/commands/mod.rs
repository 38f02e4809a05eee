//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_store, argument parsing) and reset
//! - `overview` - Dashboard, category and trend reports
//! - `transactions` - Transaction listing, deletion and search
//! - `wealth` - Goals, debts, payoff planning and tagging
//! - `bills` - Bills and the planning calendar
//! - `assistant` - Chat and insight commands
//! - `user` - Profile and security settings

pub mod assistant;
pub mod bills;
pub mod core;
pub mod overview;
pub mod transactions;
pub mod user;
pub mod wealth;

// Re-export command functions for main.rs
pub use assistant::*;
pub use bills::*;
pub use core::*;
pub use overview::*;
pub use transactions::*;
pub use user::*;
pub use wealth::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
