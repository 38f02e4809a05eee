//! Seed state generator
//!
//! Produces the demo AppState used when no snapshot exists. Generation is
//! deterministic for a given reference day: the historical transactions are
//! drawn from a fixed-seed RNG.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::dates::{add_months, month_start, next_occurrence};
use crate::models::{
    Account, AccountType, AppState, BillingCycle, ChatMessage, Goal, SecuritySettings,
    Subscription, Transaction, User,
};
use crate::money::round_cents;

const SEED: u64 = 0x4e6f_7661;

/// Number of generated historical transactions
pub const HISTORY_LEN: usize = 50;

pub const GREETING: &str = "Hello! I'm Nova, your financial assistant. I can help you analyze your spending, track your net worth, or plan for big purchases. How can I help you today?";

const SPEND_CATEGORIES: [&str; 6] = [
    "Groceries",
    "Transport",
    "Entertainment",
    "Dining",
    "Utilities",
    "Shopping",
];

const MERCHANTS: [&str; 5] = ["Target", "Starbucks", "Amazon", "Uber", "Trader Joe's"];

fn account(
    id: &str,
    name: &str,
    account_type: AccountType,
    balance: f64,
    institution: &str,
    mask: &str,
    apr: Option<f64>,
) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
        account_type,
        balance,
        institution: institution.to_string(),
        mask: mask.to_string(),
        apr,
    }
}

#[allow(clippy::too_many_arguments)]
fn transaction(
    id: &str,
    name: &str,
    date: &str,
    amount: f64,
    category: &str,
    account_id: &str,
    icon: &str,
    pending: bool,
    recurring: bool,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        name: name.to_string(),
        date: date.to_string(),
        amount,
        category: category.to_string(),
        account_id: account_id.to_string(),
        icon: icon.to_string(),
        pending,
        recurring,
    }
}

fn subscription(id: &str, name: &str, amount: f64, next_due: NaiveDate, icon: &str) -> Subscription {
    Subscription {
        id: id.to_string(),
        name: name.to_string(),
        amount,
        cycle: BillingCycle::Monthly,
        next_due,
        icon: icon.to_string(),
    }
}

fn goal(id: &str, name: &str, target: f64, current: f64, icon: &str) -> Goal {
    Goal {
        id: id.to_string(),
        name: name.to_string(),
        target,
        current,
        icon: icon.to_string(),
    }
}

/// Historical transactions spread over the current month and the four before it
fn history(today: NaiveDate) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let this_month = month_start(today);

    (0..HISTORY_LEN)
        .map(|i| {
            let months_back = (i / 10) as i32;
            let month = add_months(this_month, -months_back);
            // Keep current-month entries on or before today
            let max_day = if months_back == 0 { today.day().min(28) } else { 28 };
            let day: u32 = rng.gen_range(1..=max_day);
            let date = NaiveDate::from_ymd_opt(month.year(), month.month(), day).unwrap_or(month);

            let is_income = rng.gen::<f64>() > 0.8;
            let amount = if is_income {
                2000.0 + rng.gen::<f64>() * 1000.0
            } else {
                -(20.0 + rng.gen::<f64>() * 150.0)
            };
            let category = if is_income {
                "Income"
            } else {
                SPEND_CATEGORIES[rng.gen_range(0..SPEND_CATEGORIES.len())]
            };
            let merchant = MERCHANTS[rng.gen_range(0..MERCHANTS.len())];

            transaction(
                &format!("h{}", i),
                if is_income { "Freelance Work" } else { merchant },
                &date.format("%b %-d").to_string(),
                round_cents(amount),
                category,
                if is_income { "a1" } else { "a2" },
                if is_income { "Zap" } else { "CreditCard" },
                false,
                false,
            )
        })
        .collect()
}

/// Generate the demo state for the given reference day (no chat history)
pub fn generate(today: NaiveDate) -> AppState {
    let mut transactions = vec![
        transaction("1", "Whole Foods Market", "Today, 10:23 AM", -145.50, "Groceries", "a2", "ShoppingBag", true, false),
        transaction("2", "Tech Corp Salary", "Yesterday, 4:00 PM", 4200.00, "Income", "a1", "Zap", false, false),
        transaction("3", "Netflix Subscription", "Nov 18, 6:30 PM", -15.99, "Entertainment", "a2", "Tv", false, true),
        transaction("4", "Shell Station", "Nov 15, 9:00 AM", -45.00, "Transport", "a2", "Car", false, false),
        transaction("5", "Uber Ride", "Nov 14, 11:15 PM", -24.50, "Transport", "a2", "Car", false, false),
        transaction("6", "Electric Bill", "Nov 12, 10:00 AM", -120.00, "Utilities", "a1", "Home", false, true),
    ];
    transactions.extend(history(today));

    let state = AppState {
        user: User {
            name: "Decio".to_string(),
            avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Decio".to_string(),
            security: SecuritySettings {
                mfa_enabled: true,
                biometric_enabled: true,
            },
        },
        accounts: vec![
            account("a1", "Chase Total Checking", AccountType::Checking, 4250.00, "Chase", "1234", None),
            account("a2", "Amex Gold", AccountType::Credit, -850.00, "American Express", "5678", Some(24.99)),
            account("a3", "Vanguard Index Fund", AccountType::Investment, 135000.00, "Vanguard", "9012", None),
            account("a4", "Car Loan", AccountType::Loan, -15000.00, "Wells Fargo", "3456", Some(5.49)),
            account("a5", "Student Loan", AccountType::Loan, -2000.00, "Navient", "1111", Some(4.5)),
            account("a6", "Visa Signature", AccountType::Credit, -3000.00, "Chase", "2222", Some(22.0)),
        ],
        transactions,
        subscriptions: vec![
            subscription("s1", "Netflix", 15.99, next_occurrence(today, 18), "Tv"),
            subscription("s2", "Spotify", 9.99, next_occurrence(today, 20), "Music"),
            subscription("s3", "Adobe Creative Cloud", 54.99, next_occurrence(today, 5), "Monitor"),
        ],
        goals: vec![
            goal("g1", "Emergency Fund", 10000.0, 6500.0, "Shield"),
            goal("g2", "Japan Trip", 5000.0, 1200.0, "Plane"),
        ],
        chat_history: Vec::new(),
        rules: Vec::new(),
    };

    info!(
        accounts = state.accounts.len(),
        transactions = state.transactions.len(),
        "Generated seed state"
    );
    state
}

/// Seed state plus the assistant's opening message
pub fn generate_with_greeting(today: NaiveDate) -> AppState {
    let mut state = generate(today);
    state.chat_history.push(ChatMessage::ai(GREETING));
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{months_between, resolve_date};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_seed_is_deterministic() {
        assert_eq!(generate(today()), generate(today()));
    }

    #[test]
    fn test_seed_shape() {
        let state = generate(today());
        assert_eq!(state.accounts.len(), 6);
        assert_eq!(state.transactions.len(), 6 + HISTORY_LEN);
        assert_eq!(state.subscriptions.len(), 3);
        assert_eq!(state.goals.len(), 2);
        assert!(state.chat_history.is_empty());
        assert!(state.rules.is_empty());

        // Every debt account carries an APR
        assert!(state
            .accounts
            .iter()
            .filter(|a| a.is_debt())
            .all(|a| a.apr.is_some()));
    }

    #[test]
    fn test_history_within_five_months() {
        let state = generate(today());
        for tx in state.transactions.iter().filter(|t| t.id.starts_with('h')) {
            let resolved = resolve_date(&tx.date, today()).expect("history date resolves");
            let age = months_between(resolved, today());
            assert!((0..=4).contains(&age), "{} resolved {} months back", tx.date, age);
            assert!(tx.amount != 0.0);
            if tx.category == "Income" {
                assert!(tx.amount >= 2000.0 && tx.amount <= 3000.0);
                assert_eq!(tx.account_id, "a1");
            } else {
                assert!(tx.amount <= -20.0 && tx.amount >= -170.0);
                assert_eq!(tx.account_id, "a2");
            }
        }
    }

    #[test]
    fn test_greeting_attached() {
        let state = generate_with_greeting(today());
        assert_eq!(state.chat_history.len(), 1);
        assert_eq!(state.chat_history[0].content, GREETING);
    }
}
