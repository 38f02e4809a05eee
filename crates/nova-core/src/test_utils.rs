//! Fixture builders shared by unit tests

use chrono::NaiveDate;

use crate::models::{
    Account, AccountType, AppState, BillingCycle, ChatMessage, Goal, SecuritySettings,
    Subscription, Transaction, User,
};

/// Fixed reference day for date-relative tests
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn account(
    id: &str,
    account_type: AccountType,
    balance: f64,
    apr: Option<f64>,
) -> Account {
    Account {
        id: id.to_string(),
        name: format!("Account {}", id),
        account_type,
        balance,
        institution: "Test Bank".to_string(),
        mask: "0000".to_string(),
        apr,
    }
}

pub fn tx(id: &str, name: &str, date: &str, amount: f64, category: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        name: name.to_string(),
        date: date.to_string(),
        amount,
        category: category.to_string(),
        account_id: if amount > 0.0 { "a1" } else { "a2" }.to_string(),
        icon: "CreditCard".to_string(),
        pending: false,
        recurring: false,
    }
}

pub fn goal(id: &str, name: &str, target: f64, current: f64) -> Goal {
    Goal {
        id: id.to_string(),
        name: name.to_string(),
        target,
        current,
        icon: "Target".to_string(),
    }
}

pub fn subscription(id: &str, name: &str, amount: f64, next_due: NaiveDate) -> Subscription {
    Subscription {
        id: id.to_string(),
        name: name.to_string(),
        amount,
        cycle: BillingCycle::Monthly,
        next_due,
        icon: "Tv".to_string(),
    }
}

/// Small hand-built state; dates relative to `today()` (2026-10-18)
pub fn sample_state() -> AppState {
    AppState {
        user: User {
            name: "Test User".to_string(),
            avatar: String::new(),
            security: SecuritySettings::default(),
        },
        accounts: vec![
            account("a1", AccountType::Checking, 4250.0, None),
            account("a2", AccountType::Credit, -850.0, Some(24.99)),
            account("a3", AccountType::Investment, 135000.0, None),
            account("a4", AccountType::Loan, -15000.0, Some(5.49)),
            account("a5", AccountType::Loan, -2000.0, Some(4.5)),
            account("a6", AccountType::Credit, -3000.0, Some(22.0)),
        ],
        transactions: vec![
            tx("1", "Whole Foods Market", "Today, 10:23 AM", -145.50, "Groceries"),
            tx("2", "Tech Corp Salary", "Yesterday, 4:00 PM", 4200.0, "Income"),
            tx("3", "Netflix Subscription", "Oct 2, 6:30 PM", -15.99, "Entertainment"),
            tx("4", "Shell Station", "Sep 15, 9:00 AM", -45.0, "Transport"),
            tx("5", "Uber Ride", "Sep 14, 11:15 PM", -24.50, "Transport"),
            tx("6", "Uber Eats", "Aug 3", -30.0, "Dining"),
            tx("7", "Freelance Work", "May 20", 2500.0, "Income"),
            tx("8", "Old Purchase", "Apr 1", -99.0, "Shopping"),
        ],
        subscriptions: vec![
            subscription("s1", "Netflix", 15.99, date(2026, 10, 18)),
            subscription("s2", "Spotify", 9.99, date(2026, 10, 20)),
            subscription("s3", "Adobe Creative Cloud", 54.99, date(2026, 11, 5)),
        ],
        goals: vec![
            goal("g1", "Emergency Fund", 10000.0, 6500.0),
            goal("g2", "Japan Trip", 5000.0, 1200.0),
        ],
        chat_history: vec![ChatMessage::ai("Hello!")],
        rules: Vec::new(),
    }
}
