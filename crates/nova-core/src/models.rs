//! Domain models for Nova
//!
//! Field names serialize in camelCase so a snapshot is a single JSON document
//! shaped like the dashboard's state object (`accountId`, `chatHistory`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Ids in older snapshots may be bare numbers (`1`) or strings (`"h0"`)
fn id_from_str_or_int<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

/// Account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Credit,
    Investment,
    Loan,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Credit => "credit",
            Self::Investment => "investment",
            Self::Loan => "loan",
        }
    }

    /// Credit cards and loans carry a balance owed
    pub fn is_debt(&self) -> bool {
        matches!(self, Self::Credit | Self::Loan)
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "credit" | "credit_card" => Ok(Self::Credit),
            "investment" => Ok(Self::Investment),
            "loan" => Ok(Self::Loan),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank, card, brokerage or loan account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(deserialize_with = "id_from_str_or_int")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Assets are >= 0, debts are <= 0 (magnitude = amount owed)
    pub balance: f64,
    pub institution: String,
    pub mask: String,
    /// Annual percentage rate, only meaningful for credit/loan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apr: Option<f64>,
}

impl Account {
    pub fn is_debt(&self) -> bool {
        self.account_type.is_debt()
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "id_from_str_or_int")]
    pub id: String,
    pub name: String,
    /// Calendar-relative display date: "Today, 10:23 AM", "Yesterday, ...", "Nov 18"
    pub date: String,
    /// Negative = expense, positive = income
    pub amount: f64,
    pub category: String,
    #[serde(deserialize_with = "id_from_str_or_int")]
    pub account_id: String,
    pub icon: String,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub recurring: bool,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(deserialize_with = "id_from_str_or_int")]
    pub id: String,
    pub name: String,
    pub target: f64,
    /// Not capped at `target`
    pub current: f64,
    pub icon: String,
}

impl Goal {
    /// current / target, may exceed 1.0
    pub fn progress(&self) -> f64 {
        if self.target > 0.0 {
            self.current / self.target
        } else {
            0.0
        }
    }
}

/// Billing cycle for a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurring bill or subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(deserialize_with = "id_from_str_or_int")]
    pub id: String,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub cycle: BillingCycle,
    /// Serialized as YYYY-MM-DD
    pub next_due: NaiveDate,
    pub icon: String,
}

/// What a tagging rule points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagTarget {
    Goal,
    Debt,
}

impl TagTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Debt => "debt",
        }
    }
}

impl std::fmt::Display for TagTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record of a manual tag, created as a side effect of tagging.
///
/// Rules are inert: nothing applies them to future transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggingRule {
    pub id: String,
    /// Transaction name at creation time
    pub pattern: String,
    #[serde(rename = "type")]
    pub target: TagTarget,
    pub target_id: String,
    pub target_name: String,
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            content: content.into(),
        }
    }
}

/// Profile security toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    #[serde(default)]
    pub mfa_enabled: bool,
    #[serde(default)]
    pub biometric_enabled: bool,
}

/// Which security toggle to flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityFlag {
    Mfa,
    Biometric,
}

impl std::str::FromStr for SecurityFlag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mfa" => Ok(Self::Mfa),
            "biometric" | "biometrics" => Ok(Self::Biometric),
            _ => Err(format!("Unknown security setting: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub security: SecuritySettings,
}

/// The single root of all financial state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub user: User,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub subscriptions: Vec<Subscription>,
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    #[serde(default)]
    pub rules: Vec<TaggingRule>,
}

impl AppState {
    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn subscription(&self, id: &str) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.id == id)
    }

    /// Accounts of the given type, in stored order
    pub fn accounts_of(&self, account_type: AccountType) -> impl Iterator<Item = &Account> {
        self.accounts
            .iter()
            .filter(move |a| a.account_type == account_type)
    }
}
