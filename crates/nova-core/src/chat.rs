//! Scripted financial assistant
//!
//! The assistant does keyword matching, not language understanding.
//! `classify` runs an ordered predicate chain over the lowercased message
//! and the first match picks the reply.
//!
//! Delivery is two timed stages. A submitted message is appended and
//! persisted immediately. The typing placeholder shows after
//! `typing_delay`, and the reply is computed and appended `reply_delay`
//! later. The reply reads the store as it is when that stage fires, not
//! as it was at submit time. Every submit starts its own pipeline.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::analytics::{monthly_spend, net_worth};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::models::{AccountType, AppState, ChatMessage};
use crate::money::fmt_usd;
use crate::store::{lock, upcoming_bills_total, SharedStore};
use crate::tasks::DeferredTask;

pub const HELP_TEXT: &str = "I'm still learning! I can help you track expenses, check your net worth, or analyze your bills. Try asking 'What is my net worth?' or 'How much did I spend?'";

/// What a message is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    UberSpend,
    MonthlySpend,
    NetWorth,
    Afford,
    Subscriptions,
    Help,
}

pub fn classify(text: &str) -> Intent {
    let text = text.to_lowercase();
    let has = |word: &str| text.contains(word);

    if has("spend") || has("spent") {
        if has("uber") {
            return Intent::UberSpend;
        }
        return Intent::MonthlySpend;
    }
    if has("net worth") {
        return Intent::NetWorth;
    }
    if has("afford") || has("vacation") {
        return Intent::Afford;
    }
    if has("subscription") || has("bill") {
        return Intent::Subscriptions;
    }
    Intent::Help
}

/// Compose the assistant's answer from the given state
pub fn reply(state: &AppState, text: &str, today: NaiveDate) -> String {
    match classify(text) {
        Intent::UberSpend => {
            let uber: f64 = state
                .transactions
                .iter()
                .filter(|t| t.name.to_lowercase().contains("uber"))
                .map(|t| t.amount)
                .sum();
            format!("You've spent {} on Uber.", fmt_usd(uber.abs()))
        }
        Intent::MonthlySpend => format!(
            "Your total spending this month is {}.",
            fmt_usd(monthly_spend(&state.transactions, today, today))
        ),
        Intent::NetWorth => format!(
            "Your current net worth is {}.",
            fmt_usd(net_worth(&state.accounts))
        ),
        Intent::Afford => {
            let invested = state
                .accounts_of(AccountType::Investment)
                .next()
                .map(|a| a.balance)
                .unwrap_or(0.0);
            format!(
                "You have {} in investments. Depending on the cost, you might be able to afford it, but keep your goals in mind!",
                fmt_usd(invested)
            )
        }
        Intent::Subscriptions => format!(
            "You have {} active subscriptions totaling {}/month.",
            state.subscriptions.len(),
            fmt_usd(upcoming_bills_total(state))
        ),
        Intent::Help => HELP_TEXT.to_string(),
    }
}

/// Where one exchange is in its delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    UserMessagePosted,
    AiTyping,
    AiMessagePosted,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimings {
    pub typing_delay: Duration,
    pub reply_delay: Duration,
}

impl Default for ChatTimings {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(100),
            reply_delay: Duration::from_millis(1000),
        }
    }
}

impl From<&EngineConfig> for ChatTimings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            typing_delay: config.typing_delay,
            reply_delay: config.reply_delay,
        }
    }
}

/// Source of "today" for date-relative replies
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// One in-flight message and its reply pipeline
#[derive(Debug)]
pub struct ChatExchange {
    pub phase: watch::Receiver<ChatPhase>,
    /// Resolves to the reply text once it has been appended
    pub task: DeferredTask<Result<String>>,
}

pub struct Responder {
    store: SharedStore,
    timings: ChatTimings,
    clock: Clock,
}

impl Responder {
    pub fn new(store: SharedStore, timings: ChatTimings) -> Self {
        Self::with_clock(store, timings, Arc::new(|| Local::now().date_naive()))
    }

    pub fn with_clock(store: SharedStore, timings: ChatTimings, clock: Clock) -> Self {
        Self {
            store,
            timings,
            clock,
        }
    }

    /// Post a user message and schedule the reply
    ///
    /// Blank input is rejected without touching the history.
    pub fn submit(&self, text: &str) -> Result<ChatExchange> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(Error::Validation("Message is empty".to_string()));
        }

        lock(&self.store)?.apply(|state| {
            state.chat_history.push(ChatMessage::user(text.clone()));
            Ok(())
        })?;
        debug!(intent = ?classify(&text), "User message posted");

        let (phase_tx, phase) = watch::channel(ChatPhase::UserMessagePosted);
        let store = self.store.clone();
        let clock = self.clock.clone();
        let timings = self.timings;

        let task = DeferredTask::spawn(async move {
            tokio::time::sleep(timings.typing_delay).await;
            phase_tx.send_replace(ChatPhase::AiTyping);

            tokio::time::sleep(timings.reply_delay).await;
            let posted = post_reply(&store, &text, clock());
            if posted.is_ok() {
                phase_tx.send_replace(ChatPhase::AiMessagePosted);
            }
            phase_tx.send_replace(ChatPhase::Idle);
            posted
        });

        Ok(ChatExchange { phase, task })
    }
}

/// Compute the reply against current state and append it
fn post_reply(store: &SharedStore, text: &str, today: NaiveDate) -> Result<String> {
    let mut store = lock(store)?;
    let content = reply(store.state(), text, today);
    store.apply(|state| {
        state.chat_history.push(ChatMessage::ai(content.clone()));
        Ok(())
    })?;
    info!(chars = content.len(), "Assistant replied");
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatRole;
    use crate::store::{delete_account, MemoryBackend, StateBackend, Store};
    use crate::tasks::TaskOutcome;
    use crate::test_utils::{sample_state, today};
    use tokio::time::Instant;

    fn shared_sample() -> SharedStore {
        let blob = serde_json::to_string(&sample_state()).unwrap();
        let backend = MemoryBackend::with_entry("novaState", &blob);
        Store::open(Box::new(backend), "novaState", today())
            .unwrap()
            .into_shared()
    }

    fn responder(store: &SharedStore) -> Responder {
        Responder::with_clock(store.clone(), ChatTimings::default(), Arc::new(today))
    }

    fn history(store: &SharedStore) -> Vec<ChatMessage> {
        lock(store).unwrap().state().chat_history.clone()
    }

    #[test]
    fn test_classify_order() {
        assert_eq!(classify("How much did I spend on Uber?"), Intent::UberSpend);
        assert_eq!(classify("what have I SPENT"), Intent::MonthlySpend);
        assert_eq!(classify("spend vs net worth"), Intent::MonthlySpend);
        assert_eq!(classify("What is my net worth?"), Intent::NetWorth);
        assert_eq!(classify("Can I afford a vacation?"), Intent::Afford);
        assert_eq!(classify("list my bills"), Intent::Subscriptions);
        assert_eq!(classify("Uber"), Intent::Help);
        assert_eq!(classify("hello"), Intent::Help);
    }

    #[test]
    fn test_replies_use_current_figures() {
        let state = sample_state();
        let at = |text: &str| reply(&state, text, today());

        assert_eq!(at("how much did I spend on uber"), "You've spent $54.50 on Uber.");
        assert_eq!(at("what did I spend"), "Your total spending this month is $161.49.");
        assert_eq!(at("net worth?"), "Your current net worth is $118,400.00.");
        assert!(at("can I afford it").starts_with("You have $135,000.00 in investments."));
        assert_eq!(
            at("subscriptions"),
            "You have 3 active subscriptions totaling $80.97/month."
        );
        assert_eq!(at("tell me a joke"), HELP_TEXT);
    }

    #[test]
    fn test_afford_without_investments() {
        let mut state = sample_state();
        state.accounts.retain(|a| a.account_type != AccountType::Investment);
        assert!(reply(&state, "vacation", today()).starts_with("You have $0.00 in investments."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_pipeline() {
        let store = shared_sample();
        let responder = responder(&store);
        let start = Instant::now();

        let mut exchange = responder.submit("  What is my net worth?  ").unwrap();
        assert_eq!(*exchange.phase.borrow(), ChatPhase::UserMessagePosted);
        let posted = history(&store);
        assert_eq!(posted.len(), 2);
        assert_eq!(posted[1], ChatMessage::user("What is my net worth?"));

        exchange.phase.changed().await.unwrap();
        assert_eq!(*exchange.phase.borrow(), ChatPhase::AiTyping);
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(history(&store).len(), 2);

        let outcome = exchange.task.join().await.unwrap();
        let content = outcome.completed().unwrap().unwrap();
        assert_eq!(content, "Your current net worth is $118,400.00.");
        assert!(start.elapsed() >= Duration::from_millis(1100));
        assert_eq!(*exchange.phase.borrow(), ChatPhase::Idle);

        let after = history(&store);
        assert_eq!(after.len(), 3);
        assert_eq!(after[2].role, ChatRole::Ai);
        assert_eq!(after[2].content, content);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_message_rejected() {
        let store = shared_sample();
        let err = responder(&store).submit("   ").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(history(&store).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_reads_state_at_fire_time() {
        let store = shared_sample();
        let exchange = responder(&store).submit("net worth").unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;
        lock(&store)
            .unwrap()
            .apply(|s| delete_account(s, "a3").map(|_| ()))
            .unwrap();

        let content = exchange.task.join().await.unwrap().completed().unwrap().unwrap();
        assert_eq!(content, "Your current net worth is -$16,600.00.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_submits_run_independently() {
        let store = shared_sample();
        let responder = responder(&store);

        let first = responder.submit("net worth").unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        let second = responder.submit("bills").unwrap();

        first.task.join().await.unwrap();
        second.task.join().await.unwrap();

        let roles: Vec<_> = history(&store).iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::Ai, ChatRole::User, ChatRole::User, ChatRole::Ai, ChatRole::Ai]
        );
        let last = history(&store).pop().unwrap();
        assert!(last.content.contains("3 active subscriptions"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_exchange_posts_no_reply() {
        let store = shared_sample();
        let exchange = responder(&store).submit("net worth").unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        exchange.task.cancel();
        let outcome = exchange.task.join().await.unwrap();
        assert!(matches!(outcome, TaskOutcome::Cancelled));

        tokio::time::sleep(Duration::from_secs(2)).await;
        let messages = history(&store);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, ChatRole::User);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_is_persisted() {
        let backend = MemoryBackend::new();
        let store = Store::open(Box::new(backend.clone()), "novaState", today())
            .unwrap()
            .into_shared();
        let exchange = responder(&store).submit("hi").unwrap();
        exchange.task.join().await.unwrap();

        let blob = backend.get("novaState").unwrap().unwrap();
        let persisted = crate::store::parse_snapshot(&blob).unwrap();
        assert_eq!(persisted.chat_history.len(), 3);
        assert_eq!(persisted.chat_history[2].content, HELP_TEXT);
    }
}
