//! Chat and insight command implementations

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use nova_core::insights::LOADING_TEXT;
use nova_core::{
    ChatPhase, ChatTimings, EngineConfig, InsightGenerator, Responder, Store, Typewriter,
};
use tracing::{debug, warn};

/// Send one message and print the reply once it lands
///
/// Returns the reply text.
pub async fn cmd_chat(
    store: Store,
    config: &EngineConfig,
    message: &str,
    today: NaiveDate,
) -> Result<String> {
    let shared = store.into_shared();
    let responder = Responder::with_clock(shared, ChatTimings::from(config), Arc::new(move || today));

    let mut exchange = responder.submit(message).context("Failed to send message")?;
    println!("🧑 {}", message.trim());

    while exchange.phase.changed().await.is_ok() {
        let phase = *exchange.phase.borrow_and_update();
        match phase {
            ChatPhase::AiTyping => println!("   Nova is typing..."),
            ChatPhase::Idle => break,
            _ => {}
        }
    }

    let reply = exchange
        .task
        .join()
        .await?
        .completed()
        .ok_or_else(|| anyhow!("Chat reply was cancelled"))?
        .context("Failed to post reply")?;
    println!("🤖 {}", reply);
    Ok(reply)
}

/// Request an insight, retrying transient failures up to `retries` times
pub async fn cmd_insight(
    generator: &InsightGenerator,
    config: &EngineConfig,
    retries: u32,
) -> Result<String> {
    debug!(failure_rate = generator.failure_rate(), retries, "Requesting insight");
    let mut attempt = 0;
    loop {
        println!("💡 {}", LOADING_TEXT);
        let request = if attempt == 0 {
            generator.generate()
        } else {
            generator.retry()
        };

        match request.wait().await {
            Ok(message) => {
                print!("   ");
                let mut shown = 0;
                Typewriter::play(&message, config.reveal_interval, |frame| {
                    print!("{}", &frame[shown..]);
                    shown = frame.len();
                    let _ = std::io::stdout().flush();
                })
                .await;
                println!();
                return Ok(message);
            }
            Err(e) if e.is_retryable() && attempt < retries => {
                attempt += 1;
                warn!(attempt, retries, "Insight failed, retrying");
                println!("   ⚠️  {} Retrying ({}/{})...", e, attempt, retries);
            }
            Err(e) => {
                println!("   ❌ {}", e);
                if e.is_retryable() {
                    println!("   Try again, or pass --retries to retry automatically.");
                }
                return Err(anyhow!(e));
            }
        }
    }
}
