//! Simulated insight generation with injected failure
//!
//! Each request waits `delay`, then makes one independent draw: with
//! probability `failure_rate` it fails with a retryable error, otherwise it
//! yields the insight text. A retry is simply a new request. The text is
//! revealed progressively by `Typewriter`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::tasks::{DeferredTask, TaskOutcome};

pub const INSIGHT_MESSAGE: &str = "I've noticed a recurring subscription to 'Netflix' for $15.99. You also have a similar charge for 'Hulu'. Would you like me to analyze your streaming usage?";

/// Shown while a request is pending
pub const LOADING_TEXT: &str = "Analyzing finances...";

pub const FAILURE_TEXT: &str = "Failed to generate insight.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightStatus {
    Pending,
    Ready(String),
    /// Carries the user-facing error; the request can be retried
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct InsightGenerator {
    delay: Duration,
    failure_rate: f64,
    rng: Arc<Mutex<StdRng>>,
}

impl InsightGenerator {
    /// Generator drawing from OS entropy
    pub fn new(delay: Duration, failure_rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&failure_rate) {
            return Err(Error::Validation(format!(
                "Failure rate must be within [0, 1], got {}",
                failure_rate
            )));
        }
        Ok(Self {
            delay,
            failure_rate,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.insight_delay, config.insight_failure_rate)
    }

    /// Replace the RNG with a seeded one for reproducible draws
    pub fn with_rng(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    /// One immediate draw
    pub fn trial(&self) -> Result<String> {
        let draw: f64 = self
            .rng
            .lock()
            .map_err(|_| Error::Task("insight rng lock poisoned".to_string()))?
            .gen();
        if draw < self.failure_rate {
            warn!(draw, failure_rate = self.failure_rate, "Simulated insight failure");
            return Err(Error::Transient(FAILURE_TEXT.to_string()));
        }
        Ok(INSIGHT_MESSAGE.to_string())
    }

    /// Start a request: `Pending` now, `Ready` or `Failed` after the delay
    pub fn generate(&self) -> InsightRequest {
        let (status_tx, status) = watch::channel(InsightStatus::Pending);
        let generator = self.clone();
        debug!(delay_ms = self.delay.as_millis() as u64, "Insight requested");

        let task = DeferredTask::spawn(async move {
            tokio::time::sleep(generator.delay).await;
            let outcome = generator.trial();
            status_tx.send_replace(match &outcome {
                Ok(message) => InsightStatus::Ready(message.clone()),
                Err(e) => InsightStatus::Failed(e.to_string()),
            });
            outcome
        });

        InsightRequest { status, task }
    }

    /// Same operation as `generate`, as a fresh independent trial
    pub fn retry(&self) -> InsightRequest {
        info!("Retrying insight generation");
        self.generate()
    }
}

#[derive(Debug)]
pub struct InsightRequest {
    pub status: watch::Receiver<InsightStatus>,
    pub task: DeferredTask<Result<String>>,
}

impl InsightRequest {
    pub fn status(&self) -> InsightStatus {
        self.status.borrow().clone()
    }

    /// Wait for the draw
    pub async fn wait(self) -> Result<String> {
        match self.task.join().await? {
            TaskOutcome::Completed(outcome) => outcome,
            TaskOutcome::Cancelled => Err(Error::Task("insight request cancelled".to_string())),
        }
    }
}

/// Progressive reveal of a message, one character per frame
///
/// Yields growing prefixes ending at char boundaries.
#[derive(Debug, Clone)]
pub struct Typewriter<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Typewriter<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Emit each frame at `interval`, the first one immediately
    pub async fn play<F>(text: &str, interval: Duration, mut on_frame: F)
    where
        F: FnMut(&str),
    {
        let mut ticker = tokio::time::interval(interval);
        for frame in Typewriter::new(text) {
            ticker.tick().await;
            on_frame(frame);
        }
    }
}

impl<'a> Iterator for Typewriter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.text[self.pos..].chars().next()?;
        self.pos += next.len_utf8();
        Some(&self.text[..self.pos])
    }
}
