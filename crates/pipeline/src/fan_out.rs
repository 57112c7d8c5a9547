//! # Bounded Fan-Out
//!
//! Runs one async worker per input item with at most `concurrency_limit`
//! workers in flight, admitting queued items in input order as slots free up.
//!
//! ## Algorithm
//! 1. Admit the first `limit` items into a `FuturesUnordered`
//! 2. Each time a worker settles, record its outcome in the slot of its
//!    input index and admit the next queued item
//! 3. Under [`FailurePolicy::FailFast`] the first failure ends the run:
//!    no further items are admitted and workers still in flight are left to
//!    finish in the background with their outcomes discarded
//! 4. Under [`FailurePolicy::CollectPartial`] every item runs and each
//!    outcome is returned in input order
//!
//! Completion order never leaks into the result: outcomes are always
//! reported in the order the items were given.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use tracing::debug;

/// Concurrency limit used when none (or a non-positive one) is configured
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 5;

/// How a fan-out reacts to a failed item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Any failure fails the whole run
    #[default]
    FailFast,
    /// Failures are reported per item and the run continues
    CollectPartial,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" => Ok(Self::FailFast),
            "collect-partial" => Ok(Self::CollectPartial),
            other => Err(format!(
                "unknown failure policy '{}' (expected 'fail-fast' or 'collect-partial')",
                other
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail-fast"),
            Self::CollectPartial => write!(f, "collect-partial"),
        }
    }
}

/// Runs workers over a list of items under a concurrency bound
#[derive(Debug, Clone, Copy)]
pub struct FanOut {
    concurrency_limit: usize,
}

impl Default for FanOut {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY_LIMIT)
    }
}

impl FanOut {
    /// A limit of 0 behaves as 1
    pub fn new(concurrency_limit: usize) -> Self {
        Self {
            concurrency_limit: concurrency_limit.max(1),
        }
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Apply `worker` to every item.
    ///
    /// # Returns
    /// * `Ok(outcomes)` - One outcome per item, in input order. Under
    ///   `FailFast` every outcome is `Ok`.
    /// * `Err(e)` - Only under `FailFast`: the first failure observed
    pub async fn run<I, O, E, F, Fut>(
        &self,
        items: Vec<I>,
        policy: FailurePolicy,
        worker: F,
    ) -> Result<Vec<Result<O, E>>, E>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        O: Send + 'static,
        E: Send + 'static,
    {
        let total = items.len();
        let mut slots: Vec<Option<Result<O, E>>> = (0..total).map(|_| None).collect();
        let mut queue = items.into_iter().enumerate();
        let mut running: FuturesUnordered<BoxFuture<'static, (usize, Result<O, E>)>> =
            FuturesUnordered::new();

        let mut admit = |running: &mut FuturesUnordered<_>| {
            if let Some((index, item)) = queue.next() {
                let fut = worker(item);
                running.push(async move { (index, fut.await) }.boxed());
            }
        };

        for _ in 0..self.concurrency_limit.min(total) {
            admit(&mut running);
        }

        while let Some((index, outcome)) = running.next().await {
            if policy == FailurePolicy::FailFast {
                if let Err(e) = outcome {
                    debug!(
                        "Fan-out failed at item {} with {} still in flight",
                        index,
                        running.len()
                    );
                    if !running.is_empty() {
                        tokio::spawn(running.for_each(|_| async {}));
                    }
                    return Err(e);
                }
            }
            slots[index] = Some(outcome);
            admit(&mut running);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
