//! Bounded executors driving fetch units over a work source.
//!
//! Both executors return only after every submitted unit of work has
//! completed; there is no partial-result early return and no cancellation.
//! Per-item
//! failures are isolated by [`isolate_failure`] and never abort a run.

use async_trait::async_trait;
use futures::{StreamExt, stream};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use super::queue::WorkQueue;
use super::WorkItem;
use crate::error::Result;
use crate::record::{FetchResult, Record};

/// The polymorphic fetch-unit capability.
///
/// One implementation per collector; whether a fetch suspends cooperatively
/// (non-blocking HTTP) or dispatches to blocking automation is the
/// implementor's business; the executors are agnostic to it.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform one externally-visible network operation for `item` and parse
    /// the response into zero or more records.
    ///
    /// Errors returned here are treated as transient per-item failures by the
    /// executors: logged once and converted into an empty result.
    async fn fetch(&self, item: &WorkItem) -> Result<Vec<Record>>;
}

/// Convert a fallible fetch outcome into a [`FetchResult`], logging a failure
/// exactly once with the item it belongs to.
pub fn isolate_failure(item: impl Display, outcome: Result<Vec<Record>>) -> FetchResult {
    match outcome {
        Ok(records) => FetchResult::from_records(records),
        Err(e) => {
            tracing::warn!(item = %item, error = %e, "fetch failed, item contributes no records");
            FetchResult::failed()
        }
    }
}

/// Run a worker pool of `workers` tasks over a shared queue.
///
/// Each worker loops "pop next item, fetch, repeat" until the queue reports
/// exhaustion, so for K enumerated items exactly K fetch invocations happen,
/// with at most `workers` in flight at any instant. Results are collected in
/// arrival order per worker and concatenated at join time.
pub async fn run_queue(
    queue: Arc<WorkQueue<WorkItem>>,
    fetcher: Arc<dyn Fetcher>,
    workers: usize,
) -> Vec<FetchResult> {
    let workers = workers.max(1);
    let mut handles = Vec::with_capacity(workers);

    for worker_id in 0..workers {
        let queue = Arc::clone(&queue);
        let fetcher = Arc::clone(&fetcher);
        handles.push(tokio::spawn(async move {
            let mut results = Vec::new();
            while let Some(item) = queue.pop().await {
                let outcome = fetcher.fetch(&item).await;
                results.push(isolate_failure(&item, outcome));
            }
            tracing::debug!(worker_id, fetched = results.len(), "worker finished");
            results
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(mut results) => all.append(&mut results),
            // A panicking worker loses its partial results but must not take
            // down the run; the items it had pulled count as failed.
            Err(e) => tracing::error!(error = %e, "pipeline worker panicked"),
        }
    }
    all
}

/// Run one future per top-level unit, at most `concurrency_limit` in flight.
///
/// Each unit iterates its own sub-range sequentially inside its future and
/// returns the per-sub-item results; completion order between units is
/// non-deterministic and carries no meaning.
pub async fn run_scatter<U, F, Fut>(
    units: Vec<U>,
    concurrency_limit: usize,
    fetch_unit: F,
) -> Vec<FetchResult>
where
    F: Fn(U) -> Fut,
    Fut: Future<Output = Vec<FetchResult>>,
{
    stream::iter(units)
        .map(fetch_unit)
        .buffer_unordered(concurrency_limit.max(1))
        .collect::<Vec<Vec<FetchResult>>>()
        .await
        .into_iter()
        .flatten()
        .collect()
}
