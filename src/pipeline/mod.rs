//! Bounded concurrent fetch-and-aggregate pipeline.
//!
//! One pattern, instantiated by every collector module: a work source
//! enumerates a finite set of [`WorkItem`]s, a capped set of fetch units
//! performs one fallible network operation per item, and the partial results
//! are merged into a single [`AggregateTable`](crate::AggregateTable).
//!
//! Two scheduling models are supported (see [`executor`]):
//!
//! - **worker pool**: N tasks pull from a shared [`WorkQueue`] until it is
//!   closed and drained. Used when items outnumber workers and should be
//!   assigned dynamically (activity scraping);
//! - **scatter**: one future per top-level unit (e.g., per destination),
//!   capped in flight via a bounded gather. Used when each unit iterates its
//!   own sub-range sequentially (flight and hotel polling).
//!
//! Failures never cross item boundaries: a fetch unit that errors contributes
//! an empty [`FetchResult`](crate::FetchResult), gets logged once, and the run
//! continues. The only ordering guarantee is the completion barrier: every
//! item finishes before aggregation starts.

pub mod executor;
pub mod queue;

pub use executor::{Fetcher, isolate_failure, run_queue, run_scatter};
pub use queue::WorkQueue;

use crate::record::{AggregateTable, FetchResult};
use chrono::NaiveDate;
use std::fmt;

/// One unit of fetchable work.
///
/// Immutable once created; produced by the work source and consumed exactly
/// once by a fetch unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkItem {
    /// A page URL to scrape
    Url(String),
    /// A parameter tuple for one API search request
    Params(SearchWindow),
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkItem::Url(url) => write!(f, "{}", url),
            WorkItem::Params(window) => write!(f, "{}", window),
        }
    }
}

/// Parameters identifying one API search: a destination and a date window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchWindow {
    /// Destination identifier (location id, sky id, or plain name)
    pub destination: String,
    /// Window start (check-in / departure)
    pub date_in: NaiveDate,
    /// Window end (check-out / return)
    pub date_out: NaiveDate,
}

impl fmt::Display for SearchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}..{}",
            self.destination, self.date_in, self.date_out
        )
    }
}

/// Merge all partial results into one table, in arrival order.
///
/// A raw structural concatenation: row count equals the sum of the per-result
/// record counts regardless of arrival order, and aggregating a concatenation
/// equals concatenating the aggregates of any partition.
pub fn aggregate(results: impl IntoIterator<Item = FetchResult>) -> AggregateTable {
    let mut table = AggregateTable::new();
    for result in results {
        table.extend(result.into_records());
    }
    table
}
