//! Activity scraping: listing pages rendered by a browser, parsed into
//! name/price/link/description records.
//!
//! Queue-variant pipeline: the work source enumerates destination × date
//! window × page URLs onto a shared [`WorkQueue`], and a fixed pool of
//! workers pulls them dynamically; items far outnumber workers.

use chrono::{Days, NaiveDate};
use std::sync::Arc;
use url::Url;

use crate::browser::{PageBrowser, dismiss_consent_best_effort};
use crate::config::{ActivityScrapeConfig, Config};
use crate::error::{Error, Result};
use crate::markup;
use crate::pipeline::{Fetcher, WorkItem, WorkQueue, aggregate, run_queue};
use crate::record::{AggregateTable, Field, Record};
use async_trait::async_trait;
use std::time::Duration;

/// Container element holding the search results
const RESULTS_CONTAINER_ID: &str = "activities-container";
/// One listing card per activity
const CARD_CLASS: &str = "o-search-list__item";
/// Activity title inside a card
const TITLE_CLASS: &str = "comfort-card__title";
/// Price text inside a card
const PRICE_CLASS: &str = "comfort-card__price__text";
/// Description block inside a card
const DESCRIPTION_CLASS: &str = "comfort-card__text";
/// Tracked link anchor; sponsored cards sometimes lack it
const LINK_CLASS: &str = "_activity-link";

/// Enumerate the listing-page URLs for one run: destinations × date windows ×
/// pages.
///
/// Each call produces a fresh enumeration; items are immutable once built.
/// Date windows that do not exist in the calendar are skipped.
pub fn listing_urls(config: &ActivityScrapeConfig, destinations: &[String]) -> Vec<WorkItem> {
    let mut items = Vec::new();

    for &month in &config.months {
        for &start_day in &config.window_start_days {
            let Some(date_in) = NaiveDate::from_ymd_opt(config.year, month, start_day) else {
                continue;
            };
            let Some(date_out) = date_in.checked_add_days(Days::new(config.window_nights as u64))
            else {
                continue;
            };

            for destination in destinations {
                for page in 1..=config.pages_per_listing {
                    let url = Url::parse_with_params(
                        &format!("{}/{}/", config.base_url.trim_end_matches('/'), destination),
                        &[
                            ("fromDate", date_in.to_string()),
                            ("toDate", date_out.to_string()),
                            ("page", page.to_string()),
                        ],
                    );
                    match url {
                        Ok(url) => items.push(WorkItem::Url(url.into())),
                        Err(e) => {
                            tracing::warn!(destination = %destination, error = %e, "skipping unbuildable listing URL")
                        }
                    }
                }
            }
        }
    }
    items
}

/// Fetch unit for listing pages: navigate, best-effort consent dismissal,
/// read rendered HTML, parse cards.
pub struct ActivityScraper {
    browser: Arc<dyn PageBrowser>,
    consent_timeout: Duration,
    /// Origin prepended to relative card links
    link_origin: String,
}

impl ActivityScraper {
    /// Create a scraper over the given browser capability.
    ///
    /// Relative activity links are absolutized against the origin of
    /// `config.base_url`.
    pub fn new(
        browser: Arc<dyn PageBrowser>,
        config: &ActivityScrapeConfig,
        consent_timeout: Duration,
    ) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid activities base URL: {e}"),
            key: Some("activities.base_url".into()),
        })?;
        Ok(Self {
            browser,
            consent_timeout,
            link_origin: base.origin().ascii_serialization(),
        })
    }
}

#[async_trait]
impl Fetcher for ActivityScraper {
    async fn fetch(&self, item: &WorkItem) -> Result<Vec<Record>> {
        let WorkItem::Url(url) = item else {
            return Err(Error::schema("activity scraper expects URL work items"));
        };

        self.browser.navigate(url).await?;
        dismiss_consent_best_effort(self.browser.as_ref(), self.consent_timeout).await;
        let html = self.browser.rendered_html().await?;

        parse_listing(&html, &self.link_origin)
    }
}

/// Parse one rendered listing page into activity records.
///
/// A page without the results container is a fetch failure for that item (the
/// record boundary cannot be located). Within a card, each missing field is
/// recorded as [`Field::Absent`] while the rest of the card is kept.
pub fn parse_listing(html: &str, link_origin: &str) -> Result<Vec<Record>> {
    let container = markup::element_by_id(html, "div", RESULTS_CONTAINER_ID)
        .ok_or_else(|| Error::schema(format!("no #{RESULTS_CONTAINER_ID} in listing page")))?;

    let records = markup::elements_by_class(container, "div", CARD_CLASS)
        .into_iter()
        .map(|card| parse_card(card, link_origin))
        .collect();
    Ok(records)
}

fn parse_card(card: &str, link_origin: &str) -> Record {
    let name = markup::first_by_class(card, "h2", TITLE_CLASS).map(markup::inner_text);
    let price = markup::first_by_class(card, "span", PRICE_CLASS).map(markup::inner_text);
    let description = markup::first_by_class(card, "div", DESCRIPTION_CLASS).map(markup::inner_text);

    // Sponsored cards use a different anchor markup; keep the card, drop the link
    let link = markup::first_attr(card, "a", LINK_CLASS, "href")
        .map(|href| format!("{link_origin}{href}"));
    if link.is_none() {
        tracing::debug!("listing card without tracked link anchor");
    }

    Record::new()
        .with("name", Field::from_opt_text(name))
        .with("price", Field::from_opt_text(price))
        .with("link", Field::from_opt_text(link))
        .with("description", Field::from_opt_text(description))
}

/// Scrape activities for every configured destination into one table.
///
/// Runs the queue-variant pipeline with `config.concurrency` workers; per-page
/// failures are logged and contribute zero records.
pub async fn scrape_activities(browser: Arc<dyn PageBrowser>, config: &Config) -> Result<AggregateTable> {
    let scraper = ActivityScraper::new(browser, &config.activities, config.consent_timeout)?;

    let queue = Arc::new(WorkQueue::new());
    let items = listing_urls(&config.activities, &config.destinations);
    let total = items.len();
    for item in items {
        queue.push(item);
    }
    queue.close();

    tracing::info!(pages = total, workers = config.concurrency, "scraping activity listings");
    let results = run_queue(queue, Arc::new(scraper) as Arc<dyn Fetcher>, config.concurrency).await;
    Ok(aggregate(results))
}
