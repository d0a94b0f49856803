//! # travelscout
//!
//! Backend library for collecting travel-planning data concurrently.
//!
//! ## Design Philosophy
//!
//! travelscout is designed to be:
//! - **Bounded** - Every gather runs under an explicit concurrency cap
//! - **Failure-isolating** - One bad page or request costs its own records only
//! - **Typed all the way down** - Missing values are [`Field::Absent`], never sentinels
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use travelscout::{ApiClient, Config, Credentials, FlightApi, FLIGHT_API_HOST};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         destinations: vec!["roma".to_string(), "atenas".to_string()],
//!         ..Default::default()
//!     };
//!     config.validate()?;
//!
//!     let client = ApiClient::new(
//!         Credentials::new("my-api-key", FLIGHT_API_HOST),
//!         config.request_timeout,
//!     )?;
//!     let api = FlightApi::new(client);
//!
//!     let mut flights = travelscout::search_flights(&api, &config).await?;
//!     travelscout::clean_prices(&mut flights, "price");
//!     println!("{} flight offers", flights.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Activity-listing scraping via a rendered-page browser
pub mod activities;
/// Browser automation seam for scraping
pub mod browser;
/// Text-to-typed-field normalization
pub mod clean;
/// Configuration types
pub mod config;
/// Calendar helpers shared by the collectors
pub mod dates;
/// Error types
pub mod error;
/// Round-trip flight search
pub mod flights;
/// Hotel-availability search
pub mod hotels;
/// Shared keyed JSON API client
pub mod http;
/// Minimal HTML querying for rendered listing pages
pub mod markup;
/// Bounded fetch-and-aggregate machinery
pub mod pipeline;
/// Records, fields, and the aggregate table
pub mod record;

// Re-export commonly used types
pub use activities::{ActivityScraper, scrape_activities};
pub use browser::PageBrowser;
pub use clean::{clean_prices, parse_locale_price};
pub use config::{
    ActivityScrapeConfig, Config, Credentials, FlightSearchConfig, HotelSearchConfig,
};
pub use error::{Error, Result};
pub use flights::{FLIGHT_API_HOST, FlightApi, search_flights};
pub use hotels::{HOTEL_API_HOST, HotelApi, search_hotels};
pub use http::ApiClient;
pub use pipeline::{
    Fetcher, SearchWindow, WorkItem, WorkQueue, aggregate, isolate_failure, run_queue,
    run_scatter,
};
pub use record::{AggregateTable, FetchResult, Field, Record};
