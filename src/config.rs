//! Configuration types for travelscout

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration for a collection run
///
/// All fields have sensible defaults, so `Config::default()` works out of the
/// box apart from `destinations`, which the caller must fill in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Destination names searched by every collector (e.g., "roma", "paris")
    #[serde(default)]
    pub destinations: Vec<String>,

    /// Maximum concurrent in-flight fetches per pipeline run (default: 10)
    ///
    /// Bounds simultaneous fetches only; the number of work items may exceed
    /// it, excess items wait for a free slot.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request network timeout (default: 15s)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// Timeout for the best-effort consent-dialog pre-step (default: 2s)
    #[serde(default = "default_consent_timeout")]
    pub consent_timeout: Duration,

    /// Flight search parameters
    #[serde(default)]
    pub flights: FlightSearchConfig,

    /// Hotel search parameters
    #[serde(default)]
    pub hotels: HotelSearchConfig,

    /// Activity scraping parameters
    #[serde(default)]
    pub activities: ActivityScrapeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            destinations: Vec::new(),
            concurrency: default_concurrency(),
            request_timeout: default_request_timeout(),
            consent_timeout: default_consent_timeout(),
            flights: FlightSearchConfig::default(),
            hotels: HotelSearchConfig::default(),
            activities: ActivityScrapeConfig::default(),
        }
    }
}

impl Config {
    /// Validate the configuration, returning [`Error::Config`] on the first
    /// invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.destinations.is_empty() {
            return Err(Error::Config {
                message: "at least one destination is required".into(),
                key: Some("destinations".into()),
            });
        }
        if self.concurrency == 0 {
            return Err(Error::Config {
                message: "concurrency must be at least 1".into(),
                key: Some("concurrency".into()),
            });
        }
        for cfg in [
            ("flights.months", &self.flights.months),
            ("hotels.months", &self.hotels.months),
            ("activities.months", &self.activities.months),
        ] {
            if let Some(&month) = cfg.1.iter().find(|&&m| !(1..=12).contains(&m)) {
                return Err(Error::Config {
                    message: format!("invalid month {month}"),
                    key: Some(cfg.0.into()),
                });
            }
        }
        if self.hotels.stay_nights == 0 {
            return Err(Error::Config {
                message: "stay_nights must be at least 1".into(),
                key: Some("hotels.stay_nights".into()),
            });
        }
        Ok(())
    }
}

/// Opaque API credentials supplied by the caller
///
/// The crate attaches these as request headers and never acquires or refreshes
/// them itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token / API key
    pub api_key: String,
    /// API host the key is scoped to (sent alongside the key)
    pub api_host: String,
}

impl Credentials {
    /// Create credentials for a given API host
    pub fn new(api_key: impl Into<String>, api_host: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: api_host.into(),
        }
    }
}

/// Flight search parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlightSearchConfig {
    /// Origin city the round trips start from (default: "madrid")
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Year searched (default: 2025)
    #[serde(default = "default_year")]
    pub year: i32,

    /// Months searched (default: July and August)
    #[serde(default = "default_months")]
    pub months: Vec<u32>,

    /// Trip length in nights; departure precedes return by this many days
    /// (default: 9)
    #[serde(default = "default_flight_nights")]
    pub trip_nights: u32,

    /// Number of adult passengers (default: 2)
    #[serde(default = "default_adults")]
    pub adults: u32,

    /// Number of child passengers (default: 1)
    #[serde(default = "default_children")]
    pub children: u32,
}

impl Default for FlightSearchConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            year: default_year(),
            months: default_months(),
            trip_nights: default_flight_nights(),
            adults: default_adults(),
            children: default_children(),
        }
    }
}

/// Hotel search parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HotelSearchConfig {
    /// Year searched (default: 2025)
    #[serde(default = "default_year")]
    pub year: i32,

    /// Months searched (default: July and August)
    #[serde(default = "default_months")]
    pub months: Vec<u32>,

    /// Stay length in nights; the window slides day by day across each month
    /// (default: 10)
    #[serde(default = "default_hotel_nights")]
    pub stay_nights: u32,

    /// Number of adults per room (default: 2)
    #[serde(default = "default_adults")]
    pub adults: u32,

    /// Number of children; ages are sampled uniformly from 1..=10 per run
    /// (default: 1)
    #[serde(default = "default_children")]
    pub children: u32,

    /// Number of rooms (default: 1)
    #[serde(default = "default_rooms")]
    pub rooms: u32,

    /// Hotel star classes included in the search (default: 3, 4 and 5 stars)
    #[serde(default = "default_star_classes")]
    pub star_classes: Vec<u32>,
}

impl Default for HotelSearchConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            months: default_months(),
            stay_nights: default_hotel_nights(),
            adults: default_adults(),
            children: default_children(),
            rooms: default_rooms(),
            star_classes: default_star_classes(),
        }
    }
}

/// Activity scraping parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityScrapeConfig {
    /// Listing site base URL, destination name appended as a path segment
    #[serde(default = "default_activity_base_url")]
    pub base_url: String,

    /// Listing pages fetched per destination and date window (default: 2)
    #[serde(default = "default_pages_per_listing")]
    pub pages_per_listing: u32,

    /// Year searched (default: 2025)
    #[serde(default = "default_year")]
    pub year: i32,

    /// Months searched (default: July and August)
    #[serde(default = "default_months")]
    pub months: Vec<u32>,

    /// Days of month a window starts on (default: 1st and 15th)
    #[serde(default = "default_window_starts")]
    pub window_start_days: Vec<u32>,

    /// Window length in nights (default: 14)
    #[serde(default = "default_activity_nights")]
    pub window_nights: u32,
}

impl Default for ActivityScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_activity_base_url(),
            pages_per_listing: default_pages_per_listing(),
            year: default_year(),
            months: default_months(),
            window_start_days: default_window_starts(),
            window_nights: default_activity_nights(),
        }
    }
}

fn default_concurrency() -> usize {
    10
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_consent_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_origin() -> String {
    "madrid".to_string()
}

fn default_year() -> i32 {
    2025
}

fn default_months() -> Vec<u32> {
    vec![7, 8]
}

fn default_flight_nights() -> u32 {
    9
}

fn default_hotel_nights() -> u32 {
    10
}

fn default_adults() -> u32 {
    2
}

fn default_children() -> u32 {
    1
}

fn default_rooms() -> u32 {
    1
}

fn default_star_classes() -> Vec<u32> {
    vec![3, 4, 5]
}

fn default_activity_base_url() -> String {
    "https://www.civitatis.com/es".to_string()
}

fn default_pages_per_listing() -> u32 {
    2
}

fn default_window_starts() -> Vec<u32> {
    vec![1, 15]
}

fn default_activity_nights() -> u32 {
    14
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            destinations: vec!["roma".into(), "paris".into()],
            ..Default::default()
        }
    }

    #[test]
    fn default_config_has_documented_values() {
        let config = Config::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.flights.trip_nights, 9);
        assert_eq!(config.hotels.stay_nights, 10);
        assert_eq!(config.activities.pages_per_listing, 2);
        assert_eq!(config.hotels.star_classes, vec![3, 4, 5]);
    }

    #[test]
    fn validate_accepts_defaults_with_destinations() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_destinations() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let config = Config {
            concurrency: 0,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_month() {
        let mut config = valid_config();
        config.hotels.months = vec![7, 13];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid month 13"));
    }

    #[test]
    fn validate_rejects_zero_stay_nights() {
        let mut config = valid_config();
        config.hotels.stay_nights = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = valid_config();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.destinations, config.destinations);
        assert_eq!(back.concurrency, config.concurrency);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"destinations":["roma"]}"#).unwrap();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.flights.origin, "madrid");
        assert_eq!(config.activities.window_start_days, vec![1, 15]);
    }
}
