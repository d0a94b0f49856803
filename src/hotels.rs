//! Hotel-availability polling against a hotel-search API.
//!
//! Scatter-variant pipeline: one task per resolved location, capped in
//! flight; each task slides a fixed-length stay window day by day across the
//! configured months, one search request per window.

use chrono::{Days, NaiveDate};
use rand::Rng;
use serde_json::Value;

use crate::config::{Config, HotelSearchConfig};
use crate::dates::{days_in_month, weekday_name_es};
use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::pipeline::{SearchWindow, WorkItem, aggregate, isolate_failure, run_scatter};
use crate::record::{AggregateTable, Field, Record};

/// API host the hotel-search credentials are scoped to
pub const HOTEL_API_HOST: &str = "booking-com.p.rapidapi.com";

const DEFAULT_BASE_URL: &str = "https://booking-com.p.rapidapi.com";

/// Hotel-search API surface: location resolution and availability searches.
#[derive(Clone, Debug)]
pub struct HotelApi {
    api: ApiClient,
    base_url: String,
}

impl HotelApi {
    /// Client against the production API host
    pub fn new(api: ApiClient) -> Self {
        Self::with_base_url(api, DEFAULT_BASE_URL)
    }

    /// Client against an alternative base URL (tests, proxies)
    pub fn with_base_url(api: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            api,
            base_url: base_url.into(),
        }
    }

    /// Resolve destination names to location ids, first hit per name.
    ///
    /// A name that fails to resolve (network error or no hit) is logged and
    /// skipped so the remaining destinations still get searched.
    pub async fn resolve_locations(&self, names: &[String]) -> Vec<String> {
        let url = format!("{}/v1/hotels/locations", self.base_url);
        let mut ids = Vec::new();

        for name in names {
            let payload = self
                .api
                .get_json(
                    &url,
                    &[("locale", "es".to_string()), ("name", name.clone())],
                )
                .await;

            match payload.as_ref().map(|p| dest_id_of_first_hit(p)) {
                Ok(Some(id)) => ids.push(id),
                Ok(None) => {
                    tracing::warn!(destination = %name, "no location hit, skipping destination")
                }
                Err(e) => {
                    tracing::warn!(destination = %name, error = %e, "location lookup failed, skipping destination")
                }
            }
        }
        ids
    }

    /// One availability search for a location and stay window
    pub async fn search_stay(
        &self,
        dest_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        config: &HotelSearchConfig,
        children_ages: &str,
    ) -> Result<Value> {
        let url = format!("{}/v1/hotels/search", self.base_url);
        let star_filter = config
            .star_classes
            .iter()
            .map(|c| format!("class::{c}"))
            .collect::<Vec<_>>()
            .join(",");

        let mut query = vec![
            ("dest_id", dest_id.to_string()),
            ("dest_type", "city".to_string()),
            ("checkin_date", check_in.to_string()),
            ("checkout_date", check_out.to_string()),
            ("adults_number", config.adults.to_string()),
            ("room_number", config.rooms.to_string()),
            ("page_number", "1".to_string()),
            ("include_adjacency", "true".to_string()),
            ("units", "metric".to_string()),
            ("categories_filter_ids", star_filter),
            ("filter_by_currency", "EUR".to_string()),
            ("order_by", "popularity".to_string()),
            ("locale", "en-gb".to_string()),
        ];
        if config.children > 0 {
            query.push(("children_number", config.children.to_string()));
            query.push(("children_ages", children_ages.to_string()));
        }

        self.api.get_json(&url, &query).await
    }
}

fn dest_id_of_first_hit(payload: &Value) -> Option<String> {
    match &payload.get(0)?["dest_id"] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a search payload into one record per hotel.
///
/// A payload without the result collection is a fetch failure for that
/// window; within a hotel entry, individually missing values become
/// [`Field::Absent`].
pub fn parse_hotels(payload: &Value) -> Result<Vec<Record>> {
    let hotels = payload["result"]
        .as_array()
        .ok_or_else(|| Error::schema("no result collection in search payload"))?;

    Ok(hotels.iter().map(parse_hotel).collect())
}

fn parse_hotel(hotel: &Value) -> Record {
    Record::new()
        .with(
            "hotel_name",
            Field::from_opt_text(hotel["hotel_name"].as_str().map(str::to_string)),
        )
        .with("price", numeric_or_absent(&hotel["min_total_price"]))
        .with("rating", numeric_or_absent(&hotel["review_score"]))
        .with(
            "distance_from_center",
            numeric_or_absent(&hotel["distance_to_cc"]),
        )
        .with(
            "acc_type",
            Field::from_opt_text(hotel["accommodation_type_name"].as_str().map(str::to_string)),
        )
        .with(
            "city",
            Field::from_opt_text(hotel["city_trans"].as_str().map(str::to_string)),
        )
}

/// Numeric field that the API sometimes serializes as a string
fn numeric_or_absent(value: &Value) -> Field {
    match value {
        Value::Number(n) => n.as_f64().map(Field::Float).unwrap_or(Field::Absent),
        Value::String(s) => s.trim().parse::<f64>().map(Field::Float).unwrap_or(Field::Absent),
        _ => Field::Absent,
    }
}

/// Stay windows for one month: check-in slides day by day while the
/// check-out still falls inside the month
fn month_windows(year: i32, month: u32, stay_nights: u32) -> Vec<(NaiveDate, NaiveDate)> {
    let mut windows = Vec::new();
    let last_day = days_in_month(year, month);
    let mut day_in = 1u32;

    loop {
        let day_out = day_in + stay_nights - 1;
        if day_out > last_day {
            break;
        }
        let check_in = NaiveDate::from_ymd_opt(year, month, day_in);
        let check_out = check_in.and_then(|d| d.checked_add_days(Days::new((stay_nights - 1) as u64)));
        if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
            windows.push((check_in, check_out));
        }
        day_in += 1;
    }
    windows
}

/// Sample one comma-separated ages string for the configured child count
fn sample_children_ages(children: u32) -> String {
    let mut rng = rand::thread_rng();
    (0..children)
        .map(|_| rng.gen_range(1..=10).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Search hotel availability for every configured destination.
///
/// Location lookups that fail are skipped; per-window search failures are
/// isolated and contribute zero records. Each record carries its window's
/// check-in/check-out dates and weekday labels.
pub async fn search_hotels(api: &HotelApi, config: &Config) -> Result<AggregateTable> {
    let hotels = &config.hotels;
    let locations = api.resolve_locations(&config.destinations).await;
    let children_ages = sample_children_ages(hotels.children);

    tracing::info!(
        locations = locations.len(),
        months = hotels.months.len(),
        stay_nights = hotels.stay_nights,
        "searching hotel availability"
    );

    let results = run_scatter(locations, config.concurrency, |dest_id| {
        let api = api.clone();
        let hotels = hotels.clone();
        let children_ages = children_ages.clone();

        async move {
            let mut results = Vec::new();
            for &month in &hotels.months {
                for (check_in, check_out) in month_windows(hotels.year, month, hotels.stay_nights)
                {
                    let label = WorkItem::Params(SearchWindow {
                        destination: dest_id.clone(),
                        date_in: check_in,
                        date_out: check_out,
                    });
                    let outcome = async {
                        let payload = api
                            .search_stay(&dest_id, check_in, check_out, &hotels, &children_ages)
                            .await?;
                        let mut records = parse_hotels(&payload)?;
                        for record in &mut records {
                            record.set("date_in", Field::Date(check_in));
                            record.set("date_out", Field::Date(check_out));
                            record.set("day_in", Field::Text(weekday_name_es(check_in).into()));
                            record.set("day_out", Field::Text(weekday_name_es(check_out).into()));
                        }
                        Ok(records)
                    }
                    .await;
                    results.push(isolate_failure(&label, outcome));
                }
            }
            results
        }
    })
    .await;

    Ok(aggregate(results))
}
