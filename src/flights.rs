//! Round-trip flight polling against a flight-search API.
//!
//! Scatter-variant pipeline: one task per destination, capped in flight; each
//! task walks its date windows sequentially, one search request per window,
//! and parses itineraries into per-leg flat records.

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::Config;
use crate::dates::days_in_month;
use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::pipeline::{SearchWindow, WorkItem, aggregate, isolate_failure, run_scatter};
use crate::record::{AggregateTable, Field, Record};

/// API host the flight-search credentials are scoped to
pub const FLIGHT_API_HOST: &str = "sky-scrapper.p.rapidapi.com";

const DEFAULT_BASE_URL: &str = "https://sky-scrapper.p.rapidapi.com";

/// A resolved airport/city identifier pair as the search API expects it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Airport {
    /// Market-facing airport/city code
    pub sky_id: String,
    /// Internal entity id that must accompany the code
    pub entity_id: String,
}

/// Flight-search API surface: airport resolution and round-trip searches.
#[derive(Clone, Debug)]
pub struct FlightApi {
    api: ApiClient,
    base_url: String,
}

impl FlightApi {
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

    /// Resolve a city/airport name to the identifier pair searches require.
    ///
    /// Takes the first hit, as the UI would.
    pub async fn resolve_airport(&self, query: &str) -> Result<Airport> {
        let url = format!("{}/api/v1/flights/searchAirport", self.base_url);
        let payload = self
            .api
            .get_json(
                &url,
                &[("query", query.to_string()), ("locale", "es-ES".to_string())],
            )
            .await?;

        let first = payload["data"]
            .get(0)
            .ok_or_else(|| Error::schema(format!("no airport hit for {query:?}")))?;
        match (first["skyId"].as_str(), first["entityId"].as_str()) {
            (Some(sky_id), Some(entity_id)) => Ok(Airport {
                sky_id: sky_id.to_string(),
                entity_id: entity_id.to_string(),
            }),
            _ => Err(Error::schema(format!(
                "airport hit for {query:?} lacks skyId/entityId"
            ))),
        }
    }

    /// One round-trip search: origin to destination, fixed dates and
    /// passenger counts
    pub async fn search_round_trip(
        &self,
        origin: &Airport,
        destination: &Airport,
        depart: NaiveDate,
        return_date: NaiveDate,
        adults: u32,
        children: u32,
    ) -> Result<Value> {
        let url = format!("{}/api/v2/flights/searchFlights", self.base_url);
        self.api
            .get_json(
                &url,
                &[
                    ("originSkyId", origin.sky_id.clone()),
                    ("destinationSkyId", destination.sky_id.clone()),
                    ("originEntityId", origin.entity_id.clone()),
                    ("destinationEntityId", destination.entity_id.clone()),
                    ("date", depart.to_string()),
                    ("returnDate", return_date.to_string()),
                    ("adults", adults.to_string()),
                    ("childrens", children.to_string()),
                    ("sortBy", "best".to_string()),
                    ("currency", "EUR".to_string()),
                    ("market", "es-ES".to_string()),
                    ("countryCode", "ES".to_string()),
                ],
            )
            .await
    }
}

/// Parse a search payload into one record per itinerary.
///
/// A payload without the itinerary collection is a fetch failure for that
/// window; within an itinerary, individually missing values become
/// [`Field::Absent`].
pub fn parse_itineraries(payload: &Value) -> Result<Vec<Record>> {
    let itineraries = payload["data"]["itineraries"]
        .as_array()
        .ok_or_else(|| Error::schema("no itinerary collection in search payload"))?;

    Ok(itineraries.iter().map(parse_itinerary).collect())
}

fn parse_itinerary(itinerary: &Value) -> Record {
    let legs = itinerary["legs"].as_array();
    let outbound = legs.and_then(|l| l.first());
    let inbound = legs.and_then(|l| l.get(1));

    let mut record = Record::new()
        .with(
            "destination",
            Field::from_opt_text(
                outbound
                    .and_then(|leg| leg["destination"]["name"].as_str())
                    .map(str::to_string),
            ),
        )
        .with(
            "price",
            itinerary["price"]["raw"]
                .as_f64()
                .map(Field::Float)
                .unwrap_or(Field::Absent),
        );

    set_leg_fields(&mut record, outbound, "_go");
    set_leg_fields(&mut record, inbound, "_back");
    record
}

fn set_leg_fields(record: &mut Record, leg: Option<&Value>, suffix: &str) {
    let get = |key: &str| leg.map(|l| l[key].clone()).unwrap_or(Value::Null);

    record.set(
        format!("carrier{suffix}"),
        Field::from_opt_text(
            leg.and_then(|l| l["carriers"]["marketing"][0]["name"].as_str())
                .map(str::to_string),
        ),
    );
    record.set(
        format!("duration{suffix}"),
        get("durationInMinutes")
            .as_i64()
            .map(Field::Int)
            .unwrap_or(Field::Absent),
    );
    record.set(
        format!("departure{suffix}"),
        Field::from_opt_text(get("departure").as_str().map(str::to_string)),
    );
    record.set(
        format!("arrival{suffix}"),
        Field::from_opt_text(get("arrival").as_str().map(str::to_string)),
    );
    record.set(
        format!("stops{suffix}"),
        get("stopCount")
            .as_i64()
            .map(Field::Int)
            .unwrap_or(Field::Absent),
    );
}

/// Round-trip date windows for one month: returns from `trip_nights + 1`
/// through month end, departure `trip_nights` days earlier
fn month_windows(year: i32, month: u32, trip_nights: u32) -> Vec<(NaiveDate, NaiveDate)> {
    let mut windows = Vec::new();
    for day in (trip_nights + 1)..=days_in_month(year, month) {
        let depart = NaiveDate::from_ymd_opt(year, month, day - trip_nights);
        let back = NaiveDate::from_ymd_opt(year, month, day);
        if let (Some(depart), Some(back)) = (depart, back) {
            windows.push((depart, back));
        }
    }
    windows
}

/// Search round trips from the configured origin to every destination.
///
/// Origin resolution failures abort the run; a destination that fails to
/// resolve is logged and skipped; per-window search failures are isolated and
/// contribute zero records.
pub async fn search_flights(api: &FlightApi, config: &Config) -> Result<AggregateTable> {
    let flights = &config.flights;
    let origin = api.resolve_airport(&flights.origin).await?;

    let mut units = Vec::new();
    for name in &config.destinations {
        match api.resolve_airport(name).await {
            Ok(airport) => units.push((name.clone(), airport)),
            Err(e) => {
                tracing::warn!(destination = %name, error = %e, "skipping unresolvable destination")
            }
        }
    }

    tracing::info!(
        destinations = units.len(),
        months = flights.months.len(),
        "searching round-trip flights"
    );

    let results = run_scatter(units, config.concurrency, |(name, airport)| {
        let api = api.clone();
        let origin = origin.clone();
        let months = flights.months.clone();
        let (year, nights) = (flights.year, flights.trip_nights);
        let (adults, children) = (flights.adults, flights.children);

        async move {
            let mut results = Vec::new();
            for month in months {
                for (depart, back) in month_windows(year, month, nights) {
                    let label = WorkItem::Params(SearchWindow {
                        destination: name.clone(),
                        date_in: depart,
                        date_out: back,
                    });
                    let outcome = async {
                        let payload = api
                            .search_round_trip(&origin, &airport, depart, back, adults, children)
                            .await?;
                        parse_itineraries(&payload)
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

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn leg_json(dest: &str, carrier: &str) -> Value {
        serde_json::json!({
            "destination": {"name": dest},
            "durationInMinutes": 150,
            "departure": "2025-07-01T08:00:00",
            "arrival": "2025-07-01T10:30:00",
            "stopCount": 0,
            "carriers": {"marketing": [{"name": carrier}]}
        })
    }

    fn search_payload() -> Value {
        serde_json::json!({
            "data": {
                "itineraries": [{
                    "price": {"raw": 199.5},
                    "legs": [leg_json("Roma", "AirOne"), leg_json("Madrid", "AirTwo")]
                }]
            }
        })
    }

    fn api_for(server: &MockServer) -> FlightApi {
        let client = ApiClient::new(
            Credentials::new("k", FLIGHT_API_HOST),
            Duration::from_secs(5),
        )
        .unwrap();
        FlightApi::with_base_url(client, server.uri())
    }

    #[test]
    fn parse_itineraries_extracts_both_legs() {
        let records = parse_itineraries(&search_payload()).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.get("destination"), Some(&Field::Text("Roma".into())));
        assert_eq!(record.get("price"), Some(&Field::Float(199.5)));
        assert_eq!(record.get("carrier_go"), Some(&Field::Text("AirOne".into())));
        assert_eq!(record.get("carrier_back"), Some(&Field::Text("AirTwo".into())));
        assert_eq!(record.get("duration_go"), Some(&Field::Int(150)));
        assert_eq!(record.get("stops_back"), Some(&Field::Int(0)));
    }

    #[test]
    fn one_way_itinerary_gets_absent_return_fields() {
        let payload = serde_json::json!({
            "data": {"itineraries": [{
                "price": {"raw": 80.0},
                "legs": [leg_json("Roma", "AirOne")]
            }]}
        });

        let record = &parse_itineraries(&payload).unwrap()[0];
        assert_eq!(record.get("carrier_go"), Some(&Field::Text("AirOne".into())));
        assert!(record.get("carrier_back").unwrap().is_absent());
        assert!(record.get("departure_back").unwrap().is_absent());
    }

    #[test]
    fn missing_itinerary_collection_is_a_schema_error() {
        let err = parse_itineraries(&serde_json::json!({"status": false})).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }

    #[test]
    fn missing_price_becomes_absent_not_zero() {
        let payload = serde_json::json!({
            "data": {"itineraries": [{"legs": [leg_json("Roma", "AirOne")]}]}
        });
        let record = &parse_itineraries(&payload).unwrap()[0];
        assert!(record.get("price").unwrap().is_absent());
    }

    #[test]
    fn month_windows_match_trip_length() {
        let windows = month_windows(2025, 7, 9);
        // Returns on the 10th..=31st
        assert_eq!(windows.len(), 22);
        assert_eq!(
            windows[0],
            (
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
            )
        );
        assert_eq!(
            windows.last().unwrap().1,
            NaiveDate::from_ymd_opt(2025, 7, 31).unwrap()
        );
    }

    #[tokio::test]
    async fn resolve_airport_takes_the_first_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/flights/searchAirport"))
            .and(query_param("query", "roma"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"skyId": "ROME", "entityId": "27539793"},
                    {"skyId": "CIA", "entityId": "95565062"}
                ]
            })))
            .mount(&server)
            .await;

        let airport = api_for(&server).resolve_airport("roma").await.unwrap();
        assert_eq!(
            airport,
            Airport {
                sky_id: "ROME".into(),
                entity_id: "27539793".into()
            }
        );
    }

    #[tokio::test]
    async fn resolve_airport_with_no_hits_is_a_schema_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        let err = api_for(&server).resolve_airport("nowhere").await.unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }

    #[tokio::test]
    async fn search_round_trip_sends_all_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/flights/searchFlights"))
            .and(query_param("originSkyId", "MAD"))
            .and(query_param("destinationSkyId", "ROME"))
            .and(query_param("date", "2025-07-01"))
            .and(query_param("returnDate", "2025-07-10"))
            .and(query_param("adults", "2"))
            .and(query_param("childrens", "1"))
            .and(query_param("currency", "EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_payload()))
            .mount(&server)
            .await;

        let origin = Airport {
            sky_id: "MAD".into(),
            entity_id: "1".into(),
        };
        let dest = Airport {
            sky_id: "ROME".into(),
            entity_id: "2".into(),
        };
        let payload = api_for(&server)
            .search_round_trip(
                &origin,
                &dest,
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
                2,
                1,
            )
            .await
            .unwrap();

        assert_eq!(parse_itineraries(&payload).unwrap().len(), 1);
    }
}
