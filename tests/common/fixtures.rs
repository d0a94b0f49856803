//! Canned payloads and configs shared by the integration tests

use serde_json::{Value, json};
use travelscout::{ActivityScrapeConfig, Config, FlightSearchConfig, HotelSearchConfig};

/// A listing page with the results container wrapped around `cards`
pub fn listing_page(cards: &str) -> String {
    format!(r#"<html><body><div id="activities-container">{cards}</div></body></html>"#)
}

/// One activity card with a tracked link
pub fn activity_card(name: &str, price: &str, href: &str) -> String {
    format!(
        r#"<div class="o-search-list__item">
             <a class="_activity-link" href="{href}">go</a>
             <h2 class="comfort-card__title">{name}</h2>
             <span class="comfort-card__price__text">{price}</span>
             <div class="comfort-card__text">See the sights</div>
           </div>"#
    )
}

/// Airport-lookup payload with one hit
pub fn airport_payload(sky_id: &str, entity_id: &str) -> Value {
    json!({"data": [{"skyId": sky_id, "entityId": entity_id}]})
}

/// Flight-search payload with one priced itinerary
pub fn itinerary_payload(destination: &str, price: f64) -> Value {
    json!({
        "data": {
            "itineraries": [{
                "price": {"raw": price},
                "legs": [
                    {
                        "destination": {"name": destination},
                        "durationInMinutes": 150,
                        "stopCount": 0,
                        "departure": "2025-07-01T08:00:00",
                        "arrival": "2025-07-01T10:30:00",
                        "carriers": {"marketing": [{"name": "TestAir"}]}
                    },
                    {
                        "destination": {"name": "Madrid"},
                        "durationInMinutes": 160,
                        "stopCount": 1,
                        "departure": "2025-07-10T18:00:00",
                        "arrival": "2025-07-10T20:40:00",
                        "carriers": {"marketing": [{"name": "TestAir"}]}
                    }
                ]
            }]
        }
    })
}

/// Location-lookup payload with one hit
pub fn location_payload(dest_id: &str) -> Value {
    json!([{"dest_id": dest_id}])
}

/// Hotel-search payload with one hotel
pub fn hotel_payload(name: &str, price: f64) -> Value {
    json!({
        "result": [{
            "hotel_name": name,
            "min_total_price": price,
            "review_score": 8.1,
            "distance_to_cc": "1.2",
            "accommodation_type_name": "Hotel",
            "city_trans": "Roma"
        }]
    })
}

/// A config small enough that a test run stays at a handful of requests
pub fn small_config(destinations: &[&str], base_url: &str) -> Config {
    Config {
        destinations: destinations.iter().map(|d| d.to_string()).collect(),
        concurrency: 3,
        flights: FlightSearchConfig {
            year: 2025,
            months: vec![2],
            trip_nights: 26,
            ..Default::default()
        },
        hotels: HotelSearchConfig {
            year: 2025,
            months: vec![2],
            stay_nights: 27,
            ..Default::default()
        },
        activities: ActivityScrapeConfig {
            base_url: base_url.to_string(),
            pages_per_listing: 1,
            year: 2025,
            months: vec![7],
            window_start_days: vec![1],
            ..Default::default()
        },
        ..Default::default()
    }
}
