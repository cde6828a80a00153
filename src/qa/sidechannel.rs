//! Trivia side-channel: routing predicates and fixed-endpoint lookups that
//! answer an entire question batch without touching retrieval.
//!
//! Kept out of the RAG path on purpose; the orchestrator selects these flows
//! with a predicate over the question text and never mixes them with
//! document QA.

use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::types::QaError;

/// Questions containing this phrase route the batch to the flight lookup.
pub const FLIGHT_TRIGGER: &str = "flight number";
/// Questions containing this phrase route the batch to the token lookup.
pub const TOKEN_TRIGGER: &str = "secret token";

/// Case-insensitive substring routing predicate.
pub fn contains_trigger(questions: &[String], trigger: &str) -> bool {
    questions
        .iter()
        .any(|question| question.to_lowercase().contains(trigger))
}

#[derive(Debug, Deserialize)]
struct CityPayload {
    #[serde(default)]
    data: CityData,
}

#[derive(Debug, Default, Deserialize)]
struct CityData {
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlightPayload {
    #[serde(default)]
    data: FlightData,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct FlightData {
    #[serde(rename = "flightNumber")]
    flight_number: Option<String>,
}

/// Outcome of the favourite-city flight flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlightLookup {
    pub flight_number: String,
    /// First word of the endpoint's message, when one was given.
    pub destination: Option<String>,
}

/// Resolves the favourite city, maps it to its flight endpoint, and fetches
/// the flight number. Every failure mode is a [`QaError::SideChannel`] so
/// the orchestrator can convert the whole batch to one explanatory answer.
pub async fn run_flight_lookup(
    client: &Client,
    city_url: &str,
    flights_base: &str,
) -> Result<FlightLookup, QaError> {
    let payload: CityPayload = get_json(client, city_url).await?;
    let city = payload
        .data
        .city
        .filter(|city| !city.is_empty())
        .ok_or_else(|| QaError::SideChannel("favourite-city endpoint returned no city".into()))?;

    let endpoint = endpoint_for_city(&city)
        .ok_or_else(|| QaError::SideChannel(format!("unknown city '{city}'")))?;

    let payload: FlightPayload = get_json(client, &format!("{flights_base}/{endpoint}")).await?;
    let flight_number = payload
        .data
        .flight_number
        .filter(|flight| !flight.is_empty())
        .ok_or_else(|| QaError::SideChannel(format!("no flight number from {endpoint}")))?;
    let destination = payload
        .message
        .split_whitespace()
        .next()
        .map(str::to_string);

    Ok(FlightLookup {
        flight_number,
        destination,
    })
}

/// Fetches the locator page and reads the embedded `div#token` marker.
pub async fn fetch_secret_token(client: &Client, locator: &str) -> Result<String, QaError> {
    let response = client
        .get(locator)
        .send()
        .await
        .map_err(|err| QaError::SideChannel(err.to_string()))?
        .error_for_status()
        .map_err(|err| QaError::SideChannel(err.to_string()))?;
    let body = response
        .text()
        .await
        .map_err(|err| QaError::SideChannel(err.to_string()))?;

    let document = Html::parse_document(&body);
    let selector = Selector::parse("div#token")
        .map_err(|err| QaError::SideChannel(format!("token selector: {err}")))?;
    document
        .select(&selector)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| QaError::SideChannel("token marker not found in page".into()))
}

async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, QaError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| QaError::SideChannel(err.to_string()))?
        .error_for_status()
        .map_err(|err| QaError::SideChannel(err.to_string()))?;
    response
        .json()
        .await
        .map_err(|err| QaError::SideChannel(err.to_string()))
}

/// Flight endpoint for a known city. Cities whose landmark carries a
/// dedicated endpoint resolve to it; every other known city uses the fifth
/// endpoint; unknown cities are an error so the mapping gets extended
/// deliberately rather than guessed.
fn endpoint_for_city(city: &str) -> Option<&'static str> {
    match city {
        // Gateway of India
        "Delhi" => Some("getFirstCityFlightNumber"),
        // Taj Mahal
        "Hyderabad" | "Paris" => Some("getSecondCityFlightNumber"),
        // Eiffel Tower
        "New York" => Some("getThirdCityFlightNumber"),
        // Big Ben
        "Tokyo" | "Istanbul" => Some("getFourthCityFlightNumber"),
        city if KNOWN_CITIES.contains(&city) => Some("getFifthCityFlightNumber"),
        _ => None,
    }
}

/// Cities the lookup recognizes that carry no landmark-specific endpoint.
const KNOWN_CITIES: [&str; 32] = [
    "Mumbai",
    "Chennai",
    "Ahmedabad",
    "Mysuru",
    "Kochi",
    "Pune",
    "Nagpur",
    "Chandigarh",
    "Kerala",
    "Bhopal",
    "Varanasi",
    "Jaisalmer",
    "London",
    "Beijing",
    "Bangkok",
    "Toronto",
    "Dubai",
    "Amsterdam",
    "Cairo",
    "San Francisco",
    "Berlin",
    "Barcelona",
    "Moscow",
    "Seoul",
    "Cape Town",
    "Riyadh",
    "Singapore",
    "Jakarta",
    "Vienna",
    "Kathmandu",
    "Los Angeles",
    "Dubai Airport",
];

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;

    #[test]
    fn trigger_matching_is_case_insensitive_substring() {
        let questions = vec![
            "What is covered?".to_string(),
            "Please give me the SECRET token now".to_string(),
        ];
        assert!(contains_trigger(&questions, TOKEN_TRIGGER));
        assert!(!contains_trigger(&questions, FLIGHT_TRIGGER));
        assert!(!contains_trigger(&[], TOKEN_TRIGGER));
    }

    #[test]
    fn landmark_cities_resolve_to_their_dedicated_endpoints() {
        assert_eq!(endpoint_for_city("Delhi"), Some("getFirstCityFlightNumber"));
        assert_eq!(endpoint_for_city("Paris"), Some("getSecondCityFlightNumber"));
        assert_eq!(endpoint_for_city("Hyderabad"), Some("getSecondCityFlightNumber"));
        assert_eq!(endpoint_for_city("New York"), Some("getThirdCityFlightNumber"));
        assert_eq!(endpoint_for_city("Tokyo"), Some("getFourthCityFlightNumber"));
        assert_eq!(endpoint_for_city("Istanbul"), Some("getFourthCityFlightNumber"));
        assert_eq!(endpoint_for_city("Mumbai"), Some("getFifthCityFlightNumber"));
        assert_eq!(endpoint_for_city("Dubai Airport"), Some("getFifthCityFlightNumber"));
        assert_eq!(endpoint_for_city("Atlantis"), None);
    }

    #[tokio::test]
    async fn flight_lookup_follows_city_to_flight_number() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/city");
            then.status(200).json_body(json!({"data": {"city": "Delhi"}}));
        });
        server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/flights/getFirstCityFlightNumber");
            then.status(200).json_body(json!({
                "data": {"flightNumber": "AI-202"},
                "message": "Mumbai departure confirmed"
            }));
        });

        let client = Client::new();
        let lookup = run_flight_lookup(
            &client,
            &server.url("/city"),
            &server.url("/flights"),
        )
        .await
        .unwrap();
        assert_eq!(lookup.flight_number, "AI-202");
        assert_eq!(lookup.destination.as_deref(), Some("Mumbai"));
    }

    #[tokio::test]
    async fn unknown_city_is_a_side_channel_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/city");
            then.status(200)
                .json_body(json!({"data": {"city": "Atlantis"}}));
        });

        let client = Client::new();
        let err = run_flight_lookup(&client, &server.url("/city"), &server.url("/flights"))
            .await
            .unwrap_err();
        assert!(matches!(err, QaError::SideChannel(_)));
    }

    #[tokio::test]
    async fn missing_city_field_is_a_side_channel_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/city");
            then.status(200).json_body(json!({"data": {}}));
        });

        let client = Client::new();
        let err = run_flight_lookup(&client, &server.url("/city"), &server.url("/flights"))
            .await
            .unwrap_err();
        assert!(matches!(err, QaError::SideChannel(_)));
    }

    #[tokio::test]
    async fn secret_token_is_read_from_the_marker_div() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/challenge");
            then.status(200).body(
                "<html><body><h1>Welcome</h1>\
                 <div id=\"token\">a1b2c3d4</div></body></html>",
            );
        });

        let client = Client::new();
        let token = fetch_secret_token(&client, &server.url("/challenge"))
            .await
            .unwrap();
        assert_eq!(token, "a1b2c3d4");
    }

    #[tokio::test]
    async fn page_without_marker_is_a_side_channel_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/challenge");
            then.status(200).body("<html><body>nothing here</body></html>");
        });

        let client = Client::new();
        let err = fetch_secret_token(&client, &server.url("/challenge"))
            .await
            .unwrap_err();
        assert!(matches!(err, QaError::SideChannel(_)));
    }
}
