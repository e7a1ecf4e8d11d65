use serde::{Deserialize, Serialize};
use std::fmt;
use url::{Url, form_urlencoded};

use crate::error::BuildError;

/// Default WeatherAPI.com endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1/";

const CURRENT_ENDPOINT: &str = "current.json";

/// A validated location descriptor: a place name or a `"<lat>, <lon>"` pair.
///
/// Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeatherQuery(String);

impl WeatherQuery {
    pub fn new(raw: &str) -> Result<Self, BuildError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BuildError::EmptyQuery);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for WeatherQuery {
    type Error = BuildError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A device position, as handed over by whatever location service the caller has.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl From<Coordinates> for WeatherQuery {
    fn from(c: Coordinates) -> Self {
        Self(format!("{}, {}", c.latitude, c.longitude))
    }
}

/// Builds `current.json` request URLs for a fixed endpoint and API key.
#[derive(Clone)]
pub struct QueryBuilder {
    base_url: String,
    api_key: String,
}

impl QueryBuilder {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self { base_url, api_key: api_key.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate `raw` and assemble the request URL for it.
    pub fn build_url(&self, raw: &str) -> Result<Url, BuildError> {
        let query = WeatherQuery::new(raw)?;
        self.url_for(&query)
    }

    pub fn url_for(&self, query: &WeatherQuery) -> Result<Url, BuildError> {
        let assembled = format!(
            "{}{}?key={}&q={}",
            self.base_url,
            CURRENT_ENDPOINT,
            encode_component(&self.api_key),
            encode_component(query.as_str()),
        );

        Url::parse(&assembled).map_err(BuildError::Encoding)
    }
}

// Keeps the key out of logs.
impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Percent-encode a query component. `byte_serialize` escapes a literal `+` as `%2B`,
/// so every `+` it emits stands for a space.
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(DEFAULT_BASE_URL, "TEST_KEY")
    }

    fn q_param(url: &Url) -> Option<String> {
        url.query_pairs().find(|(k, _)| k == "q").map(|(_, v)| v.into_owned())
    }

    #[test]
    fn empty_and_blank_queries_are_rejected() {
        for raw in ["", "   ", "\t\n "] {
            let err = builder().build_url(raw).unwrap_err();
            assert!(matches!(err, BuildError::EmptyQuery), "{raw:?} gave {err:?}");
        }
    }

    #[test]
    fn builds_current_endpoint_with_key_and_query() {
        let url = builder().build_url("London").expect("valid query");

        assert_eq!(url.as_str(), "https://api.weatherapi.com/v1/current.json?key=TEST_KEY&q=London");
    }

    #[test]
    fn query_is_trimmed() {
        let url = builder().build_url("  Paris \n").expect("valid query");
        assert_eq!(q_param(&url).as_deref(), Some("Paris"));
    }

    #[test]
    fn spaces_commas_and_non_ascii_are_escaped() {
        let url = builder().build_url("São Paulo, Brazil").expect("valid query");
        let raw_query = url.query().expect("query present");

        assert!(raw_query.ends_with("q=S%C3%A3o%20Paulo%2C%20Brazil"), "got {raw_query}");
    }

    #[test]
    fn decoded_q_matches_input() {
        let inputs = [
            "London",
            "42.983612, -81.249725",
            "New York, NY",
            "Zürich",
            "東京",
            "a+b&c=d#e%20f?",
        ];

        for input in inputs {
            let url = builder().build_url(input).expect("valid query");
            assert_eq!(q_param(&url).as_deref(), Some(input));
            assert_eq!(url.query_pairs().count(), 2, "extra params leaked for {input:?}");
        }
    }

    #[test]
    fn base_without_trailing_slash_is_normalized() {
        let b = QueryBuilder::new("http://localhost:8080/v1", "K");
        assert_eq!(b.base_url(), "http://localhost:8080/v1/");

        let url = b.build_url("Oslo").expect("valid query");
        assert_eq!(url.path(), "/v1/current.json");
    }

    #[test]
    fn malformed_base_is_an_encoding_error() {
        let b = QueryBuilder::new("not a url", "K");
        let err = b.build_url("Oslo").unwrap_err();

        assert!(matches!(err, BuildError::Encoding(_)));
    }

    #[test]
    fn coordinates_format_as_lat_lon_pair() {
        let query = WeatherQuery::from(Coordinates::new(42.983612, -81.249725));
        assert_eq!(query.as_str(), "42.983612, -81.249725");
    }

    #[test]
    fn debug_output_redacts_key() {
        let out = format!("{:?}", builder());
        assert!(!out.contains("TEST_KEY"));
    }
}
