use serde::{Deserialize, Serialize};
use std::fmt;

use crate::condition::{IconId, classify};
use crate::error::DecodeError;

/// `current.json` response body. Only the fields we display are required;
/// everything else the provider sends is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherResponse {
    pub location: Location,
    pub current: Current,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Current {
    #[serde(rename = "temp_c")]
    pub temperature_celsius: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub text: String,
    pub code: i64,
}

impl WeatherResponse {
    pub fn from_body(body: &str) -> Result<Self, DecodeError> {
        if body.trim().is_empty() {
            return Err(DecodeError::EmptyBody);
        }

        Ok(serde_json::from_str(body)?)
    }

    pub fn into_report(self) -> WeatherReport {
        WeatherReport {
            location_name: self.location.name,
            temperature_celsius: self.current.temperature_celsius,
            icon_id: classify(self.current.condition.code),
            condition_text: self.current.condition.text,
        }
    }
}

/// What a caller displays after a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location_name: String,
    pub temperature_celsius: f64,
    pub icon_id: IconId,
    pub condition_text: String,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}°C, {} [{}]",
            self.location_name, self.temperature_celsius, self.condition_text, self.icon_id
        )
    }
}

/// Error payload WeatherAPI.com sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: &str = r#"{"location":{"name":"London"},"current":{"temp_c":15.5,"condition":{"text":"Partly cloudy","code":1003}}}"#;

    #[test]
    fn decodes_minimal_body_into_report() {
        let report = WeatherResponse::from_body(LONDON).expect("valid body").into_report();

        assert_eq!(report.location_name, "London");
        assert_eq!(report.temperature_celsius, 15.5);
        assert_eq!(report.icon_id, IconId::PartlyCloudy);
        assert_eq!(report.condition_text, "Partly cloudy");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = r#"{
            "location": {"name": "Paris", "country": "France", "localtime_epoch": 1700000000},
            "current": {
                "temp_c": 9,
                "temp_f": 48.2,
                "humidity": 81,
                "condition": {"text": "Mist", "icon": "//cdn/143.png", "code": 1030}
            }
        }"#;

        let parsed = WeatherResponse::from_body(body).expect("valid body");
        assert_eq!(parsed.current.temperature_celsius, 9.0);
        assert_eq!(parsed.into_report().icon_id, IconId::Foggy);
    }

    #[test]
    fn missing_current_fails() {
        let err = WeatherResponse::from_body(r#"{"location":{"name":"London"}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn mistyped_code_fails() {
        let body = r#"{"location":{"name":"X"},"current":{"temp_c":1.0,"condition":{"text":"t","code":"1003"}}}"#;
        assert!(matches!(WeatherResponse::from_body(body), Err(DecodeError::Json(_))));
    }

    #[test]
    fn empty_body_fails() {
        assert!(matches!(WeatherResponse::from_body(""), Err(DecodeError::EmptyBody)));
        assert!(matches!(WeatherResponse::from_body(" \n"), Err(DecodeError::EmptyBody)));
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let report = WeatherResponse::from_body(LONDON).expect("valid body").into_report();
        let json = serde_json::to_value(&report).expect("serializable");

        assert_eq!(
            json,
            serde_json::json!({
                "locationName": "London",
                "temperatureCelsius": 15.5,
                "iconId": "partlyCloudy",
                "conditionText": "Partly cloudy"
            })
        );
    }

    #[test]
    fn report_display() {
        let report = WeatherResponse::from_body(LONDON).expect("valid body").into_report();
        assert_eq!(report.to_string(), "London: 15.5°C, Partly cloudy [partlyCloudy]");
    }
}
