//! Flight and airport records.

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier shared by a [`FlightPath`] and its segments.
pub type PathId = u64;

/// One recorded flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPath {
    /// Unique flight identifier.
    pub id: PathId,

    /// Year of the flight, stringified.
    ///
    /// Payloads carry this as either a number or a string; both are stored in
    /// their string form so filters compare by string equality.
    #[serde(default, deserialize_with = "stringified")]
    pub year: Option<String>,

    /// Aircraft registration (tail number), e.g. `N12345`.
    #[serde(default, alias = "registration")]
    pub aircraft_registration: Option<String>,

    /// Aircraft type designator, e.g. `C172`.
    #[serde(default, alias = "type")]
    pub aircraft_type: Option<String>,

    /// Departure airport code.
    #[serde(default)]
    pub start_airport: Option<String>,

    /// Arrival airport code.
    #[serde(default)]
    pub end_airport: Option<String>,
}

impl FlightPath {
    /// Create a flight with only an id set.
    pub fn new(id: PathId) -> Self {
        Self {
            id,
            year: None,
            aircraft_registration: None,
            aircraft_type: None,
            start_airport: None,
            end_airport: None,
        }
    }

    /// Set the year.
    pub fn with_year(mut self, year: impl ToString) -> Self {
        self.year = Some(year.to_string());
        self
    }

    /// Set the aircraft registration and type.
    pub fn with_aircraft(
        mut self,
        registration: impl Into<String>,
        aircraft_type: Option<&str>,
    ) -> Self {
        self.aircraft_registration = Some(registration.into());
        self.aircraft_type = aircraft_type.map(str::to_string);
        self
    }

    /// Set the departure and arrival airports.
    pub fn with_airports(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_airport = Some(start.into());
        self.end_airport = Some(end.into());
        self
    }
}

/// A static airport reference used to label flight endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// Airport code or name.
    pub name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Accept a JSON string or number and keep its string form.
fn stringified<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_from_number() {
        let path: FlightPath = serde_json::from_str(r#"{"id": 1, "year": 2025}"#).unwrap();
        assert_eq!(path.year.as_deref(), Some("2025"));
    }

    #[test]
    fn test_year_from_string() {
        let path: FlightPath = serde_json::from_str(r#"{"id": 1, "year": "2024"}"#).unwrap();
        assert_eq!(path.year.as_deref(), Some("2024"));
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let path: FlightPath = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(path, FlightPath::new(7));
    }

    #[test]
    fn test_registration_alias() {
        let path: FlightPath =
            serde_json::from_str(r#"{"id": 1, "registration": "N12345", "type": "C172"}"#)
                .unwrap();
        assert_eq!(path.aircraft_registration.as_deref(), Some("N12345"));
        assert_eq!(path.aircraft_type.as_deref(), Some("C172"));
    }
}
