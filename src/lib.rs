use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current version of the `locations.json` layout.
pub const DOCUMENT_VERSION: u32 = 1;

/// The generated `locations.json`: the only contract between the normalizer
/// and the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsDocument {
    pub version: u32,
    pub generated_at: String,
    pub locations: Vec<LocationRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRecord {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    // kept verbatim from meta.json, no bounds checking
    #[serde(skip_serializing_if = "Value::is_null")]
    pub lat: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub lng: Value,
    pub images: Vec<ImageRef>,
}

impl LocationRecord {
    /// Numeric `(lat, lng)` if both coordinates are numbers or numeric strings.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((coordinate(&self.lat)?, coordinate(&self.lng)?))
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub src: String,
    pub thumb: String,
    pub alt: String,
}

/// Contents of a location folder's `meta.json`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationMeta {
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub lat: Value,
    #[serde(default)]
    pub lng: Value,
}

pub mod collation;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod presenter;
pub mod scanner;
pub mod server;
pub mod watch;

pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use generator::{generate, GenerationReport};
pub use scanner::{AssetScanner, ScanOutcome, SkipReason, SkippedFolder};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coordinates_accept_numbers_and_numeric_strings() {
        let mut record = LocationRecord {
            lat: json!(45.75),
            lng: json!("21.23"),
            ..Default::default()
        };
        assert_eq!(record.coordinates(), Some((45.75, 21.23)));

        record.lng = Value::Null;
        assert_eq!(record.coordinates(), None);

        record.lng = json!("east");
        assert_eq!(record.coordinates(), None);
    }

    #[test]
    fn missing_coordinates_are_omitted_from_output() {
        let record = LocationRecord {
            id: "cluj".into(),
            title: "Cluj".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("lat").is_none());
        assert!(json.get("lng").is_none());
        assert_eq!(json["description"], "");
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let doc = LocationsDocument {
            version: DOCUMENT_VERSION,
            generated_at: "2026-01-01T00:00:00.000Z".into(),
            locations: Vec::new(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["generatedAt"], "2026-01-01T00:00:00.000Z");
        assert_eq!(json["version"], 1);
    }
}
