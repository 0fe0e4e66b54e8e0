//! Nominatim search response model

use crate::domain::GeoPoint;
use serde::Deserialize;
use serde_json::Value;

/// One candidate from `GET /search?format=json`
///
/// Nominatim sends `lat`/`lon` as strings; numeric values are accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: Value,
    pub lon: Value,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub importance: Option<f64>,
}

impl NominatimPlace {
    /// Extracts the point, or `None` when either axis is not a finite number
    pub fn point(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(axis(&self.lat)?, axis(&self.lon)?))
    }
}

fn axis(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Number(number) => number.as_f64()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}
