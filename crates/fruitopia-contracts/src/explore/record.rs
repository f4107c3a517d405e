use serde::Serialize;
use serde_json::Value;

use super::nutrition::NutritionRecord;

pub const MAP_ZOOM: u8 = 8;

/// A resolved detail record. The payload stays untyped; accessors pull the
/// pieces the explore view needs and tolerate anything missing.
#[derive(Debug, Clone, PartialEq)]
pub struct FruitRecord {
    pub key: String,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPin {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
    pub popup: String,
}

impl FruitRecord {
    pub fn new(key: impl Into<String>, payload: Value) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }

    pub fn display_name(&self) -> &str {
        self.payload
            .get("fruitName")
            .and_then(Value::as_str)
            .unwrap_or(&self.key)
    }

    /// `appearance.images`, blanks removed.
    pub fn embedded_images(&self) -> Vec<String> {
        self.payload
            .pointer("/appearance/images")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|url| !url.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn nutrition(&self) -> NutritionRecord {
        NutritionRecord::from_record(&self.payload)
    }

    /// First `GISCoordinates` entry that parses as `"lat, lng"`; `None`
    /// disables the map for this record.
    pub fn map_pin(&self) -> Option<MapPin> {
        let coordinates = self
            .payload
            .pointer("/geolocationAndMapping/GISCoordinates")
            .and_then(Value::as_array)?;
        let (lat, lng) = coordinates
            .iter()
            .filter_map(Value::as_str)
            .find_map(parse_coordinate)?;
        let origin = self
            .payload
            .get("origin")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Some(MapPin {
            lat,
            lng,
            zoom: MAP_ZOOM,
            popup: format!("<b>{}</b><br>Origin: {origin}", self.display_name()),
        })
    }

    pub fn pairings(&self) -> Vec<String> {
        list_or_csv(self.payload.pointer("/culinaryInformation/pairings"))
    }

    pub fn propagation_methods(&self) -> Vec<String> {
        list_or_csv(self.payload.pointer("/cultivation/propagationMethods"))
    }
}

pub fn parse_coordinate(raw: &str) -> Option<(f64, f64)> {
    let mut parts = raw.split(',').map(str::trim);
    let lat = parts.next()?.parse::<f64>().ok()?;
    let lng = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() || !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    Some((lat, lng))
}

fn list_or_csv(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
