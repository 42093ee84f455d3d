//! Earthquake record model shared by the data layer and the views

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One normalized earthquake observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier, never empty
    pub id: String,

    /// Upstream timestamp, kept verbatim
    pub time: String,

    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    pub magnitude: f64,

    /// Place label, or the configured placeholder
    pub place: String,

    /// Upstream columns without a dedicated field
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Value of the given measurement
    pub fn measure(&self, key: MeasureKey) -> f64 {
        match key {
            MeasureKey::Magnitude => self.magnitude,
            MeasureKey::Depth => self.depth,
            MeasureKey::Latitude => self.latitude,
            MeasureKey::Longitude => self.longitude,
        }
    }

    /// Case-insensitive substring match on `place`.
    ///
    /// `needle` must already be lowercase; see [`filter_by_place`].
    fn place_contains_lower(&self, needle: &str) -> bool {
        needle.is_empty() || self.place.to_lowercase().contains(needle)
    }
}

/// A measurement that can be put on a chart axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKey {
    Magnitude,
    Depth,
    Latitude,
    Longitude,
}

impl MeasureKey {
    pub const ALL: [MeasureKey; 4] = [
        MeasureKey::Magnitude,
        MeasureKey::Depth,
        MeasureKey::Latitude,
        MeasureKey::Longitude,
    ];

    /// Short column-style name (`mag`, `depth`, `lat`, `lon`)
    pub fn short_name(self) -> &'static str {
        match self {
            MeasureKey::Magnitude => "mag",
            MeasureKey::Depth => "depth",
            MeasureKey::Latitude => "lat",
            MeasureKey::Longitude => "lon",
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            MeasureKey::Magnitude => "Magnitude",
            MeasureKey::Depth => "Depth",
            MeasureKey::Latitude => "Latitude",
            MeasureKey::Longitude => "Longitude",
        }
    }
}

impl fmt::Display for MeasureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a measurement name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMeasure(pub String);

impl fmt::Display for UnknownMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown measurement '{}'", self.0)
    }
}

impl std::error::Error for UnknownMeasure {}

impl FromStr for MeasureKey {
    type Err = UnknownMeasure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mag" | "magnitude" => Ok(MeasureKey::Magnitude),
            "depth" => Ok(MeasureKey::Depth),
            "lat" | "latitude" => Ok(MeasureKey::Latitude),
            "lon" | "longitude" => Ok(MeasureKey::Longitude),
            _ => Err(UnknownMeasure(s.to_string())),
        }
    }
}

/// Indices of the records whose place contains `filter`, ignoring case.
///
/// An empty filter keeps every record. Input order is preserved.
pub fn filter_by_place(records: &[Record], filter: &str) -> Vec<usize> {
    let needle = filter.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.place_contains_lower(&needle))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
pub(crate) fn sample(id: &str, place: &str, magnitude: f64) -> Record {
    Record {
        id: id.to_string(),
        time: "2024-01-01T00:00:00Z".to_string(),
        latitude: 34.1,
        longitude: -118.2,
        depth: 10.5,
        magnitude,
        place: place.to_string(),
        extra: BTreeMap::new(),
    }
}
