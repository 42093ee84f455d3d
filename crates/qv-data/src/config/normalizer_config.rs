//! CSV normalization settings

use serde::{Serialize, Deserialize};

/// What to do with rows whose coordinates are missing or unparseable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatePolicy {
    /// Keep the row with the bad coordinate set to 0
    #[default]
    ZeroFill,
    /// Leave the row out
    DropRow,
}

/// Normalizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Place used when neither `place` nor `location` has a value
    pub placeholder_place: String,

    /// Handling of rows with non-finite coordinates
    pub coordinate_policy: CoordinatePolicy,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            placeholder_place: "Unknown".to_string(),
            coordinate_policy: CoordinatePolicy::ZeroFill,
        }
    }
}
