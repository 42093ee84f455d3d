//! Color utilities for plots

use egui::Color32;

/// Fill of the selected mark, regardless of magnitude
pub const SELECTED_FILL: Color32 = Color32::from_rgb(0xf9, 0x73, 0x16);

/// Outline of the selected mark
pub const SELECTED_STROKE: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);

/// Magnitude band used for coloring marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagnitudeClass {
    /// Below 3
    Minor,
    /// 3 up to 5
    Moderate,
    /// 5 and above
    Strong,
}

impl MagnitudeClass {
    pub const ALL: [MagnitudeClass; 3] = [
        MagnitudeClass::Minor,
        MagnitudeClass::Moderate,
        MagnitudeClass::Strong,
    ];

    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 5.0 {
            MagnitudeClass::Strong
        } else if magnitude >= 3.0 {
            MagnitudeClass::Moderate
        } else {
            MagnitudeClass::Minor
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            MagnitudeClass::Strong => Color32::from_rgb(0xef, 0x44, 0x44),   // Red
            MagnitudeClass::Moderate => Color32::from_rgb(0xfa, 0xcc, 0x15), // Yellow
            MagnitudeClass::Minor => Color32::from_rgb(0x38, 0xbd, 0xf8),    // Blue
        }
    }

    /// Marker radius for scatter points
    pub fn radius(self) -> f32 {
        match self {
            MagnitudeClass::Strong => 6.0,
            MagnitudeClass::Moderate => 4.5,
            MagnitudeClass::Minor => 3.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MagnitudeClass::Strong => "M5+",
            MagnitudeClass::Moderate => "M3-5",
            MagnitudeClass::Minor => "< M3",
        }
    }
}

/// Mark color for a magnitude
pub fn magnitude_color(magnitude: f64) -> Color32 {
    MagnitudeClass::from_magnitude(magnitude).color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_bands() {
        assert_eq!(MagnitudeClass::from_magnitude(0.0), MagnitudeClass::Minor);
        assert_eq!(MagnitudeClass::from_magnitude(2.99), MagnitudeClass::Minor);
        assert_eq!(MagnitudeClass::from_magnitude(3.0), MagnitudeClass::Moderate);
        assert_eq!(MagnitudeClass::from_magnitude(4.9), MagnitudeClass::Moderate);
        assert_eq!(MagnitudeClass::from_magnitude(5.0), MagnitudeClass::Strong);
    }

    #[test]
    fn test_selected_color_differs_from_every_band() {
        for class in MagnitudeClass::ALL {
            assert_ne!(class.color(), SELECTED_FILL);
        }
        assert_eq!(magnitude_color(6.1), MagnitudeClass::Strong.color());
    }
}
