use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Area {
    Brightness,
    ColorTemperature,
    Flicker,
}

impl Area {
    pub fn label(&self) -> &'static str {
        match self {
            Area::Brightness => "Brightness",
            Area::ColorTemperature => "Color temperature",
            Area::Flicker => "Flicker",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity tag of a recommendation. Which tags occur depends on the area:
/// brightness uses Low/Good/High, color temperature Warm/Neutral/Cool and
/// flicker Low/Moderate/High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Good,
    Low,
    Moderate,
    High,
    Warm,
    Cool,
    Neutral,
}

impl Severity {
    /// Points subtracted from the composite score.
    pub fn penalty(&self) -> u8 {
        match self {
            Severity::Good | Severity::Neutral => 0,
            Severity::Low | Severity::Moderate => 10,
            Severity::High | Severity::Warm | Severity::Cool => 20,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub area: Area,
    pub severity: Severity,
    pub note: &'static str,
}

impl Recommendation {
    /// Builds the line item with its canned note. Returns `None` for a
    /// severity the area never produces.
    pub fn new(area: Area, severity: Severity) -> Option<Self> {
        canned_note(area, severity).map(|note| Self {
            area,
            severity,
            note,
        })
    }
}

fn canned_note(area: Area, severity: Severity) -> Option<&'static str> {
    let note = match (area, severity) {
        (Area::Brightness, Severity::Low) => {
            "May be too dim — could cause eye strain over time."
        }
        (Area::Brightness, Severity::High) => {
            "Quite bright — might cause glare depending on distance."
        }
        (Area::Brightness, Severity::Good) => {
            "Brightness within a comfortable range for reading/desk use (approx)."
        }
        (Area::ColorTemperature, Severity::Cool) => {
            "Cool, blue-rich light can increase alertness but may disrupt sleep if used in the evening."
        }
        (Area::ColorTemperature, Severity::Warm) => {
            "Warm light is gentler on the eyes in the evening and less likely to interfere with sleep."
        }
        (Area::ColorTemperature, Severity::Neutral) => "Color appears balanced.",
        (Area::Flicker, Severity::High) => {
            "Detected noticeable temporal brightness variations — could cause headaches or visual discomfort in sensitive people."
        }
        (Area::Flicker, Severity::Moderate) => {
            "Minor flicker detected — may be noticeable to some users."
        }
        (Area::Flicker, Severity::Low) => {
            "No significant flicker detected in the scanned interval."
        }
        _ => return None,
    };
    Some(note)
}
