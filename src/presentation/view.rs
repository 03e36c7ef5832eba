use crate::scoring::{Recommendation, Report, Severity};
use crate::session::SessionState;

pub const NO_SCAN_HINT: &str = "No scan yet. Point your camera at the lamp, ensure the lamp is the main light source in the frame, then press \"Scan Lamp\".";

pub const DISCLAIMER: &str = "Health & safety note: This app provides heuristic guidance only. It does not replace professional advice or calibrated measurements. For precise lux/CRI/CCT readings use certified measurement equipment.";

pub const TIPS: [&str; 3] = [
    "Make the lamp the main light source in the frame",
    "Scan for at least 1 second when lamp is stabilized",
    "Compare during normal use (evening vs daytime matters)",
];

/// Dot colour shown next to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Green,
    Yellow,
    Red,
}

impl Indicator {
    pub fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Good | Severity::Low => Indicator::Green,
            Severity::Moderate => Indicator::Yellow,
            _ => Indicator::Red,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Indicator::Green => "[ok]",
            Indicator::Yellow => "[~~]",
            Indicator::Red => "[!!]",
        }
    }
}

/// Which controls are offered for the current session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub camera_label: &'static str,
    pub scan_label: &'static str,
    pub scan_enabled: bool,
}

impl Controls {
    pub fn for_state(state: &SessionState) -> Self {
        Self {
            camera_label: if state.streaming {
                "Stop Camera"
            } else {
                "Start Camera"
            },
            scan_label: if state.scanning {
                "Scanning..."
            } else {
                "Scan Lamp"
            },
            scan_enabled: state.streaming && !state.scanning,
        }
    }
}

pub fn render_recommendation(recommendation: &Recommendation) -> String {
    format!(
        "{} {} — {}: {}",
        Indicator::for_severity(recommendation.severity).symbol(),
        recommendation.area,
        recommendation.severity,
        recommendation.note
    )
}

pub fn render_report(report: &Report) -> Vec<String> {
    let mut lines = vec![
        format!("Composite Score: {}%", report.score),
        format!("Brightness: {}", report.avg_luminance),
        format!("Flicker index: {}", report.flicker_index),
        format!("Color: {} (ratio {})", report.color_temp_label, report.color_ratio),
    ];
    lines.extend(report.recommendations.iter().map(render_recommendation));
    lines.push(DISCLAIMER.to_string());
    lines
}

/// Full results panel: error line, report or hint, then the scanning tips.
pub fn render_state(state: &SessionState) -> String {
    let mut lines = Vec::new();
    if let Some(error) = &state.error {
        lines.push(format!("Error: {}", error));
    }
    match &state.results {
        Some(report) => lines.extend(render_report(report)),
        None => lines.push(NO_SCAN_HINT.to_string()),
    }
    lines.push("Quick tips for accurate scanning".to_string());
    lines.extend(TIPS.iter().map(|tip| format!("  • {}", tip)));
    lines.join("\n")
}
