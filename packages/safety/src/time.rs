//! Time-of-day risk on a cyclic 24-hour clock.

use safety_score_models::{HOURS_PER_DAY, TimeRiskModel, TimeRiskWindow};

/// Maps any finite hour onto `[0, 24)`.
///
/// Non-finite input maps to midnight.
#[must_use]
pub fn normalize_hour(hour: f64) -> f64 {
    if !hour.is_finite() {
        return 0.0;
    }

    let normalized = hour.rem_euclid(HOURS_PER_DAY);
    // rem_euclid can round up to exactly 24.0 for tiny negative inputs
    if normalized >= HOURS_PER_DAY {
        0.0
    } else {
        normalized
    }
}

/// Risk for `hour` under `model`, bounded to `[0, 1]`.
///
/// `windows` is only consulted by [`TimeRiskModel::Windows`]; hours outside
/// every window (or outside the peak window) get `default_risk`.
#[must_use]
pub fn time_risk(
    hour: f64,
    model: &TimeRiskModel,
    windows: &[TimeRiskWindow],
    default_risk: f64,
) -> f64 {
    let hour = normalize_hour(hour);

    let risk = match model {
        TimeRiskModel::Windows => windows
            .iter()
            .find(|w| w.contains(hour))
            .map_or(default_risk, |w| w.risk),
        TimeRiskModel::Peak {
            start_hour,
            end_hour,
        } => peak_risk(hour, *start_hour, *end_hour).unwrap_or(default_risk),
    };

    risk.clamp(0.0, 1.0)
}

/// Triangular risk peaking at 1.0 at the window midpoint, or `None` if
/// `hour` is outside the window.
fn peak_risk(hour: f64, start_hour: u8, end_hour: u8) -> Option<f64> {
    let window = TimeRiskWindow {
        label: None,
        start_hour,
        end_hour,
        risk: 1.0,
    };
    if !window.contains(hour) {
        return None;
    }

    let half_width = window.span_hours() / 2.0;
    let start = f64::from(start_hour);
    // Unroll wrapped windows so the offset from start is monotonic.
    let offset = if hour < start {
        hour + HOURS_PER_DAY - start
    } else {
        hour - start
    };

    Some(1.0 - (offset - half_width).abs() / half_width)
}
