//! Flag-based environmental risk adjustment.

use safety_score_models::EnvironmentalFlags;

/// Added when the area is crowded.
pub const CROWDED_RISK: f64 = 0.2;
/// Added when the area is not well lit.
pub const UNLIT_RISK: f64 = 0.3;
/// Subtracted when police are nearby.
pub const POLICE_RELIEF: f64 = 0.3;
/// Added when public transport is nearby.
pub const PUBLIC_TRANSPORT_RISK: f64 = 0.1;

/// Signed risk delta for the given flags.
///
/// Not bounded here; the composite score is clamped instead.
#[must_use]
pub fn environmental_adjustment(flags: &EnvironmentalFlags) -> f64 {
    let mut adjustment = 0.0;

    if flags.is_crowded {
        adjustment += CROWDED_RISK;
    }
    if !flags.has_streetlights {
        adjustment += UNLIT_RISK;
    }
    if flags.is_near_police {
        adjustment -= POLICE_RELIEF;
    }
    if flags.is_public_transport {
        adjustment += PUBLIC_TRANSPORT_RISK;
    }

    adjustment
}
