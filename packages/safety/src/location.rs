//! Hotspot proximity risk.
//!
//! Each hotspot has a core radius inside which its full weight applies, a
//! decay band out to the maximum risk distance, and no influence beyond it.
//! Risk from several hotspots does not stack: the worst one wins.

use safety_score_models::{DecayShape, GeoPoint, Hotspot};

use crate::distance::haversine_distance;

/// Distance thresholds and falloff shared by every hotspot of an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayProfile {
    /// Full-weight core radius in meters.
    pub hotspot_radius_m: f64,
    /// Zero-risk cutoff in meters.
    pub max_risk_distance_m: f64,
    /// Falloff shape between the two.
    pub shape: DecayShape,
}

impl DecayProfile {
    /// Risk contributed by a hotspot of `weight` at `distance_m`.
    #[must_use]
    pub fn risk_at(&self, weight: f64, distance_m: f64) -> f64 {
        if distance_m <= self.hotspot_radius_m {
            weight
        } else if distance_m <= self.max_risk_distance_m {
            match self.shape {
                DecayShape::Linear => {
                    let band = self.max_risk_distance_m - self.hotspot_radius_m;
                    weight * (1.0 - (distance_m - self.hotspot_radius_m) / band)
                }
                DecayShape::Exponential => weight * (-distance_m / self.max_risk_distance_m).exp(),
            }
        } else {
            0.0
        }
    }
}

/// Worst-case hotspot risk at `point`, with the hotspot responsible.
///
/// Returns `(0.0, None)` when no hotspot is within range.
#[must_use]
pub fn location_risk<'a>(
    point: GeoPoint,
    hotspots: &'a [Hotspot],
    profile: &DecayProfile,
) -> (f64, Option<&'a Hotspot>) {
    let mut max_risk = 0.0;
    let mut dominant = None;

    for hotspot in hotspots {
        let distance = haversine_distance(point, hotspot.center());
        let risk = profile.risk_at(hotspot.risk_weight, distance);

        if risk > max_risk {
            max_risk = risk;
            dominant = Some(hotspot);
        }
    }

    (max_risk, dominant)
}
