//! Safe-zone counter-risk.

use safety_score_models::{GeoPoint, SafeZone};

use crate::distance::haversine_distance;

/// Best safe-zone boost at `point`, with the zone responsible.
///
/// A zone gives its full boost at the center, falling linearly to zero at
/// its radius. Boosts from overlapping zones do not accumulate.
#[must_use]
pub fn safety_boost<'a>(point: GeoPoint, zones: &'a [SafeZone]) -> (f64, Option<&'a SafeZone>) {
    let mut best = 0.0;
    let mut protecting = None;

    for zone in zones {
        let distance = haversine_distance(point, zone.center());
        if distance > zone.radius_m {
            continue;
        }

        let boost = zone.safety_boost * (1.0 - distance / zone.radius_m);
        if boost > best {
            best = boost;
            protecting = Some(zone);
        }
    }

    (best, protecting)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, radius_m: f64, safety_boost: f64) -> SafeZone {
        SafeZone {
            name: name.to_string(),
            latitude: 28.6143,
            longitude: 77.1994,
            radius_m,
            safety_boost,
        }
    }

    #[test]
    fn full_boost_at_center() {
        let zones = vec![zone("Rashtrapati_Bhavan", 1500.0, 0.6)];
        let (boost, protecting) = safety_boost(zones[0].center(), &zones);
        assert!((boost - 0.6).abs() < 1e-12);
        assert_eq!(protecting.map(|z| z.name.as_str()), Some("Rashtrapati_Bhavan"));
    }

    #[test]
    fn zero_outside_radius() {
        let zones = vec![zone("Rashtrapati_Bhavan", 1500.0, 0.6)];
        // ~2.2 km north
        let point = GeoPoint::new(28.6343, 77.1994);
        let (boost, protecting) = safety_boost(point, &zones);
        assert!(boost.abs() < f64::EPSILON);
        assert!(protecting.is_none());
    }

    #[test]
    fn falls_off_linearly() {
        let zones = vec![zone("Rashtrapati_Bhavan", 2000.0, 0.6)];
        let center = zones[0].center();
        let half_way = GeoPoint::new(
            center.latitude + (1000.0 / crate::distance::EARTH_RADIUS_M).to_degrees(),
            center.longitude,
        );
        let (boost, _) = safety_boost(half_way, &zones);
        assert!((boost - 0.3).abs() < 1e-6, "boost {boost}");
    }

    #[test]
    fn best_zone_wins_without_accumulating() {
        let zones = vec![zone("Small", 500.0, 0.3), zone("Large", 1500.0, 0.6)];
        let (boost, protecting) = safety_boost(zones[0].center(), &zones);
        assert!((boost - 0.6).abs() < 1e-12);
        assert_eq!(protecting.map(|z| z.name.as_str()), Some("Large"));
    }
}
