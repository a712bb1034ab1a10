#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk table and scoring result types for the safety score engine.
//!
//! These types describe the static landmark tables (hotspots, safe zones,
//! time-of-day risk windows), the per-request scoring inputs, and the
//! component breakdown the engine produces. They carry no scoring logic
//! beyond simple geometry helpers so they can be shared with the API layer.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of hours on the cyclic clock used for time-of-day risk.
pub const HOURS_PER_DAY: f64 = 24.0;

/// A point on the Earth's surface in decimal degrees.
///
/// No range validation is performed: out-of-range coordinates are accepted
/// and simply end up far away from every landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from a latitude/longitude pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A known high-crime center with an associated risk weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Human-readable name (e.g. `Anand_Vihar`).
    pub name: String,
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Risk applied inside the hotspot core, in `[0, 1]`.
    #[serde(alias = "risk_weight")]
    pub risk_weight: f64,
}

impl Hotspot {
    /// Returns the hotspot center.
    #[must_use]
    pub const fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A protective area (government or diplomatic compound, police HQ) whose
/// proximity reduces risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeZone {
    /// Human-readable name.
    pub name: String,
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Radius of influence in meters.
    #[serde(alias = "radius_m")]
    pub radius_m: f64,
    /// Boost at the exact center, in `[0, 1]`.
    #[serde(alias = "safety_boost")]
    pub safety_boost: f64,
}

impl SafeZone {
    /// Returns the zone center.
    #[must_use]
    pub const fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A half-open `[start_hour, end_hour)` interval on the 24-hour clock.
///
/// Windows with `start_hour > end_hour` wrap past midnight, e.g. `22 -> 5`
/// covers 22:00 through 04:59.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRiskWindow {
    /// Optional label (e.g. "night").
    #[serde(default)]
    pub label: Option<String>,
    /// Inclusive start hour, `0..24`.
    #[serde(alias = "start_hour")]
    pub start_hour: u8,
    /// Exclusive end hour, `0..=24`.
    #[serde(alias = "end_hour")]
    pub end_hour: u8,
    /// Risk weight for hours inside the window, in `[0, 1]`.
    pub risk: f64,
}

impl TimeRiskWindow {
    /// Whether this window wraps past midnight.
    #[must_use]
    pub const fn wraps_midnight(&self) -> bool {
        self.start_hour > self.end_hour
    }

    /// Whether `hour` (already normalized to `[0, 24)`) falls inside this
    /// window.
    #[must_use]
    pub fn contains(&self, hour: f64) -> bool {
        let start = f64::from(self.start_hour);
        let end = f64::from(self.end_hour);

        if self.wraps_midnight() {
            hour >= start || hour < end
        } else {
            start <= hour && hour < end
        }
    }

    /// Number of hours covered by this window.
    #[must_use]
    pub fn span_hours(&self) -> f64 {
        let start = f64::from(self.start_hour);
        let end = f64::from(self.end_hour);

        if self.wraps_midnight() {
            HOURS_PER_DAY - start + end
        } else {
            end - start
        }
    }
}

/// Shape of the risk falloff between the hotspot core radius and the
/// maximum risk distance.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecayShape {
    /// `w * (1 - (d - r) / (D - r))`
    #[default]
    Linear,
    /// `w * exp(-d / D)`
    Exponential,
}

/// How the time-of-day risk component is computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeRiskModel {
    /// First matching window of the configured table wins.
    #[default]
    Windows,
    /// Triangular peak of 1.0 at the midpoint of a single high-risk window,
    /// falling to 0 at its edges.
    Peak {
        /// Inclusive start hour of the peak window.
        start_hour: u8,
        /// Exclusive end hour of the peak window.
        end_hour: u8,
    },
}

/// How the individual risk components combine into the total risk.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CompositionPolicy {
    /// `(0.6 * location + 0.4 * time) * (1 - boost)`
    #[default]
    BoostMultiplicative,
    /// `0.4 * location + 0.3 * time + 0.3 * environment`
    EnvironmentalAdditive,
}

/// Categorical surroundings of a scoring request.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalFlags {
    /// The area is crowded.
    pub is_crowded: bool,
    /// The area is well lit.
    pub has_streetlights: bool,
    /// A police presence is nearby.
    pub is_near_police: bool,
    /// Public transport is nearby.
    pub is_public_transport: bool,
}

/// Inputs for a single scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInputs {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Hour of day; normalized modulo 24 by the engine.
    pub hour: f64,
    /// Environmental flags, if the caller supplies any.
    #[serde(default)]
    pub environment: Option<EnvironmentalFlags>,
}

impl RiskInputs {
    /// Creates inputs without environmental flags.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, hour: f64) -> Self {
        Self {
            latitude,
            longitude,
            hour,
            environment: None,
        }
    }

    /// Attaches environmental flags.
    #[must_use]
    pub const fn with_environment(mut self, environment: EnvironmentalFlags) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Returns the location being scored.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Coarse classification of a safety score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyBand {
    /// Score below 40
    Unsafe,
    /// Score in `[40, 60)`
    Caution,
    /// Score in `[60, 80)`
    Moderate,
    /// Score of 80 or above
    Safe,
}

impl SafetyBand {
    /// Classifies a `[0, 100]` safety score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 40.0 {
            Self::Unsafe
        } else if score < 60.0 {
            Self::Caution
        } else if score < 80.0 {
            Self::Moderate
        } else {
            Self::Safe
        }
    }
}

/// Every intermediate value of a scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
    /// Worst-case hotspot proximity risk.
    pub location_risk: f64,
    /// Time-of-day risk.
    pub time_risk: f64,
    /// Best safe-zone boost.
    pub safety_boost: f64,
    /// Signed environmental adjustment (0 when no flags were supplied).
    pub environmental_adjustment: f64,
    /// Combined risk before conversion to a score.
    pub total_risk: f64,
    /// Final safety score in `[0, 100]`.
    pub score: f64,
    /// Band of [`Self::score`].
    pub band: SafetyBand,
    /// Hotspot contributing [`Self::location_risk`], if any contributes.
    pub dominant_hotspot: Option<String>,
    /// Safe zone contributing [`Self::safety_boost`], if any.
    pub protecting_zone: Option<String>,
}
