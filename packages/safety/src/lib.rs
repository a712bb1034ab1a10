#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heuristic geospatial risk engine.
//!
//! Scores a point and hour on a 0-100 safety scale from four independent
//! components: proximity to known crime hotspots, time-of-day risk,
//! protective safe zones, and optional environmental flags. The engine owns
//! its static tables immutably, so a single instance can be shared across
//! threads and every call is a pure function of its inputs.

pub mod boost;
pub mod distance;
pub mod environment;
pub mod location;
pub mod tables;
pub mod time;

use safety_score_models::{
    CompositionPolicy, GeoPoint, Hotspot, RiskBreakdown, RiskInputs, SafeZone, SafetyBand,
};
use thiserror::Error;

use crate::location::DecayProfile;
pub use crate::tables::RiskTables;

/// Location weight under [`CompositionPolicy::BoostMultiplicative`].
const BOOST_LOCATION_WEIGHT: f64 = 0.6;
/// Time weight under [`CompositionPolicy::BoostMultiplicative`].
const BOOST_TIME_WEIGHT: f64 = 0.4;

/// Location weight under [`CompositionPolicy::EnvironmentalAdditive`].
const ADDITIVE_LOCATION_WEIGHT: f64 = 0.4;
/// Time weight under [`CompositionPolicy::EnvironmentalAdditive`].
const ADDITIVE_TIME_WEIGHT: f64 = 0.3;
/// Environment weight under [`CompositionPolicy::EnvironmentalAdditive`].
const ADDITIVE_ENVIRONMENT_WEIGHT: f64 = 0.3;

/// Upper bound of the safety scale.
pub const MAX_SCORE: f64 = 100.0;

/// Errors that can occur while loading or validating risk tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// Table file could not be read.
    #[error("Failed to read tables from {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A weight, boost or risk is outside `[0, 1]`.
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange {
        /// Offending field.
        field: String,
        /// Offending value.
        value: f64,
    },

    /// A distance is negative, zero where it must be positive, or not finite.
    #[error("{field} is not a valid distance: {value}")]
    InvalidDistance {
        /// Offending field.
        field: String,
        /// Offending value.
        value: f64,
    },

    /// A hotspot or safe zone has a NaN or infinite coordinate.
    #[error("{name} has a non-finite coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Name of the hotspot or safe zone.
        name: String,
        /// Configured latitude.
        latitude: f64,
        /// Configured longitude.
        longitude: f64,
    },

    /// The hotspot core radius does not lie inside the maximum risk distance.
    #[error(
        "hotspot_radius_m ({hotspot_radius_m}) must be less than max_risk_distance_m ({max_risk_distance_m})"
    )]
    RadiusOrder {
        /// Configured core radius.
        hotspot_radius_m: f64,
        /// Configured cutoff.
        max_risk_distance_m: f64,
    },

    /// A time window has out-of-range or equal start/end hours.
    #[error("invalid time window {start_hour}-{end_hour}")]
    InvalidWindow {
        /// Start hour.
        start_hour: u8,
        /// End hour.
        end_hour: u8,
    },

    /// Two time windows cover the same hour.
    #[error("{first} and {second} both cover hour {hour}")]
    OverlappingWindows {
        /// Earlier window in table order.
        first: String,
        /// Later window in table order.
        second: String,
        /// First shared hour.
        hour: u8,
    },
}

/// Safety scoring engine over a fixed set of [`RiskTables`].
#[derive(Debug, Clone)]
pub struct RiskEngine {
    tables: RiskTables,
    decay: DecayProfile,
}

impl RiskEngine {
    /// Builds an engine from validated tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables violate any invariant.
    pub fn new(tables: RiskTables) -> Result<Self, TableError> {
        tables.validate()?;

        log::info!(
            "Risk engine '{}': {} hotspots, {} safe zones, {} time windows ({} decay, {} composition)",
            tables.name,
            tables.hotspots.len(),
            tables.safe_zones.len(),
            tables.time_windows.len(),
            tables.decay,
            tables.composition,
        );

        let decay = DecayProfile {
            hotspot_radius_m: tables.hotspot_radius_m,
            max_risk_distance_m: tables.max_risk_distance_m,
            shape: tables.decay,
        };

        Ok(Self { tables, decay })
    }

    /// Builds an engine over the embedded default tables.
    ///
    /// # Panics
    ///
    /// Panics if the embedded tables are invalid.
    #[must_use]
    pub fn embedded() -> Self {
        Self::new(RiskTables::embedded())
            .unwrap_or_else(|e| panic!("Embedded risk tables are invalid: {e}"))
    }

    /// Builds an engine from `SAFETY_TABLES_PATH` or the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured tables cannot be loaded.
    pub fn from_env() -> Result<Self, TableError> {
        Self::new(RiskTables::from_env()?)
    }

    /// The tables this engine scores against.
    #[must_use]
    pub const fn tables(&self) -> &RiskTables {
        &self.tables
    }

    /// Configured hotspots.
    #[must_use]
    pub fn hotspots(&self) -> &[Hotspot] {
        &self.tables.hotspots
    }

    /// Configured safe zones.
    #[must_use]
    pub fn safe_zones(&self) -> &[SafeZone] {
        &self.tables.safe_zones
    }

    /// Whether the composition policy reads [`RiskInputs::environment`].
    #[must_use]
    pub const fn uses_environment(&self) -> bool {
        matches!(
            self.tables.composition,
            CompositionPolicy::EnvironmentalAdditive
        )
    }

    /// Worst-case hotspot risk at `point`.
    #[must_use]
    pub fn location_risk(&self, point: GeoPoint) -> f64 {
        location::location_risk(point, &self.tables.hotspots, &self.decay).0
    }

    /// Time-of-day risk for `hour` (any finite value, normalized modulo 24).
    #[must_use]
    pub fn time_risk(&self, hour: f64) -> f64 {
        time::time_risk(
            hour,
            &self.tables.time_model,
            &self.tables.time_windows,
            self.tables.default_time_risk,
        )
    }

    /// Best safe-zone boost at `point`.
    #[must_use]
    pub fn safety_boost(&self, point: GeoPoint) -> f64 {
        boost::safety_boost(point, &self.tables.safe_zones).0
    }

    /// Safety score in `[0, 100]`.
    #[must_use]
    pub fn score(&self, inputs: &RiskInputs) -> f64 {
        self.assess(inputs).score
    }

    /// Computes every component and the final score.
    ///
    /// All components are reported regardless of policy, but only the ones
    /// the configured [`CompositionPolicy`] uses contribute to
    /// [`RiskBreakdown::total_risk`].
    #[must_use]
    pub fn assess(&self, inputs: &RiskInputs) -> RiskBreakdown {
        let point = inputs.point();

        let (location_risk, dominant) =
            location::location_risk(point, &self.tables.hotspots, &self.decay);
        let time_risk = self.time_risk(inputs.hour);
        let (safety_boost, protecting) = boost::safety_boost(point, &self.tables.safe_zones);
        let environmental_adjustment = inputs
            .environment
            .as_ref()
            .map_or(0.0, environment::environmental_adjustment);

        let total_risk = match self.tables.composition {
            CompositionPolicy::BoostMultiplicative => {
                let base = BOOST_LOCATION_WEIGHT.mul_add(
                    location_risk,
                    BOOST_TIME_WEIGHT * time_risk,
                );
                base * (1.0 - safety_boost)
            }
            CompositionPolicy::EnvironmentalAdditive => ADDITIVE_ENVIRONMENT_WEIGHT.mul_add(
                environmental_adjustment,
                ADDITIVE_LOCATION_WEIGHT.mul_add(location_risk, ADDITIVE_TIME_WEIGHT * time_risk),
            ),
        };

        let score = risk_to_score(total_risk);

        log::debug!(
            "assess: ({}, {}) hour={} location={location_risk:.3} time={time_risk:.3} \
             boost={safety_boost:.3} env={environmental_adjustment:.3} -> score={score:.2}",
            inputs.latitude,
            inputs.longitude,
            inputs.hour,
        );

        RiskBreakdown {
            location_risk,
            time_risk,
            safety_boost,
            environmental_adjustment,
            total_risk,
            score,
            band: SafetyBand::from_score(score),
            dominant_hotspot: dominant.map(|h| h.name.clone()),
            protecting_zone: protecting.map(|z| z.name.clone()),
        }
    }
}

/// Converts a total risk into a score clamped to `[0, 100]`.
#[must_use]
pub fn risk_to_score(total_risk: f64) -> f64 {
    (MAX_SCORE * (1.0 - total_risk)).clamp(0.0, MAX_SCORE)
}
