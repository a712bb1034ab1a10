//! Static risk tables: hotspots, safe zones, and time-of-day windows.
//!
//! The default Delhi tables are baked into the binary via [`include_str!`].
//! A different table file can be supplied at startup through the
//! `SAFETY_TABLES_PATH` environment variable. Tables are validated once on
//! load and never change afterwards.

use std::path::Path;

use safety_score_models::{
    CompositionPolicy, DecayShape, Hotspot, SafeZone, TimeRiskModel, TimeRiskWindow,
};
use serde::{Deserialize, Serialize};

use crate::TableError;

/// Default tables embedded at compile time.
const DEFAULT_TABLES_TOML: &str = include_str!("../tables/delhi.toml");

/// Environment variable naming an alternative tables TOML file.
pub const TABLES_PATH_ENV: &str = "SAFETY_TABLES_PATH";

/// Complete static configuration of a [`crate::RiskEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTables {
    /// Name of the table set (e.g. "delhi").
    pub name: String,
    /// Distance within which a hotspot applies its full weight.
    pub hotspot_radius_m: f64,
    /// Distance beyond which a hotspot contributes nothing.
    pub max_risk_distance_m: f64,
    /// Falloff between the two radii.
    #[serde(default)]
    pub decay: DecayShape,
    /// How the components combine.
    #[serde(default)]
    pub composition: CompositionPolicy,
    /// How time-of-day risk is computed.
    #[serde(default)]
    pub time_model: TimeRiskModel,
    /// Risk for hours not covered by any window.
    pub default_time_risk: f64,
    /// Ordered time windows; first match wins.
    #[serde(default)]
    pub time_windows: Vec<TimeRiskWindow>,
    /// Known high-risk centers.
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
    /// Protective areas.
    #[serde(default)]
    pub safe_zones: Vec<SafeZone>,
}

impl RiskTables {
    /// Returns the embedded default tables.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed or invalid. The file is
    /// compiled into the binary and covered by tests.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml_str(DEFAULT_TABLES_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded delhi.toml: {e}"))
    }

    /// Parses and validates tables from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the tables fail
    /// validation.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, TableError> {
        let tables: Self = toml::de::from_str(toml_str)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Reads, parses and validates tables from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads tables from `SAFETY_TABLES_PATH` if set, otherwise the
    /// embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file cannot be loaded.
    pub fn from_env() -> Result<Self, TableError> {
        match std::env::var(TABLES_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                log::info!("Loading risk tables from {path}");
                Self::from_path(Path::new(path.trim()))
            }
            _ => {
                log::info!("Using embedded risk tables");
                Ok(Self::embedded())
            }
        }
    }

    /// Checks every table invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), TableError> {
        check_unit("default_time_risk", self.default_time_risk)?;

        if !(self.hotspot_radius_m.is_finite() && self.hotspot_radius_m >= 0.0) {
            return Err(TableError::InvalidDistance {
                field: "hotspot_radius_m".to_string(),
                value: self.hotspot_radius_m,
            });
        }
        if !(self.max_risk_distance_m.is_finite() && self.max_risk_distance_m > 0.0) {
            return Err(TableError::InvalidDistance {
                field: "max_risk_distance_m".to_string(),
                value: self.max_risk_distance_m,
            });
        }
        if self.hotspot_radius_m >= self.max_risk_distance_m {
            return Err(TableError::RadiusOrder {
                hotspot_radius_m: self.hotspot_radius_m,
                max_risk_distance_m: self.max_risk_distance_m,
            });
        }

        for hotspot in &self.hotspots {
            check_coordinate(&hotspot.name, hotspot.latitude, hotspot.longitude)?;
            check_unit(&format!("hotspot {}", hotspot.name), hotspot.risk_weight)?;
        }

        for zone in &self.safe_zones {
            check_coordinate(&zone.name, zone.latitude, zone.longitude)?;
            check_unit(&format!("safe zone {}", zone.name), zone.safety_boost)?;
            if !(zone.radius_m.is_finite() && zone.radius_m > 0.0) {
                return Err(TableError::InvalidDistance {
                    field: format!("safe zone {} radius_m", zone.name),
                    value: zone.radius_m,
                });
            }
        }

        for window in &self.time_windows {
            check_window_hours(window.start_hour, window.end_hour)?;
            check_unit(&window_name(window), window.risk)?;
        }
        check_no_overlap(&self.time_windows)?;

        if let TimeRiskModel::Peak {
            start_hour,
            end_hour,
        } = self.time_model
        {
            check_window_hours(start_hour, end_hour)?;
        }

        Ok(())
    }
}

fn check_coordinate(name: &str, latitude: f64, longitude: f64) -> Result<(), TableError> {
    if latitude.is_finite() && longitude.is_finite() {
        Ok(())
    } else {
        Err(TableError::InvalidCoordinate {
            name: name.to_string(),
            latitude,
            longitude,
        })
    }
}

fn window_name(window: &TimeRiskWindow) -> String {
    window.label.as_ref().map_or_else(
        || format!("window {}-{}", window.start_hour, window.end_hour),
        |label| format!("window {label}"),
    )
}

fn check_unit(field: &str, value: f64) -> Result<(), TableError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TableError::OutOfUnitRange {
            field: field.to_string(),
            value,
        })
    }
}

fn check_window_hours(start_hour: u8, end_hour: u8) -> Result<(), TableError> {
    if start_hour >= 24 || end_hour > 24 || start_hour == end_hour {
        Err(TableError::InvalidWindow {
            start_hour,
            end_hour,
        })
    } else {
        Ok(())
    }
}

/// Whole hours `0..24` covered by a window.
fn covered_hours(window: &TimeRiskWindow) -> impl Iterator<Item = u8> + '_ {
    (0..24u8).filter(|h| window.contains(f64::from(*h)))
}

/// Rejects tables where two windows claim the same hour, since first-match
/// lookup would silently shadow the later one.
fn check_no_overlap(windows: &[TimeRiskWindow]) -> Result<(), TableError> {
    let mut owner: [Option<usize>; 24] = [None; 24];

    for (idx, window) in windows.iter().enumerate() {
        for hour in covered_hours(window) {
            let slot = &mut owner[usize::from(hour)];
            if let Some(previous) = *slot {
                return Err(TableError::OverlappingWindows {
                    first: window_name(&windows[previous]),
                    second: window_name(window),
                    hour,
                });
            }
            *slot = Some(idx);
        }
    }

    Ok(())
}
