#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the safety score server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the engine's model types so the wire contract can evolve
//! independently.

use safety_score_models::{Hotspot, RiskBreakdown, RiskInputs, SafeZone};
use serde::{Deserialize, Serialize};

/// Body of the scoring endpoints.
///
/// `review` is a comma-separated list of exactly six numbers:
/// `hour,minute,latitude,longitude,day,month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Raw comma-separated values.
    pub review: String,
}

/// Response of `POST /sentiment_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiScore {
    /// The six parsed input values, in request order.
    pub review: Vec<f64>,
    /// Safety score in `[0, 100]`, rounded to two decimals.
    pub score: f64,
}

/// Response of `POST /api/safety/breakdown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBreakdown {
    /// The six parsed input values, in request order.
    pub review: Vec<f64>,
    /// Inputs handed to the engine, including defaulted flags.
    pub inputs: RiskInputs,
    /// Every scoring component.
    pub breakdown: RiskBreakdown,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Static hotspot table response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHotspots {
    /// Name of the loaded table set.
    pub table: String,
    /// Full-weight core radius in meters.
    pub hotspot_radius_m: f64,
    /// Zero-risk cutoff in meters.
    pub max_risk_distance_m: f64,
    /// Configured hotspots.
    pub hotspots: Vec<Hotspot>,
}

/// Static safe-zone table response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSafeZones {
    /// Name of the loaded table set.
    pub table: String,
    /// Configured safe zones.
    pub safe_zones: Vec<SafeZone>,
}

/// Error body returned with every 4xx/5xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Short human-readable description.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_serializes_with_original_keys() {
        let body = ApiScore {
            review: vec![23.0, 0.0, 28.6469, 77.3164, 1.0, 1.0],
            score: 6.0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["score"], 6.0);
        assert_eq!(json["review"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn request_requires_review() {
        assert!(serde_json::from_str::<ReviewRequest>("{}").is_err());
        let req: ReviewRequest = serde_json::from_str(r#"{"review": "1,2,3,4,5,6"}"#).unwrap();
        assert_eq!(req.review, "1,2,3,4,5,6");
    }
}
