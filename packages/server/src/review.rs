//! Parsing of the free-text `review` payload.
//!
//! The payload is `hour,minute,latitude,longitude,day,month`. Only hour,
//! latitude and longitude feed the engine; the rest is echoed back.

use safety_score_models::{EnvironmentalFlags, RiskInputs};
use thiserror::Error;

/// Number of values a review must contain.
pub const REVIEW_FIELD_COUNT: usize = 6;

/// Errors produced while parsing a review string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// A token is not a number.
    #[error("Invalid input format. All values must be numbers (got '{token}')")]
    NotNumeric {
        /// The offending token.
        token: String,
    },

    /// A token parsed but is NaN or infinite.
    #[error("Invalid input format. All values must be finite (got '{token}')")]
    NotFinite {
        /// The offending token.
        token: String,
    },

    /// The review does not contain exactly six values.
    #[error(
        "Input must contain exactly 6 values: hour, minute, latitude, longitude, day, month (got {found})"
    )]
    WrongCount {
        /// Number of values found.
        found: usize,
    },
}

/// The six numbers of a review, in request order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewValues {
    /// Hour of day.
    pub hour: f64,
    /// Minute of the hour (echoed only).
    pub minute: f64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Day of month (echoed only).
    pub day: f64,
    /// Month (echoed only).
    pub month: f64,
}

impl ReviewValues {
    /// Parses a comma-separated review string.
    ///
    /// # Errors
    ///
    /// Returns an error if any token is not a finite number or the number
    /// of tokens is not exactly six.
    pub fn parse(review: &str) -> Result<Self, ReviewError> {
        let values = review
            .split(',')
            .map(parse_token)
            .collect::<Result<Vec<f64>, _>>()?;

        let [hour, minute, latitude, longitude, day, month] = values[..] else {
            return Err(ReviewError::WrongCount {
                found: values.len(),
            });
        };

        Ok(Self {
            hour,
            minute,
            latitude,
            longitude,
            day,
            month,
        })
    }

    /// Values in request order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.hour,
            self.minute,
            self.latitude,
            self.longitude,
            self.day,
            self.month,
        ]
    }

    /// Engine inputs for this review. `environment` is attached when given.
    #[must_use]
    pub const fn risk_inputs(&self, environment: Option<EnvironmentalFlags>) -> RiskInputs {
        let inputs = RiskInputs::new(self.latitude, self.longitude, self.hour);
        match environment {
            Some(flags) => inputs.with_environment(flags),
            None => inputs,
        }
    }
}

fn parse_token(token: &str) -> Result<f64, ReviewError> {
    let token = token.trim();
    let value: f64 = token.parse().map_err(|_| ReviewError::NotNumeric {
        token: token.to_string(),
    })?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ReviewError::NotFinite {
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_values() {
        let values = ReviewValues::parse("23, 15, 28.6469, 77.3164, 4, 11").unwrap();
        assert!((values.hour - 23.0).abs() < f64::EPSILON);
        assert!((values.latitude - 28.6469).abs() < f64::EPSILON);
        assert!((values.longitude - 77.3164).abs() < f64::EPSILON);
        assert_eq!(values.to_vec(), vec![23.0, 15.0, 28.6469, 77.3164, 4.0, 11.0]);
    }

    #[test]
    fn rejects_wrong_count() {
        assert_eq!(
            ReviewValues::parse("1,2,3,4,5"),
            Err(ReviewError::WrongCount { found: 5 })
        );
        assert_eq!(
            ReviewValues::parse("1,2,3,4,5,6,7"),
            Err(ReviewError::WrongCount { found: 7 })
        );
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(
            ReviewValues::parse("1,2,abc,4,5,6"),
            Err(ReviewError::NotNumeric {
                token: "abc".to_string()
            })
        );
        assert!(matches!(
            ReviewValues::parse(""),
            Err(ReviewError::NotNumeric { .. })
        ));
        assert!(matches!(
            ReviewValues::parse("1,2,3,,5,6"),
            Err(ReviewError::NotNumeric { .. })
        ));
    }

    #[test]
    fn rejects_non_finite() {
        assert!(matches!(
            ReviewValues::parse("1,2,NaN,4,5,6"),
            Err(ReviewError::NotFinite { .. })
        ));
        assert!(matches!(
            ReviewValues::parse("1,2,3,inf,5,6"),
            Err(ReviewError::NotFinite { .. })
        ));
    }

    #[test]
    fn inputs_take_hour_lat_lon_and_flags() {
        let values = ReviewValues::parse("18,30,28.5,77.1,1,2").unwrap();
        let flags = crate::config::ScoringDefaults::default().environment;

        let inputs = values.risk_inputs(Some(flags));
        assert!((inputs.hour - 18.0).abs() < f64::EPSILON);
        assert!((inputs.latitude - 28.5).abs() < f64::EPSILON);
        assert!((inputs.longitude - 77.1).abs() < f64::EPSILON);
        assert_eq!(inputs.environment, Some(flags));

        assert_eq!(values.risk_inputs(None).environment, None);
    }
}
