use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One month's climate readings, the full input of the classifier.
///
/// Domains are inclusive on both ends and are enforced by [`validate`]
/// before any inference is attempted. Non-finite values fail the range
/// checks and are rejected like any other out-of-domain input.
///
/// [`validate`]: ClimateReading::validate
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ClimateReading {
    pub relative_humidity_percent: f32,
    pub wind_speed_kmh: f32,
    pub temperature_celsius: f32,
}

pub const HUMIDITY_RANGE: (f32, f32) = (20.0, 100.0);
pub const WIND_RANGE: (f32, f32) = (0.0, 40.0);
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 45.0);

impl ClimateReading {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            ("relative_humidity_percent", self.relative_humidity_percent, HUMIDITY_RANGE),
            ("wind_speed_kmh", self.wind_speed_kmh, WIND_RANGE),
            ("temperature_celsius", self.temperature_celsius, TEMPERATURE_RANGE),
        ];

        for (field, value, (min, max)) in checks {
            if !(min..=max).contains(&value) {
                return Err(ValidationError { field, value, min, max });
            }
        }

        Ok(())
    }

    /// Feature vector in the order the model was trained on:
    /// humidity, wind, temperature.
    pub fn to_array(&self) -> [f32; 3] {
        [
            self.relative_humidity_percent,
            self.wind_speed_kmh,
            self.temperature_celsius,
        ]
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLabel {
    Low,
    ModerateOrHigh,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PredictionResult {
    pub risk_label: RiskLabel,
    /// Calibrated probability of the predicted class.
    pub confidence: f32,
    /// Calibrated probability of the MODERATE_OR_HIGH class, regardless of
    /// which label won.
    pub risk_probability: f32,
    pub advice: String,
}

impl PredictionResult {
    pub fn new(risk_label: RiskLabel, confidence: f32, risk_probability: f32) -> Self {
        let advice = match risk_label {
            RiskLabel::ModerateOrHigh => {
                "Caution: current readings resemble months with high fire activity."
            }
            RiskLabel::Low => "Stable conditions, no high-risk alert.",
        };

        PredictionResult {
            risk_label,
            confidence,
            risk_probability,
            advice: advice.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: &str) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(humidity: f32, wind: f32, temperature: f32) -> ClimateReading {
        ClimateReading {
            relative_humidity_percent: humidity,
            wind_speed_kmh: wind,
            temperature_celsius: temperature,
        }
    }

    #[test]
    fn accepts_inclusive_lower_bounds() {
        assert!(reading(20.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn accepts_inclusive_upper_bounds() {
        assert!(reading(100.0, 40.0, 45.0).validate().is_ok());
    }

    #[test]
    fn rejects_humidity_below_domain() {
        let err = reading(19.0, 10.0, 25.0).validate().unwrap_err();
        assert_eq!(err.field, "relative_humidity_percent");
        assert_eq!(err.min, 20.0);
        assert_eq!(err.max, 100.0);
    }

    #[test]
    fn rejects_temperature_above_domain() {
        let err = reading(50.0, 10.0, 46.0).validate().unwrap_err();
        assert_eq!(err.field, "temperature_celsius");
        assert_eq!(err.max, 45.0);
    }

    #[test]
    fn rejects_wind_above_domain() {
        let err = reading(50.0, 40.5, 25.0).validate().unwrap_err();
        assert_eq!(err.field, "wind_speed_kmh");
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(reading(f32::NAN, 10.0, 25.0).validate().is_err());
        assert!(reading(50.0, f32::INFINITY, 25.0).validate().is_err());
    }

    #[test]
    fn feature_order_is_humidity_wind_temperature() {
        assert_eq!(reading(55.0, 12.0, 30.0).to_array(), [55.0, 12.0, 30.0]);
    }

    #[test]
    fn risk_labels_serialize_screaming_snake() {
        assert_eq!(
            serde_json::to_value(RiskLabel::Low).unwrap(),
            serde_json::json!("LOW")
        );
        assert_eq!(
            serde_json::to_value(RiskLabel::ModerateOrHigh).unwrap(),
            serde_json::json!("MODERATE_OR_HIGH")
        );
    }

    #[test]
    fn envelope_carries_data_or_error() {
        let ok = ApiResponse::success(1);
        assert!(ok.success);
        assert_eq!(ok.data, Some(1));
        assert!(ok.error.is_none());

        let err = ApiResponse::<i32>::error("bad input");
        assert!(!err.success);
        assert!(err.data.is_none());
        assert_eq!(err.error.as_deref(), Some("bad input"));
    }
}
