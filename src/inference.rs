//! ONNX inference for the fire-risk classifier.
//!
//! The artifact is trained and calibrated elsewhere; this module loads it
//! once at startup and treats it as immutable for the life of the process.

use std::path::Path;

use serde::Serialize;
use tract_onnx::prelude::*;

use crate::error::{ModelError, PredictError};
use crate::models::{ClimateReading, PredictionResult, RiskLabel};

type RunnableOnnx = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

pub const DEFAULT_THRESHOLD: f32 = 0.5;
pub const MODEL_VERSION: &str = "1.0.0";

pub const FEATURE_NAMES: [&str; 3] = [
    "relative_humidity_percent",
    "wind_speed_kmh",
    "temperature_celsius",
];

#[derive(Debug)]
pub struct RiskModel {
    plan: RunnableOnnx,
    threshold: f32,
}

impl RiskModel {
    /// Loads the serialized classifier, pinning the input to a single
    /// `[1, 3]` f32 feature row. Fails with `ModelError::Unavailable` when
    /// the artifact is missing or corrupt; callers treat that as fatal.
    pub fn load<P: AsRef<Path>>(model_path: P, threshold: f32) -> Result<Self, ModelError> {
        let path = model_path.as_ref();
        let plan = build_plan(path).map_err(|e| ModelError::Unavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { plan, threshold })
    }

    /// Validates the reading, then runs one evaluation of the loaded plan.
    /// Out-of-domain input is rejected before any inference is attempted.
    pub fn predict(&self, reading: &ClimateReading) -> Result<PredictionResult, PredictError> {
        reading.validate()?;

        let features = reading.to_array();
        let input = Tensor::from_shape(&[1, 3], &features).map_err(evaluation_error)?;
        let outputs = self.plan.run(tvec!(input.into())).map_err(evaluation_error)?;

        let scores: Vec<f32> = outputs
            .first()
            .ok_or(ModelError::EmptyOutput)?
            .to_array_view::<f32>()
            .map_err(evaluation_error)?
            .iter()
            .copied()
            .collect();

        let probability = positive_class_probability(&scores)?;
        Ok(classify(probability, self.threshold))
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            input_shape: vec![1, 3],
            threshold: self.threshold,
            version: MODEL_VERSION.to_string(),
            features: FEATURE_NAMES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

fn build_plan(path: &Path) -> TractResult<RunnableOnnx> {
    tract_onnx::onnx()
        .model_for_path(path)?
        .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3)))?
        .into_optimized()?
        .into_runnable()
}

fn evaluation_error<E: std::fmt::Display>(e: E) -> ModelError {
    ModelError::Evaluation { reason: e.to_string() }
}

/// Calibrated binary classifiers emit `[p_low, p_high]`; some exports
/// collapse to a single positive-class probability. Index 1 is the positive
/// class. The result is clamped to [0, 1].
fn positive_class_probability(scores: &[f32]) -> Result<f32, ModelError> {
    let p = match scores {
        [] => return Err(ModelError::EmptyOutput),
        [single] => *single,
        [_, positive, ..] => *positive,
    };

    Ok(p.clamp(0.0, 1.0))
}

/// The decision function: MODERATE_OR_HIGH only when the calibrated
/// positive-class probability exceeds the threshold; a tie lands on LOW.
/// Confidence is the probability of whichever class won.
pub fn classify(probability: f32, threshold: f32) -> PredictionResult {
    if probability > threshold {
        PredictionResult::new(RiskLabel::ModerateOrHigh, probability, probability)
    } else {
        PredictionResult::new(RiskLabel::Low, 1.0 - probability, probability)
    }
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub input_shape: Vec<i32>,
    pub threshold: f32,
    pub version: String,
    pub features: Vec<String>,
}
