//! Batched multimodal inference over extracted cough segments
//!
//! Stacks the per-segment feature bundles into three aligned input tensors,
//! replicates the tabular patient row per segment so every window is scored
//! against identical context, runs the classifier once over the whole batch
//! and reduces the per-segment probabilities to a single audio risk score.

mod scaler;

pub use scaler::AgeScaler;

use crate::extractors::FeatureBundle;
use crate::params::{N_MELS, SEQ_FEATURES, TABULAR_FEATURES};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tbcare_common::types::Sex;
use tbcare_common::{Error, PatientRecord, Result};
use tracing::{debug, info};

/// Fixed-order tabular input row: scaled age, sex, then the seven symptom
/// flags in the column order the classifier was trained with
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRow(pub [f32; TABULAR_FEATURES]);

impl TabularRow {
    pub fn from_record(record: &PatientRecord, scaler: &AgeScaler) -> Self {
        let flag = |set: bool| if set { 1.0 } else { 0.0 };
        Self([
            scaler.transform(record.age as f64),
            match record.sex {
                Sex::Male => 1.0,
                Sex::Female => 0.0,
            },
            flag(record.prior_tb),
            flag(record.cough_over_two_weeks),
            flag(record.hemoptysis),
            flag(record.weight_loss),
            flag(record.fever),
            flag(record.night_sweats),
            flag(record.smoker),
        ])
    }
}

/// The trained multimodal classifier behind its ONNX session
///
/// Loaded once per process; the session is wrapped in a mutex because the
/// runtime requires exclusive access during a run, which serializes only the
/// inference call itself.
pub struct RiskModel {
    session: Mutex<Session>,
}

impl RiskModel {
    /// Load the exported classifier; failure here must abort startup
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "Loading multimodal classifier");

        let session = Session::builder()
            .map_err(|e| Error::Artifact(format!("Failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::Artifact(format!("Failed to set optimization level: {e}")))?
            .commit_from_file(path)
            .map_err(|e| {
                Error::Artifact(format!("Failed to load model {}: {e}", path.display()))
            })?;

        info!("Multimodal classifier loaded");
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Score every segment in one batched run; one probability per segment
    pub fn score_segments(&self, bundles: &[FeatureBundle], tabular: &TabularRow) -> Result<Vec<f32>> {
        if bundles.is_empty() {
            return Ok(Vec::new());
        }
        let batch = bundles.len();
        let frames = bundles[0].sequential.frames;

        let mut sequential = Vec::with_capacity(batch * frames * SEQ_FEATURES);
        let mut spatial = Vec::with_capacity(batch * N_MELS * frames);
        let mut tabular_batch = Vec::with_capacity(batch * TABULAR_FEATURES);
        for bundle in bundles {
            if bundle.sequential.frames != frames || bundle.spatial.frames != frames {
                return Err(Error::Internal(
                    "Segment frame counts diverge within one batch".to_string(),
                ));
            }
            sequential.extend_from_slice(&bundle.sequential.data);
            spatial.extend_from_slice(&bundle.spatial.data);
            tabular_batch.extend_from_slice(&tabular.0);
        }

        let sequential_input = Value::from_array(([batch, frames, SEQ_FEATURES], sequential))
            .map_err(|e| Error::Inference(format!("Failed to build sequential input: {e}")))?;
        let spatial_input = Value::from_array(([batch, N_MELS, frames, 1usize], spatial))
            .map_err(|e| Error::Inference(format!("Failed to build spatial input: {e}")))?;
        let tabular_input = Value::from_array(([batch, TABULAR_FEATURES], tabular_batch))
            .map_err(|e| Error::Inference(format!("Failed to build tabular input: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Internal("Classifier session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![sequential_input, spatial_input, tabular_input])
            .map_err(|e| Error::Inference(format!("Classifier run failed: {e}")))?;

        let output = outputs
            .iter()
            .next()
            .ok_or_else(|| Error::Inference("Classifier returned no outputs".to_string()))?;
        let tensor = output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference(format!("Failed to extract output tensor: {e}")))?;
        let probabilities: Vec<f32> = tensor.1.iter().copied().collect();

        if probabilities.len() != batch {
            return Err(Error::Inference(format!(
                "Expected {batch} probabilities, got {}",
                probabilities.len()
            )));
        }
        debug!(segments = batch, "Classifier batch scored");
        Ok(probabilities)
    }
}

/// Reduce per-segment probabilities to the request's audio risk score
///
/// Maximum across segments: a single strongly positive cough burst must not
/// be diluted by quiet or neutral windows. No segments scores as 0.0.
pub fn reduce_audio_score(probabilities: &[f32]) -> f32 {
    probabilities.iter().copied().fold(0.0f32, f32::max)
}
