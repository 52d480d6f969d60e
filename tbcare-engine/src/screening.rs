//! Screening orchestration
//!
//! [`ScreeningContext`] owns the process-wide read-only resources: the
//! classifier session and the fitted age scaler, loaded exactly once at
//! process start and passed by reference into every request. [`screen`]
//! runs one analysis request start to finish.
//!
//! [`screen`]: ScreeningContext::screen

use crate::audio::{AudioChunker, AudioOutcome};
use crate::clinical;
use crate::fusion;
use crate::inference::{reduce_audio_score, AgeScaler, RiskModel, TabularRow};
use chrono::Utc;
use tbcare_common::config::EngineConfig;
use tbcare_common::types::{recommendation_text, AudioStatus, FusionRationale, ScreeningReport};
use tbcare_common::{PatientRecord, Result};
use tracing::info;
use uuid::Uuid;

/// Process-wide screening resources, constructed once at startup
pub struct ScreeningContext {
    model: RiskModel,
    age_scaler: AgeScaler,
    chunker: AudioChunker,
}

impl ScreeningContext {
    /// Load the model and scaler artifacts
    ///
    /// Any failure here is fatal: the caller must not serve requests without
    /// a fully initialized context.
    pub fn initialize(config: &EngineConfig) -> Result<Self> {
        let model = RiskModel::load(&config.model_path)?;
        let age_scaler = AgeScaler::load(&config.scaler_path)?;
        info!("Screening context initialized");
        Ok(Self {
            model,
            age_scaler,
            chunker: AudioChunker::new(),
        })
    }

    /// Run one screening request
    ///
    /// `audio_bytes` is a complete uploaded recording (WAV/MP3/OGG); the
    /// collaborator rejects requests without an upload before calling in.
    /// Unusable audio is not an error: the request degrades to a
    /// clinical-only assessment with a zero audio term.
    pub fn screen(&self, record: &PatientRecord, audio_bytes: &[u8]) -> Result<ScreeningReport> {
        let request_id = Uuid::new_v4();
        let clinical_score = clinical::calculate_clinical_score(record);

        let (audio_score, audio_status) = match self.chunker.process(audio_bytes) {
            AudioOutcome::Features(bundles) => {
                let tabular = TabularRow::from_record(record, &self.age_scaler);
                let probabilities = self.model.score_segments(&bundles, &tabular)?;
                (
                    reduce_audio_score(&probabilities),
                    AudioStatus::Scored {
                        segments: bundles.len(),
                    },
                )
            }
            AudioOutcome::Unusable(reason) => (
                0.0,
                AudioStatus::Unusable {
                    reason: reason.to_string(),
                },
            ),
        };

        let fused = fusion::fuse(clinical_score, audio_score, record.hemoptysis);
        let classification = fusion::classify(fused.probability);
        let recommendation = recommendation_text(
            classification,
            fused.rationale == FusionRationale::RedFlagOverride,
        );

        info!(
            %request_id,
            clinical_score,
            audio_score,
            final_probability = fused.probability,
            classification = %classification,
            "Screening complete"
        );

        Ok(ScreeningReport {
            request_id,
            analyzed_at: Utc::now(),
            clinical_score,
            audio_score,
            final_probability: fused.probability,
            classification,
            rationale: fused.rationale,
            audio: audio_status,
            recommendation,
        })
    }
}
