//! Risk fusion policy
//!
//! Blends the rule-based clinical score with the model-derived audio score
//! into one decision probability. Hemoptysis is a red flag severe enough to
//! bypass the blend entirely and force a high-risk result.

use crate::params::{AUDIO_WEIGHT, CLINICAL_WEIGHT, RED_FLAG_PROBABILITY, RISK_THRESHOLD};
use tbcare_common::types::{FusionRationale, RiskClassification};
use tracing::debug;

/// Fused decision probability with its rationale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedRisk {
    pub probability: f32,
    pub rationale: FusionRationale,
}

/// Combine the two scores into the final decision probability
pub fn fuse(clinical_score: f32, audio_score: f32, hemoptysis: bool) -> FusedRisk {
    if hemoptysis {
        debug!("Hemoptysis red flag set, overriding fused probability");
        return FusedRisk {
            probability: RED_FLAG_PROBABILITY,
            rationale: FusionRationale::RedFlagOverride,
        };
    }
    FusedRisk {
        probability: clinical_score * CLINICAL_WEIGHT + audio_score * AUDIO_WEIGHT,
        rationale: FusionRationale::WeightedBlend,
    }
}

/// Classify against the calibrated decision threshold (strictly greater)
pub fn classify(probability: f32) -> RiskClassification {
    if probability > RISK_THRESHOLD {
        RiskClassification::Positive
    } else {
        RiskClassification::Negative
    }
}
