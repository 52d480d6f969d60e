//! Screening boundary types
//!
//! The contract between the screening engine and the enclosing collaborator:
//! validated questionnaire data and an uploaded recording in, a renderable
//! screening report out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Patient sex as captured on the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// Questionnaire answers for one screening request
///
/// The collaborator validates field ranges before construction (age 1-100);
/// the record is immutable once submitted and consumed by a single analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years (1-100)
    pub age: u8,
    pub sex: Sex,
    /// Previously treated for TB
    pub prior_tb: bool,
    /// Cough persisting longer than two weeks
    pub cough_over_two_weeks: bool,
    /// Coughing blood
    pub hemoptysis: bool,
    /// Drastic weight loss
    pub weight_loss: bool,
    /// Fever or chills
    pub fever: bool,
    /// Night sweats
    pub night_sweats: bool,
    /// Active or passive smoker
    pub smoker: bool,
}

/// Threshold classification of the fused probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskClassification {
    Positive,
    Negative,
}

impl std::fmt::Display for RiskClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskClassification::Positive => write!(f, "Positive"),
            RiskClassification::Negative => write!(f, "Negative"),
        }
    }
}

/// Which branch of the fusion policy produced the final probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusionRationale {
    /// Hemoptysis forces a high-risk result regardless of the scores
    RedFlagOverride,
    /// Weighted blend of the clinical and audio scores
    WeightedBlend,
}

/// Whether the uploaded recording produced scoreable segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioStatus {
    /// This many windows survived the silence gate and were scored
    Scored { segments: usize },
    /// Nothing scoreable; the audio term contributed zero to the fusion
    Unusable { reason: String },
}

/// Final screening result for one request
///
/// Carries the per-source score breakdown alongside the fused decision so the
/// collaborator can render the assessment transparently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub request_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    /// Rule-based questionnaire score (0.0-1.0)
    pub clinical_score: f32,
    /// Model-derived cough score (0.0-1.0); 0.0 when audio was unusable
    pub audio_score: f32,
    /// Fused decision probability (0.0-1.0)
    pub final_probability: f32,
    pub classification: RiskClassification,
    pub rationale: FusionRationale,
    pub audio: AudioStatus,
    /// Human-readable next-step advice
    pub recommendation: String,
}

impl ScreeningReport {
    /// Final probability as a display percentage
    pub fn risk_percent(&self) -> f32 {
        self.final_probability * 100.0
    }
}

/// Next-step advice keyed off the classification and the red-flag state
pub fn recommendation_text(classification: RiskClassification, red_flag: bool) -> String {
    if red_flag {
        return "Coughing blood detected; treated as high risk. Seek sputum (molecular) testing \
                at the nearest health facility immediately."
            .to_string();
    }
    match classification {
        RiskClassification::Positive => {
            "Strong indication of TB risk. Arrange sputum (molecular) testing at the nearest \
             health facility promptly."
                .to_string()
        }
        RiskClassification::Negative => {
            "No strong indication of TB found. Maintain general health and wear a mask while \
             the cough persists."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PatientRecord {
        PatientRecord {
            age: 25,
            sex: Sex::Female,
            prior_tb: false,
            cough_over_two_weeks: false,
            hemoptysis: false,
            weight_loss: false,
            fever: false,
            night_sweats: false,
            smoker: false,
        }
    }

    #[test]
    fn test_recommendation_red_flag_wins() {
        let text = recommendation_text(RiskClassification::Positive, true);
        assert!(text.contains("Coughing blood"));
    }

    #[test]
    fn test_recommendation_by_classification() {
        let positive = recommendation_text(RiskClassification::Positive, false);
        let negative = recommendation_text(RiskClassification::Negative, false);
        assert!(positive.contains("sputum"));
        assert!(negative.contains("No strong indication"));
        assert_ne!(positive, negative);
    }

    #[test]
    fn test_report_serializes_round_trip() {
        let report = ScreeningReport {
            request_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            clinical_score: 0.35,
            audio_score: 0.5,
            final_probability: 0.41,
            classification: RiskClassification::Negative,
            rationale: FusionRationale::WeightedBlend,
            audio: AudioStatus::Scored { segments: 4 },
            recommendation: recommendation_text(RiskClassification::Negative, false),
        };

        let json = serde_json::to_string(&report).unwrap();
        let back: ScreeningReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.classification, RiskClassification::Negative);
        assert_eq!(back.audio, AudioStatus::Scored { segments: 4 });
        assert!((back.risk_percent() - 41.0).abs() < 1e-4);
    }

    #[test]
    fn test_patient_record_serializes() {
        let json = serde_json::to_string(&record()).unwrap();
        let back: PatientRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.age, 25);
        assert_eq!(back.sex, Sex::Female);
        assert!(!back.hemoptysis);
    }
}
