//! Screening policy integration tests
//!
//! Exercise the clinical scoring, reduction and fusion layers together, the
//! way `ScreeningContext::screen` composes them, without the trained
//! classifier artifact.

use tbcare_common::types::{recommendation_text, FusionRationale, RiskClassification, Sex};
use tbcare_common::PatientRecord;
use tbcare_engine::clinical::calculate_clinical_score;
use tbcare_engine::fusion::{classify, fuse};
use tbcare_engine::inference::reduce_audio_score;
use tbcare_engine::params::{RED_FLAG_PROBABILITY, RISK_THRESHOLD};

fn record_with(f: impl FnOnce(&mut PatientRecord)) -> PatientRecord {
    let mut record = PatientRecord {
        age: 30,
        sex: Sex::Male,
        prior_tb: false,
        cough_over_two_weeks: false,
        hemoptysis: false,
        weight_loss: false,
        fever: false,
        night_sweats: false,
        smoker: false,
    };
    f(&mut record);
    record
}

#[test]
fn asymptomatic_patient_with_moderate_audio_scores_negative() {
    // age 30, every flag false, audio score 0.5
    let record = record_with(|_| {});
    let clinical = calculate_clinical_score(&record);
    assert_eq!(clinical, 0.0);

    let audio = reduce_audio_score(&[0.1, 0.5, 0.32]);
    assert_eq!(audio, 0.5);

    let fused = fuse(clinical, audio, record.hemoptysis);
    assert!((fused.probability - 0.20).abs() < 1e-7);
    assert_eq!(fused.rationale, FusionRationale::WeightedBlend);
    assert_eq!(classify(fused.probability), RiskClassification::Negative);
}

#[test]
fn hemoptysis_forces_positive_regardless_of_everything_else() {
    let record = record_with(|r| r.hemoptysis = true);
    let clinical = calculate_clinical_score(&record);

    for audio in [0.0, 0.13, 1.0] {
        let fused = fuse(clinical, audio, record.hemoptysis);
        assert_eq!(fused.probability, RED_FLAG_PROBABILITY);
        assert_eq!(fused.rationale, FusionRationale::RedFlagOverride);
        assert_eq!(classify(fused.probability), RiskClassification::Positive);
    }

    let text = recommendation_text(RiskClassification::Positive, true);
    assert!(text.contains("Coughing blood"));
}

#[test]
fn unusable_audio_degrades_to_clinical_only() {
    // Heavy questionnaire, no scoreable audio: audio term contributes zero
    let record = record_with(|r| {
        r.cough_over_two_weeks = true;
        r.weight_loss = true;
        r.night_sweats = true;
        r.fever = true;
    });
    let clinical = calculate_clinical_score(&record);
    assert!((clinical - 0.55).abs() < 1e-6);

    let audio = reduce_audio_score(&[]);
    assert_eq!(audio, 0.0);

    let fused = fuse(clinical, audio, record.hemoptysis);
    assert!((fused.probability - 0.33).abs() < 1e-6);
    assert_eq!(classify(fused.probability), RiskClassification::Negative);
}

#[test]
fn blend_can_cross_the_threshold_with_audio_evidence() {
    let record = record_with(|r| {
        r.cough_over_two_weeks = true;
        r.weight_loss = true;
        r.night_sweats = true;
        r.fever = true;
    });
    let clinical = calculate_clinical_score(&record);

    // 0.55 * 0.6 = 0.33 alone; strong audio pushes it past 0.4771
    let fused = fuse(clinical, 0.9, record.hemoptysis);
    assert!((fused.probability - 0.69).abs() < 1e-6);
    assert_eq!(classify(fused.probability), RiskClassification::Positive);

    let text = recommendation_text(RiskClassification::Positive, false);
    assert!(text.contains("sputum"));
}

#[test]
fn threshold_is_exclusive_at_the_boundary() {
    assert_eq!(classify(RISK_THRESHOLD), RiskClassification::Negative);
    assert_eq!(classify(0.4772), RiskClassification::Positive);
}

#[test]
fn max_reduction_matches_strongest_segment() {
    // A single strong cough burst among neutral windows dominates
    let probabilities = [0.05, 0.08, 0.91, 0.11];
    assert_eq!(reduce_audio_score(&probabilities), 0.91);
}
