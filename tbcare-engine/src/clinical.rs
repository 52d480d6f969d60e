//! Rule-based clinical risk scoring
//!
//! Point-additive weighting of the intake questionnaire, normalized to
//! [0, 1]. The weights encode symptom priority for pulmonary TB and are
//! fixed alongside the rest of the calibrated parameters.

use tbcare_common::PatientRecord;

/// Symptom and risk-factor weights (points out of 100)
const HEMOPTYSIS_POINTS: u32 = 30;
const WEIGHT_LOSS_POINTS: u32 = 20;
const NIGHT_SWEATS_POINTS: u32 = 15;
const PROLONGED_COUGH_POINTS: u32 = 15;
const PRIOR_TB_POINTS: u32 = 10;
const FEVER_POINTS: u32 = 5;
const SMOKING_POINTS: u32 = 5;
const AGE_BRACKET_POINTS: u32 = 5;

/// Compute the normalized clinical risk score
///
/// Raw points top out at 105; the normalized score saturates at 1.0.
pub fn calculate_clinical_score(record: &PatientRecord) -> f32 {
    let mut points = 0u32;

    if record.hemoptysis {
        points += HEMOPTYSIS_POINTS;
    }
    if record.weight_loss {
        points += WEIGHT_LOSS_POINTS;
    }
    if record.night_sweats {
        points += NIGHT_SWEATS_POINTS;
    }
    if record.cough_over_two_weeks {
        points += PROLONGED_COUGH_POINTS;
    }
    if record.prior_tb {
        points += PRIOR_TB_POINTS;
    }
    if record.fever {
        points += FEVER_POINTS;
    }
    if record.smoker {
        points += SMOKING_POINTS;
    }
    if record.age > 60 || record.age < 5 {
        points += AGE_BRACKET_POINTS;
    }

    (points as f32 / 100.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tbcare_common::types::Sex;

    fn record_with(f: impl FnOnce(&mut PatientRecord)) -> PatientRecord {
        let mut record = PatientRecord {
            age: 30,
            sex: Sex::Female,
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
    fn test_no_symptoms_scores_zero() {
        assert_eq!(calculate_clinical_score(&record_with(|_| {})), 0.0);
    }

    #[test]
    fn test_individual_weights() {
        let cases: [(fn(&mut PatientRecord), f32); 7] = [
            (|r| r.hemoptysis = true, 0.30),
            (|r| r.weight_loss = true, 0.20),
            (|r| r.night_sweats = true, 0.15),
            (|r| r.cough_over_two_weeks = true, 0.15),
            (|r| r.prior_tb = true, 0.10),
            (|r| r.fever = true, 0.05),
            (|r| r.smoker = true, 0.05),
        ];
        for (set, expected) in cases {
            let score = calculate_clinical_score(&record_with(set));
            assert!((score - expected).abs() < 1e-6, "expected {expected}, got {score}");
        }
    }

    #[test]
    fn test_age_brackets() {
        assert_eq!(calculate_clinical_score(&record_with(|r| r.age = 4)), 0.05);
        assert_eq!(calculate_clinical_score(&record_with(|r| r.age = 5)), 0.0);
        assert_eq!(calculate_clinical_score(&record_with(|r| r.age = 60)), 0.0);
        assert_eq!(calculate_clinical_score(&record_with(|r| r.age = 61)), 0.05);
    }

    #[test]
    fn test_full_house_saturates_at_one() {
        // All symptoms plus the extreme age bracket: 105 raw points
        let record = record_with(|r| {
            r.age = 70;
            r.prior_tb = true;
            r.cough_over_two_weeks = true;
            r.hemoptysis = true;
            r.weight_loss = true;
            r.fever = true;
            r.night_sweats = true;
            r.smoker = true;
        });
        assert_eq!(calculate_clinical_score(&record), 1.0);
    }

    #[test]
    fn test_score_stays_in_range_for_all_flag_combinations() {
        for mask in 0u32..128 {
            for age in [4u8, 30, 70] {
                let record = record_with(|r| {
                    r.age = age;
                    r.prior_tb = mask & 1 != 0;
                    r.cough_over_two_weeks = mask & 2 != 0;
                    r.hemoptysis = mask & 4 != 0;
                    r.weight_loss = mask & 8 != 0;
                    r.fever = mask & 16 != 0;
                    r.night_sweats = mask & 32 != 0;
                    r.smoker = mask & 64 != 0;
                });
                let score = calculate_clinical_score(&record);
                assert!((0.0..=1.0).contains(&score), "mask {mask} age {age}: {score}");
            }
        }
    }
}
