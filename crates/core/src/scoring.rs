//! Clinical risk scoring.
//!
//! Each dimension is scored independently from one raw field. Scorers never fail: a
//! field that does not validate contributes `INVALID_FIELD_SCORE` and is surfaced
//! through `has_data_quality_issues` instead.

use crate::constants::*;
use crate::validation::{
    age_value, is_valid_age, is_valid_blood_pressure, is_valid_temperature, parse_blood_pressure,
    temperature_value,
};
use serde_json::Value;
use triage_types::{PatientAssessment, PatientRecord};

fn systolic_risk(systolic: i64) -> u8 {
    if systolic < NORMAL_SYSTOLIC_MAX_EXCLUSIVE {
        BP_NORMAL_SCORE
    } else if (ELEVATED_SYSTOLIC_MIN..=ELEVATED_SYSTOLIC_MAX).contains(&systolic) {
        BP_ELEVATED_SCORE
    } else if (STAGE1_SYSTOLIC_MIN..=STAGE1_SYSTOLIC_MAX).contains(&systolic) {
        BP_STAGE1_SCORE
    } else if systolic >= STAGE2_SYSTOLIC_MIN {
        BP_STAGE2_SCORE
    } else {
        BP_NORMAL_SCORE
    }
}

fn diastolic_risk(diastolic: i64) -> u8 {
    if diastolic < NORMAL_DIASTOLIC_MAX_EXCLUSIVE {
        BP_NORMAL_SCORE
    } else if (STAGE1_DIASTOLIC_MIN..=STAGE1_DIASTOLIC_MAX).contains(&diastolic) {
        BP_STAGE1_SCORE
    } else if diastolic >= STAGE2_DIASTOLIC_MIN {
        BP_STAGE2_SCORE
    } else {
        BP_NORMAL_SCORE
    }
}

/// Scores a blood pressure reading from 1 (normal) to 4 (stage 2).
///
/// Systolic and diastolic are staged separately and the more severe stage wins.
/// An unparseable reading scores 0.
pub fn blood_pressure_risk(raw: Option<&Value>) -> u8 {
    match parse_blood_pressure(raw) {
        Some(bp) => systolic_risk(bp.systolic).max(diastolic_risk(bp.diastolic)),
        None => INVALID_FIELD_SCORE,
    }
}

/// Scores a temperature: 0 normal, 1 low fever, 2 high fever.
///
/// Readings between bands (e.g. 99.55) score as normal.
pub fn temperature_risk(raw: Option<&Value>) -> u8 {
    let Some(temp) = temperature_value(raw) else {
        return INVALID_FIELD_SCORE;
    };

    if temp <= TEMP_NORMAL_MAX {
        TEMP_NORMAL_SCORE
    } else if (TEMP_LOW_FEVER_MIN..=TEMP_LOW_FEVER_MAX).contains(&temp) {
        TEMP_LOW_FEVER_SCORE
    } else if temp >= TEMP_HIGH_FEVER_MIN {
        TEMP_HIGH_FEVER_SCORE
    } else {
        TEMP_NORMAL_SCORE
    }
}

/// Scores an age: 1 up to 65, 2 from 66. An unparseable age scores 0.
pub fn age_risk(raw: Option<&Value>) -> u8 {
    let Some(age) = age_value(raw) else {
        return INVALID_FIELD_SCORE;
    };

    if age <= AGE_UNDER_40_MAX {
        AGE_UNDER_40_SCORE
    } else if (AGE_40_TO_65_MIN..=AGE_40_TO_65_MAX).contains(&age) {
        AGE_40_TO_65_SCORE
    } else if age >= AGE_OVER_65_MIN {
        AGE_OVER_65_SCORE
    } else {
        AGE_UNDER_40_SCORE
    }
}

pub fn total_risk(patient: &PatientRecord) -> u8 {
    blood_pressure_risk(patient.blood_pressure.as_ref())
        + temperature_risk(patient.temperature.as_ref())
        + age_risk(patient.age.as_ref())
}

pub fn has_fever(patient: &PatientRecord) -> bool {
    temperature_value(patient.temperature.as_ref()).is_some_and(|temp| temp >= FEVER_THRESHOLD)
}

/// True when blood pressure, temperature, or age fails validation.
///
/// The patient id is deliberately not checked.
pub fn has_data_quality_issues(patient: &PatientRecord) -> bool {
    !is_valid_blood_pressure(patient.blood_pressure.as_ref())
        || !is_valid_temperature(patient.temperature.as_ref())
        || !is_valid_age(patient.age.as_ref())
}

pub fn is_high_risk(patient: &PatientRecord) -> bool {
    total_risk(patient) >= HIGH_RISK_THRESHOLD
}

/// Computes every sub-score and flag for one patient in a single step.
pub fn assess(patient: &PatientRecord) -> PatientAssessment {
    let blood_pressure_risk = blood_pressure_risk(patient.blood_pressure.as_ref());
    let temperature_risk = temperature_risk(patient.temperature.as_ref());
    let age_risk = age_risk(patient.age.as_ref());
    let total_risk = blood_pressure_risk + temperature_risk + age_risk;

    PatientAssessment {
        blood_pressure_risk,
        temperature_risk,
        age_risk,
        total_risk,
        has_fever: has_fever(patient),
        has_data_quality_issues: has_data_quality_issues(patient),
        is_high_risk: total_risk >= HIGH_RISK_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient(bp: Value, temperature: Value, age: Value) -> PatientRecord {
        serde_json::from_value(json!({
            "patient_id": "DEMO001",
            "blood_pressure": bp,
            "temperature": temperature,
            "age": age,
        }))
        .expect("deserialize patient")
    }

    fn bp(systolic: i64, diastolic: i64) -> u8 {
        blood_pressure_risk(Some(&json!(format!("{systolic}/{diastolic}"))))
    }

    #[test]
    fn test_blood_pressure_stages() {
        assert_eq!(bp(110, 70), 1);
        assert_eq!(bp(125, 70), 2);
        assert_eq!(bp(135, 70), 3);
        assert_eq!(bp(150, 70), 4);
        assert_eq!(bp(110, 85), 3);
        assert_eq!(bp(110, 95), 4);
    }

    #[test]
    fn test_blood_pressure_takes_more_severe_stage() {
        assert_eq!(bp(125, 85), 3);
        assert_eq!(bp(145, 85), 4);
        assert_eq!(bp(135, 95), 4);
    }

    #[test]
    fn test_blood_pressure_is_max_of_components_and_monotonic() {
        let values: Vec<i64> = (60..=200).step_by(5).collect();
        for &systolic in &values {
            for &diastolic in &values {
                let score = bp(systolic, diastolic);
                assert_eq!(score, systolic_risk(systolic).max(diastolic_risk(diastolic)));
                assert!(bp(systolic + 5, diastolic) >= score);
                assert!(bp(systolic, diastolic + 5) >= score);
            }
        }
    }

    #[test]
    fn test_blood_pressure_invalid_scores_zero() {
        assert_eq!(blood_pressure_risk(Some(&json!("INVALID"))), 0);
        assert_eq!(blood_pressure_risk(Some(&json!("150/"))), 0);
        assert_eq!(blood_pressure_risk(None), 0);
    }

    #[test]
    fn test_temperature_boundaries() {
        assert_eq!(temperature_risk(Some(&json!(99.5))), 0);
        assert_eq!(temperature_risk(Some(&json!(99.6))), 1);
        assert_eq!(temperature_risk(Some(&json!(100.9))), 1);
        assert_eq!(temperature_risk(Some(&json!(101.0))), 2);
        assert_eq!(temperature_risk(Some(&json!("101.0"))), 2);
    }

    #[test]
    fn test_temperature_between_bands_scores_normal() {
        assert_eq!(temperature_risk(Some(&json!(99.55))), 0);
        assert_eq!(temperature_risk(Some(&json!(100.95))), 0);
    }

    #[test]
    fn test_temperature_invalid_scores_zero() {
        assert_eq!(temperature_risk(Some(&json!("TEMP_ERROR"))), 0);
        assert_eq!(temperature_risk(Some(&json!(null))), 0);
        assert_eq!(temperature_risk(None), 0);
    }

    #[test]
    fn test_age_bands() {
        assert_eq!(age_risk(Some(&json!(25))), 1);
        assert_eq!(age_risk(Some(&json!(39))), 1);
        assert_eq!(age_risk(Some(&json!(40))), 1);
        assert_eq!(age_risk(Some(&json!(65))), 1);
        assert_eq!(age_risk(Some(&json!(66))), 2);
        assert_eq!(age_risk(Some(&json!("80"))), 2);
    }

    #[test]
    fn test_age_invalid_scores_zero_like_other_dimensions() {
        assert_eq!(age_risk(Some(&json!("fifty-three"))), 0);
        assert_eq!(age_risk(Some(&json!(""))), 0);
        assert_eq!(age_risk(None), 0);
    }

    #[test]
    fn test_has_fever_tracks_valid_temperatures() {
        for temp in [98.6, 99.5, 99.6, 100.0, 101.5] {
            let p = patient(json!("120/80"), json!(temp), json!(30));
            assert_eq!(has_fever(&p), temperature_risk(Some(&json!(temp))) >= 1);
        }

        let invalid = patient(json!("120/80"), json!("TEMP_ERROR"), json!(30));
        assert!(!has_fever(&invalid));
    }

    #[test]
    fn test_high_risk_threshold() {
        // 2 + 0 + 1
        let three = patient(json!("125/70"), json!(98.6), json!(30));
        assert_eq!(total_risk(&three), 3);
        assert!(!is_high_risk(&three));

        // 3 + 0 + 1
        let four = patient(json!("135/70"), json!(98.6), json!(30));
        assert_eq!(total_risk(&four), 4);
        assert!(is_high_risk(&four));
    }

    #[test]
    fn test_data_quality_ignores_patient_id() {
        let mut p = patient(json!("120/80"), json!(98.6), json!(30));
        p.patient_id = None;
        assert!(!has_data_quality_issues(&p));

        p.age = Some(json!("unknown"));
        assert!(has_data_quality_issues(&p));
    }

    #[test]
    fn test_assess_high_risk_febrile_patient() {
        let p1 = patient(json!("150/95"), json!("101.2"), json!("70"));
        let assessment = assess(&p1);

        assert_eq!(assessment.blood_pressure_risk, 4);
        assert_eq!(assessment.temperature_risk, 2);
        assert_eq!(assessment.age_risk, 2);
        assert_eq!(assessment.total_risk, 8);
        assert!(assessment.is_high_risk);
        assert!(assessment.has_fever);
        assert!(!assessment.has_data_quality_issues);
    }

    #[test]
    fn test_assess_malformed_blood_pressure_patient() {
        let p2 = patient(json!("bad"), json!("98.0"), json!("30"));
        let assessment = assess(&p2);

        assert_eq!(assessment.blood_pressure_risk, 0);
        assert_eq!(assessment.temperature_risk, 0);
        assert_eq!(assessment.age_risk, 1);
        assert_eq!(assessment.total_risk, 1);
        assert!(!assessment.is_high_risk);
        assert!(!assessment.has_fever);
        assert!(assessment.has_data_quality_issues);
    }

    #[test]
    fn test_assess_matches_individual_scorers() {
        let p = patient(json!("138/88"), json!(100.1), json!(52));
        let assessment = assess(&p);
        assert_eq!(assessment.total_risk, total_risk(&p));
        assert_eq!(assessment.is_high_risk, is_high_risk(&p));
        assert_eq!(assessment.has_fever, has_fever(&p));
        assert_eq!(assessment.has_data_quality_issues, has_data_quality_issues(&p));
    }
}
