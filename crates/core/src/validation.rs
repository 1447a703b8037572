//! Field validation for raw patient records.
//!
//! The clinical data API delivers loosely-typed values: numbers, numeric strings,
//! strings with trailing units, `null`, or nothing at all. Everything here is a pure
//! predicate or parser over a raw JSON value. Numeric parsing is prefix-based, so
//! `"120abc"` reads as `120` and `"98.6F"` reads as `98.6`; a value with no leading
//! number is invalid.

use crate::constants::BLOOD_PRESSURE_SEPARATOR;
use serde_json::Value;
use triage_types::PatientRecord;

/// A parsed systolic/diastolic reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: i64,
    pub diastolic: i64,
}

/// Parses the leading integer of `input`.
///
/// Leading whitespace and a single `+`/`-` sign are accepted; parsing stops at the
/// first non-digit. Returns `None` when no digit follows. Values beyond `i64` saturate.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude = rest.as_bytes()[..digits].iter().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}

/// Parses the leading decimal number of `input`.
///
/// Accepts leading whitespace, an optional sign, digits with an optional fractional
/// part, an optional exponent, or the literal `Infinity`. Parsing stops at the first
/// character that cannot extend the number.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            end = 1;
            true
        }
        Some(b'+') => {
            end = 1;
            false
        }
        _ => false,
    };

    if s[end..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_digits = count_digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn is_present(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Reads a temperature as a float; `None` when the value is absent or not numeric.
pub fn temperature_value(raw: Option<&Value>) -> Option<f64> {
    if !is_present(raw) {
        return None;
    }

    match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

/// Reads an age as a whole number of years; fractional numbers are truncated.
pub fn age_value(raw: Option<&Value>) -> Option<i64> {
    if !is_present(raw) {
        return None;
    }

    match raw? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Parses a `"SYSTOLIC/DIASTOLIC"` reading.
///
/// Returns `None` unless the value is a non-empty string with exactly one separator
/// and both halves start with an integer.
pub fn parse_blood_pressure(raw: Option<&Value>) -> Option<BloodPressure> {
    let text = match raw {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => return None,
    };

    let (systolic, diastolic) = text.split_once(BLOOD_PRESSURE_SEPARATOR)?;
    if diastolic.contains(BLOOD_PRESSURE_SEPARATOR) {
        return None;
    }

    Some(BloodPressure {
        systolic: parse_int_prefix(systolic)?,
        diastolic: parse_int_prefix(diastolic)?,
    })
}

pub fn is_valid_blood_pressure(raw: Option<&Value>) -> bool {
    parse_blood_pressure(raw).is_some()
}

pub fn is_valid_temperature(raw: Option<&Value>) -> bool {
    temperature_value(raw).is_some()
}

pub fn is_valid_age(raw: Option<&Value>) -> bool {
    age_value(raw).is_some()
}

/// Checks that all four required fields are present.
///
/// Presence only: a field holding `"garbage"` still counts.
pub fn is_valid_patient(record: &PatientRecord) -> bool {
    record.patient_id.is_some()
        && record.blood_pressure.is_some()
        && record.temperature.is_some()
        && record.age.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_int_prefix_reads_leading_digits() {
        assert_eq!(parse_int_prefix("120"), Some(120));
        assert_eq!(parse_int_prefix("120abc"), Some(120));
        assert_eq!(parse_int_prefix("  80 "), Some(80));
        assert_eq!(parse_int_prefix("-5"), Some(-5));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("45.9"), Some(45));
    }

    #[test]
    fn test_parse_int_prefix_rejects_non_numeric() {
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("fifty-three"), None);
    }

    #[test]
    fn test_parse_float_prefix_reads_leading_number() {
        assert_eq!(parse_float_prefix("98.6"), Some(98.6));
        assert_eq!(parse_float_prefix("101.2F"), Some(101.2));
        assert_eq!(parse_float_prefix(" 99"), Some(99.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("100."), Some(100.0));
        assert_eq!(parse_float_prefix("1e2"), Some(100.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_float_prefix_rejects_non_numeric() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("TEMP_ERROR"), None);
        assert_eq!(parse_float_prefix("N/A"), None);
    }

    #[test]
    fn test_parse_blood_pressure_recovers_both_integers() {
        for (systolic, diastolic) in [(0, 0), (90, 60), (120, 80), (145, 95), (300, 200)] {
            let raw = json!(format!("{systolic}/{diastolic}"));
            assert_eq!(
                parse_blood_pressure(Some(&raw)),
                Some(BloodPressure {
                    systolic,
                    diastolic
                })
            );

            let with_suffix = json!(format!("{systolic}mmHg/{diastolic} mmHg"));
            assert_eq!(
                parse_blood_pressure(Some(&with_suffix)),
                Some(BloodPressure {
                    systolic,
                    diastolic
                })
            );
        }
    }

    #[test]
    fn test_blood_pressure_rejects_malformed_readings() {
        for raw in [
            json!("150/"),
            json!("/90"),
            json!("INVALID"),
            json!("120/80/60"),
            json!(""),
            json!(12080),
            json!(null),
            json!(["120", "80"]),
        ] {
            assert!(!is_valid_blood_pressure(Some(&raw)), "{raw} should be invalid");
        }
        assert!(!is_valid_blood_pressure(None));
    }

    #[test]
    fn test_temperature_accepts_numbers_and_numeric_strings() {
        assert!(is_valid_temperature(Some(&json!(98.6))));
        assert!(is_valid_temperature(Some(&json!("101.2"))));
        assert!(is_valid_temperature(Some(&json!(0))));
        assert_eq!(temperature_value(Some(&json!("99.6"))), Some(99.6));
    }

    #[test]
    fn test_temperature_rejects_missing_and_garbage() {
        assert!(!is_valid_temperature(None));
        assert!(!is_valid_temperature(Some(&json!(null))));
        assert!(!is_valid_temperature(Some(&json!(""))));
        assert!(!is_valid_temperature(Some(&json!("TEMP_ERROR"))));
        assert!(!is_valid_temperature(Some(&json!(true))));
    }

    #[test]
    fn test_age_accepts_numbers_and_numeric_strings() {
        assert_eq!(age_value(Some(&json!(42))), Some(42));
        assert_eq!(age_value(Some(&json!("67"))), Some(67));
        assert_eq!(age_value(Some(&json!("30 years"))), Some(30));
        assert_eq!(age_value(Some(&json!(45.7))), Some(45));
    }

    #[test]
    fn test_age_rejects_missing_and_garbage() {
        assert!(!is_valid_age(None));
        assert!(!is_valid_age(Some(&json!(null))));
        assert!(!is_valid_age(Some(&json!(""))));
        assert!(!is_valid_age(Some(&json!("fifty-three"))));
        assert!(!is_valid_age(Some(&json!("unknown"))));
        assert!(!is_valid_age(Some(&json!({"years": 40}))));
    }

    #[test]
    fn test_is_valid_patient_checks_presence_only() {
        let complete: PatientRecord = serde_json::from_value(json!({
            "patient_id": "DEMO001",
            "blood_pressure": "INVALID",
            "temperature": "TEMP_ERROR",
            "age": "unknown",
        }))
        .expect("deserialize");
        assert!(is_valid_patient(&complete));

        let missing_age: PatientRecord = serde_json::from_value(json!({
            "patient_id": "DEMO002",
            "blood_pressure": "120/80",
            "temperature": 98.6,
            "age": null,
        }))
        .expect("deserialize");
        assert!(!is_valid_patient(&missing_age));
    }
}
