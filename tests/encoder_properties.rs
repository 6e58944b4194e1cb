//! Property tests for the feature encoder and risk banding

use dengue_predictor::encoding::{encode, CATEGORICAL_GROUPS, FEATURE_COUNT};
use dengue_predictor::model::{Confidence, RiskLevel, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use dengue_predictor::types::{Gender, PatientRecord};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

/// Patient whose categoricals mix known values with arbitrary strings
#[derive(Debug, Clone)]
struct AnyPatient(PatientRecord);

fn categorical(g: &mut Gen, known: &'static [&'static str]) -> Option<String> {
    match u8::arbitrary(g) % 3 {
        0 => None,
        1 => g.choose(known).map(|v| v.to_string()),
        _ => Some(String::arbitrary(g)),
    }
}

impl Arbitrary for AnyPatient {
    fn arbitrary(g: &mut Gen) -> Self {
        let [areas, area_types, districts, house_types] =
            CATEGORICAL_GROUPS.map(|group| group.values);

        AnyPatient(PatientRecord {
            age: u32::arbitrary(g) % 120,
            gender: Gender::from_flag(bool::arbitrary(g)),
            ns1: bool::arbitrary(g),
            igg: bool::arbitrary(g),
            igm: bool::arbitrary(g),
            area: categorical(g, areas),
            district: categorical(g, districts),
            area_type: categorical(g, area_types),
            house_type: categorical(g, house_types),
        })
    }
}

#[quickcheck]
fn encoded_width_is_fixed(patient: AnyPatient) -> bool {
    encode(&patient.0).len() == FEATURE_COUNT
}

#[quickcheck]
fn each_group_has_at_most_one_hot(patient: AnyPatient) -> bool {
    let features = encode(&patient.0);
    CATEGORICAL_GROUPS.iter().all(|group| {
        let slice = features.group(group);
        let ones = slice.iter().filter(|v| **v == 1.0).count();
        let zeros = slice.iter().filter(|v| **v == 0.0).count();
        ones <= 1 && ones + zeros == slice.len()
    })
}

#[quickcheck]
fn known_values_light_their_column(patient: AnyPatient) -> bool {
    let record = &patient.0;
    let features = encode(record);
    let inputs = [
        record.area.as_deref(),
        record.area_type.as_deref(),
        record.district.as_deref(),
        record.house_type.as_deref(),
    ];

    CATEGORICAL_GROUPS.iter().zip(inputs).all(|(group, input)| {
        let hot = features.group(group).iter().any(|v| *v == 1.0);
        let known = input.and_then(|v| group.position(v)).is_some();
        hot == known
    })
}

#[quickcheck]
fn scalars_are_copied_through(patient: AnyPatient) -> bool {
    let record = &patient.0;
    let features = encode(record);
    let flag = |b: bool| if b { 1.0 } else { 0.0 };

    features.get("Age") == Some(f64::from(record.age))
        && features.get("Gender") == Some(f64::from(record.gender.as_flag()))
        && features.get("NS1") == Some(flag(record.ns1))
        && features.get("IgG") == Some(flag(record.igg))
        && features.get("IgM") == Some(flag(record.igm))
}

#[quickcheck]
fn risk_level_is_monotonic(a: u16, b: u16) -> bool {
    let p = f64::from(a.min(b)) / f64::from(u16::MAX);
    let q = f64::from(a.max(b)) / f64::from(u16::MAX);
    RiskLevel::from_probability(p) <= RiskLevel::from_probability(q)
}

#[quickcheck]
fn risk_bands_follow_thresholds(raw: u16) -> bool {
    let p = f64::from(raw) / f64::from(u16::MAX);
    let expected = if p >= HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if p >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    RiskLevel::from_probability(p) == expected
}

#[quickcheck]
fn confidence_is_symmetric_about_half(raw: u16) -> bool {
    let p = f64::from(raw) / f64::from(u16::MAX);
    Confidence::from_probability(p) == Confidence::from_probability(1.0 - p)
        || ((p - 0.5).abs() - 0.3).abs() < 1e-9
}

#[quickcheck]
fn encoding_is_idempotent(patient: AnyPatient) -> bool {
    encode(&patient.0) == encode(&patient.0)
}
