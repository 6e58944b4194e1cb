//! One-hot feature encoder
//!
//! Maps a [`PatientRecord`] onto the positional vector the classifier was
//! trained on. Pure and infallible: unknown categorical values produce an
//! all-zero indicator group instead of an error.

use super::columns::{
    column_index, CategoricalGroup, CATEGORICAL_GROUPS, FEATURE_COLUMNS, FEATURE_COUNT,
};
use crate::types::PatientRecord;

/// Fixed-width, fixed-order model input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap raw values that are already in column order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Values in column order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        column_index(column).map(|index| self.0[index])
    }

    /// (column, value) pairs in column order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.0.iter().copied())
    }

    /// Indicator values of one categorical group
    pub fn group(&self, group: &CategoricalGroup) -> &[f64] {
        &self.0[group.columns()]
    }
}

/// Encode a patient record into the model's feature vector
pub fn encode(record: &PatientRecord) -> FeatureVector {
    let mut values = [0.0; FEATURE_COUNT];

    values[0] = f64::from(record.gender.as_flag());
    values[1] = f64::from(record.age);
    values[2] = bit(record.ns1);
    values[3] = bit(record.igg);
    values[4] = bit(record.igm);

    for (group, input) in CATEGORICAL_GROUPS.iter().zip(categorical_inputs(record)) {
        if let Some(position) = input.and_then(|value| group.position(value)) {
            values[group.offset + position] = 1.0;
        }
    }

    FeatureVector(values)
}

/// Attributes whose value was supplied but fell outside the known set.
///
/// A missing value is not reported here; it encodes to zeros by default.
pub fn unmatched_attributes(record: &PatientRecord) -> Vec<&'static str> {
    CATEGORICAL_GROUPS
        .iter()
        .zip(categorical_inputs(record))
        .filter_map(|(group, input)| match input {
            Some(value) if group.position(value).is_none() => Some(group.attribute),
            _ => None,
        })
        .collect()
}

/// Categorical inputs in the same order as `CATEGORICAL_GROUPS`
fn categorical_inputs(record: &PatientRecord) -> [Option<&str>; 4] {
    [
        record.area.as_deref(),
        record.area_type.as_deref(),
        record.district.as_deref(),
        record.house_type.as_deref(),
    ]
}

fn bit(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
