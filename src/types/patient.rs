//! Patient record types
//!
//! `PredictRequest` is the wire schema of `POST /predict`; every field is
//! optional at the serde level so that absent fields can be reported by name
//! instead of failing deserialization. `PatientRecord` is the validated form
//! the encoder consumes.

use crate::errors::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields that must be present on a prediction request, in reporting order
pub const REQUIRED_FIELDS: [&str; 6] = ["Age", "Gender", "Area", "District", "AreaType", "HouseType"];

/// Patient gender as encoded in training (0 = female, 1 = male)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Gender {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    /// Numeric encoding used by the model
    pub fn as_flag(&self) -> u8 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "Female"),
            Gender::Male => write!(f, "Male"),
        }
    }
}

/// Validated patient and location record
///
/// Categorical fields are `None` when absent; the encoder treats that the
/// same as an unknown value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: u32,
    pub gender: Gender,
    pub ns1: bool,
    pub igg: bool,
    pub igm: bool,
    pub area: Option<String>,
    pub district: Option<String>,
    pub area_type: Option<String>,
    pub house_type: Option<String>,
}

impl PatientRecord {
    /// "<Area>, <District>" with "Unknown" for absent parts
    pub fn location(&self) -> String {
        format!(
            "{}, {}",
            self.area.as_deref().unwrap_or("Unknown"),
            self.district.as_deref().unwrap_or("Unknown")
        )
    }

    /// "NS1: Positive, IgG: Negative, IgM: Positive"
    pub fn test_results(&self) -> String {
        format!(
            "NS1: {}, IgG: {}, IgM: {}",
            positivity(self.ns1),
            positivity(self.igg),
            positivity(self.igm)
        )
    }
}

pub(crate) fn positivity(flag: bool) -> &'static str {
    if flag {
        "Positive"
    } else {
        "Negative"
    }
}

/// A 0/1 input that also accepts JSON booleans
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinaryInput {
    Bool(bool),
    Int(i64),
}

impl BinaryInput {
    pub fn to_flag(self, field: &str) -> Result<bool> {
        match self {
            BinaryInput::Bool(flag) => Ok(flag),
            BinaryInput::Int(0) => Ok(false),
            BinaryInput::Int(1) => Ok(true),
            BinaryInput::Int(other) => Err(PredictorError::InvalidField {
                field: field.to_string(),
                reason: format!("expected 0 or 1, got {}", other),
            }),
        }
    }
}

impl From<bool> for BinaryInput {
    fn from(flag: bool) -> Self {
        BinaryInput::Bool(flag)
    }
}

/// Age as sent by clients: an integer, or a float with no fractional part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    Int(i64),
    Float(f64),
}

impl AgeInput {
    fn to_years(self) -> Result<u32> {
        let invalid = |reason: String| PredictorError::InvalidField {
            field: "Age".to_string(),
            reason,
        };

        let years = match self {
            AgeInput::Int(years) => years,
            AgeInput::Float(years) if years.is_finite() && years.fract() == 0.0 => years as i64,
            AgeInput::Float(years) => {
                return Err(invalid(format!("expected a whole number, got {}", years)))
            }
        };

        u32::try_from(years).map_err(|_| invalid(format!("must be a non-negative integer, got {}", years)))
    }
}

impl From<u32> for AgeInput {
    fn from(years: u32) -> Self {
        AgeInput::Int(i64::from(years))
    }
}

/// Wire schema of `POST /predict`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "Age", default)]
    pub age: Option<AgeInput>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<BinaryInput>,
    #[serde(rename = "NS1", default)]
    pub ns1: Option<BinaryInput>,
    #[serde(rename = "IgG", default)]
    pub igg: Option<BinaryInput>,
    #[serde(rename = "IgM", default)]
    pub igm: Option<BinaryInput>,
    #[serde(rename = "Area", default)]
    pub area: Option<String>,
    #[serde(rename = "District", default)]
    pub district: Option<String>,
    #[serde(rename = "AreaType", default)]
    pub area_type: Option<String>,
    #[serde(rename = "HouseType", default)]
    pub house_type: Option<String>,
}

impl PredictRequest {
    /// Names of required fields that are absent, in `REQUIRED_FIELDS` order
    pub fn missing_fields(&self) -> Vec<String> {
        let present = [
            self.age.is_some(),
            self.gender.is_some(),
            self.area.is_some(),
            self.district.is_some(),
            self.area_type.is_some(),
            self.house_type.is_some(),
        ];

        REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Validate and convert into a [`PatientRecord`].
    ///
    /// Lab results default to negative when absent.
    pub fn into_record(self) -> Result<PatientRecord> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(PredictorError::MissingFields { fields: missing });
        }

        let optional_flag = |input: Option<BinaryInput>, field: &str| -> Result<bool> {
            input.map(|value| value.to_flag(field)).transpose().map(|flag| flag.unwrap_or(false))
        };

        Ok(PatientRecord {
            age: self.age.map(AgeInput::to_years).transpose()?.unwrap_or(0),
            gender: Gender::from_flag(optional_flag(self.gender, "Gender")?),
            ns1: optional_flag(self.ns1, "NS1")?,
            igg: optional_flag(self.igg, "IgG")?,
            igm: optional_flag(self.igm, "IgM")?,
            area: self.area,
            district: self.district,
            area_type: self.area_type,
            house_type: self.house_type,
        })
    }
}

impl From<&PatientRecord> for PredictRequest {
    fn from(record: &PatientRecord) -> Self {
        Self {
            age: Some(record.age.into()),
            gender: Some(BinaryInput::Int(i64::from(record.gender.as_flag()))),
            ns1: Some(record.ns1.into()),
            igg: Some(record.igg.into()),
            igm: Some(record.igm.into()),
            area: record.area.clone(),
            district: record.district.clone(),
            area_type: record.area_type.clone(),
            house_type: record.house_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_request() -> serde_json::Value {
        json!({
            "Age": 30, "Gender": 1, "NS1": 0, "IgG": 1, "IgM": 1,
            "Area": "Badda", "District": "Dhaka",
            "AreaType": "Developed", "HouseType": "Building"
        })
    }

    #[test]
    fn test_full_request_converts() {
        let request: PredictRequest = serde_json::from_value(full_request()).unwrap();
        let record = request.into_record().unwrap();

        assert_eq!(record.age, 30);
        assert_eq!(record.gender, Gender::Male);
        assert!(!record.ns1);
        assert!(record.igg);
        assert!(record.igm);
        assert_eq!(record.area.as_deref(), Some("Badda"));
        assert_eq!(record.location(), "Badda, Dhaka");
        assert_eq!(record.test_results(), "NS1: Negative, IgG: Positive, IgM: Positive");
    }

    #[test]
    fn test_missing_age_is_reported() {
        let mut body = full_request();
        body.as_object_mut().unwrap().remove("Age");
        let request: PredictRequest = serde_json::from_value(body).unwrap();

        assert_eq!(request.missing_fields(), vec!["Age".to_string()]);
        match request.into_record() {
            Err(PredictorError::MissingFields { fields }) => assert_eq!(fields, vec!["Age"]),
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_keep_order() {
        let request: PredictRequest = serde_json::from_value(json!({"Gender": 0})).unwrap();
        assert_eq!(
            request.missing_fields(),
            vec!["Age", "Area", "District", "AreaType", "HouseType"]
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut body = full_request();
        body["Age"] = serde_json::Value::Null;
        let request: PredictRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.missing_fields(), vec!["Age"]);
    }

    #[test]
    fn test_lab_results_default_to_negative() {
        let mut body = full_request();
        for field in ["NS1", "IgG", "IgM"] {
            body.as_object_mut().unwrap().remove(field);
        }
        let record: PatientRecord = serde_json::from_value::<PredictRequest>(body)
            .unwrap()
            .into_record()
            .unwrap();
        assert!(!record.ns1 && !record.igg && !record.igm);
    }

    #[test]
    fn test_boolean_flags_accepted() {
        let mut body = full_request();
        body["NS1"] = json!(true);
        body["Gender"] = json!(false);
        let record = serde_json::from_value::<PredictRequest>(body)
            .unwrap()
            .into_record()
            .unwrap();
        assert!(record.ns1);
        assert_eq!(record.gender, Gender::Female);
    }

    #[test]
    fn test_flag_out_of_range_rejected() {
        let mut body = full_request();
        body["IgM"] = json!(2);
        let result = serde_json::from_value::<PredictRequest>(body).unwrap().into_record();
        assert!(matches!(result, Err(PredictorError::InvalidField { ref field, .. }) if field == "IgM"));
    }

    #[test]
    fn test_age_coercion() {
        let mut body = full_request();
        body["Age"] = json!(42.0);
        let record = serde_json::from_value::<PredictRequest>(body.clone()).unwrap().into_record().unwrap();
        assert_eq!(record.age, 42);

        body["Age"] = json!(42.5);
        assert!(serde_json::from_value::<PredictRequest>(body.clone()).unwrap().into_record().is_err());

        body["Age"] = json!(-1);
        assert!(serde_json::from_value::<PredictRequest>(body).unwrap().into_record().is_err());
    }

    #[test]
    fn test_record_round_trips_through_request() {
        let record = serde_json::from_value::<PredictRequest>(full_request())
            .unwrap()
            .into_record()
            .unwrap();
        let rebuilt = PredictRequest::from(&record).into_record().unwrap();
        assert_eq!(record, rebuilt);
    }
}
