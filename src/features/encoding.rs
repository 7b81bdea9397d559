use crate::error::PredictError;
use crate::features::form::{CompleteForm, PatientForm};

pub const FEATURE_COUNT: usize = 21;

/// Column layout the model was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "hypertension",
    "heart_disease",
    "avg_glucose_level",
    "bmi",
    "gender_Female",
    "gender_Male",
    "gender_Other",
    "ever_married_No",
    "ever_married_Yes",
    "work_type_Govt_job",
    "work_type_Never_worked",
    "work_type_Private",
    "work_type_Self-employed",
    "work_type_children",
    "Residence_type_Rural",
    "Residence_type_Urban",
    "smoking_status_Unknown",
    "smoking_status_formerly smoked",
    "smoking_status_never smoked",
    "smoking_status_smokes",
];

// gender_Other follows these two and is always 0: the form never offers it.
const GENDER: &[&str] = &["Female", "Male"];
const EVER_MARRIED: &[&str] = &["No", "Yes"];
const WORK_TYPE: &[&str] = &[
    "Govt_job",
    "Never_worked",
    "Private",
    "Self-employed",
    "children",
];
const RESIDENCE_TYPE: &[&str] = &["Rural", "Urban"];
const SMOKING_STATUS: &[&str] = &["Unknown", "formerly smoked", "never smoked", "smokes"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Values paired with their column names.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        FEATURE_NAMES.into_iter().zip(self.0.iter().copied())
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.named().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

impl TryFrom<Vec<f32>> for FeatureVector {
    type Error = PredictError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        let actual = values.len();
        <[f32; FEATURE_COUNT]>::try_from(values)
            .map(FeatureVector)
            .map_err(|_| PredictError::ShapeMismatch {
                expected: FEATURE_COUNT,
                actual,
            })
    }
}

/// Validate a submission and encode it into the model's column layout.
pub fn encode(form: &PatientForm) -> Result<FeatureVector, PredictError> {
    let form = form.require()?;
    encode_complete(&form)
}

fn encode_complete(form: &CompleteForm<'_>) -> Result<FeatureVector, PredictError> {
    let mut values = Vec::with_capacity(FEATURE_COUNT);

    values.push(parse_float("age", form.age)?);
    values.push(parse_int("hypertension", form.hypertension)?);
    values.push(parse_int("heart_disease", form.heart_disease)?);
    values.push(parse_float("avg_glucose_level", form.avg_glucose_level)?);
    values.push(parse_float("bmi", form.bmi)?);

    one_hot(&mut values, form.gender, GENDER);
    values.push(0.0);
    one_hot(&mut values, form.ever_married, EVER_MARRIED);
    one_hot(&mut values, form.work_type, WORK_TYPE);
    one_hot(&mut values, form.residence_type, RESIDENCE_TYPE);
    one_hot(&mut values, form.smoking_status, SMOKING_STATUS);

    FeatureVector::try_from(values)
}

/// Labels outside `labels` leave the whole block at zero.
fn one_hot(out: &mut Vec<f32>, value: &str, labels: &[&str]) {
    if !labels.contains(&value) {
        tracing::debug!("Unrecognized category {:?}, expected one of {:?}", value, labels);
    }
    out.extend(labels.iter().map(|label| if *label == value { 1.0 } else { 0.0 }));
}

fn parse_float(field: &str, raw: &str) -> Result<f32, PredictError> {
    let value: f32 = raw.trim().parse().map_err(|_| {
        PredictError::InvalidInput(format!("could not convert {}={:?} to a number", field, raw))
    })?;

    if !value.is_finite() {
        return Err(PredictError::InvalidInput(format!(
            "{} must be a finite number, got {:?}",
            field, raw
        )));
    }

    Ok(value)
}

fn parse_int(field: &str, raw: &str) -> Result<f32, PredictError> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        PredictError::InvalidInput(format!("could not convert {}={:?} to an integer", field, raw))
    })?;
    Ok(value as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn stroke_patient() -> Value {
        json!({
            "gender": "Male",
            "age": "67",
            "hypertension": "0",
            "heart_disease": "1",
            "ever_married": "Yes",
            "work_type": "Private",
            "Residence_type": "Urban",
            "avg_glucose_level": "228.69",
            "bmi": "36.6",
            "smoking_status": "formerly smoked"
        })
    }

    fn form_from(value: Value) -> PatientForm {
        serde_json::from_value(value).unwrap()
    }

    fn block_sum(vector: &FeatureVector, prefix: &str) -> f32 {
        vector
            .named()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(_, v)| v)
            .sum()
    }

    #[test]
    fn encodes_reference_patient() {
        let vector = encode(&form_from(stroke_patient())).unwrap();
        let expected: [f32; FEATURE_COUNT] = [
            67.0, 0.0, 1.0, 228.69, 36.6, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
            1.0, 0.0, 1.0, 0.0, 0.0,
        ];
        assert_eq!(vector.to_vec(), expected.to_vec());
        assert_eq!(vector.len(), FEATURE_COUNT);
    }

    #[test]
    fn every_category_combination_is_one_hot() {
        for gender in GENDER {
            for married in EVER_MARRIED {
                for work in WORK_TYPE {
                    for residence in RESIDENCE_TYPE {
                        for smoking in SMOKING_STATUS {
                            let mut patient = stroke_patient();
                            patient["gender"] = json!(gender);
                            patient["ever_married"] = json!(married);
                            patient["work_type"] = json!(work);
                            patient["Residence_type"] = json!(residence);
                            patient["smoking_status"] = json!(smoking);

                            let vector = encode(&form_from(patient)).unwrap();
                            assert_eq!(block_sum(&vector, "gender_"), 1.0);
                            assert_eq!(block_sum(&vector, "ever_married_"), 1.0);
                            assert_eq!(block_sum(&vector, "work_type_"), 1.0);
                            assert_eq!(block_sum(&vector, "Residence_type_"), 1.0);
                            assert_eq!(block_sum(&vector, "smoking_status_"), 1.0);
                            assert_eq!(vector.get("gender_Other"), Some(0.0));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn gender_other_is_never_set() {
        let mut patient = stroke_patient();
        patient["gender"] = json!("Other");
        let vector = encode(&form_from(patient)).unwrap();
        assert_eq!(vector.get("gender_Other"), Some(0.0));
        assert_eq!(block_sum(&vector, "gender_"), 0.0);
    }

    #[test]
    fn unknown_category_leaves_block_empty() {
        let mut patient = stroke_patient();
        patient["work_type"] = json!("private");
        let vector = encode(&form_from(patient)).unwrap();
        assert_eq!(block_sum(&vector, "work_type_"), 0.0);
    }

    #[test]
    fn any_missing_field_is_missing_input() {
        for field in crate::features::form::REQUIRED_FIELDS {
            let mut patient = stroke_patient();
            patient.as_object_mut().unwrap().remove(field);
            assert_eq!(
                encode(&form_from(patient)).unwrap_err(),
                PredictError::MissingInput,
                "dropping {field}"
            );
        }
    }

    #[test]
    fn non_numeric_values_are_invalid_input() {
        for field in ["age", "avg_glucose_level", "bmi", "hypertension", "heart_disease"] {
            let mut patient = stroke_patient();
            patient[field] = json!("abc");
            let err = encode(&form_from(patient)).unwrap_err();
            assert!(
                matches!(err, PredictError::InvalidInput(_)),
                "{field}: {err:?}"
            );
            assert!(err.to_string().starts_with("Invalid input: "));
            assert!(err.to_string().contains(field));
        }
    }

    #[test]
    fn flags_must_be_integers() {
        let mut patient = stroke_patient();
        patient["hypertension"] = json!("1.0");
        assert!(matches!(
            encode(&form_from(patient)).unwrap_err(),
            PredictError::InvalidInput(_)
        ));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for raw in ["NaN", "inf", "-infinity"] {
            let mut patient = stroke_patient();
            patient["bmi"] = json!(raw);
            assert!(matches!(
                encode(&form_from(patient)).unwrap_err(),
                PredictError::InvalidInput(_)
            ));
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let mut patient = stroke_patient();
        patient["age"] = json!(" 67 ");
        patient["heart_disease"] = json!("1\n");
        let vector = encode(&form_from(patient)).unwrap();
        assert_eq!(vector.get("age"), Some(67.0));
        assert_eq!(vector.get("heart_disease"), Some(1.0));
    }

    #[test]
    fn wrong_length_is_a_shape_mismatch() {
        let err = FeatureVector::try_from(vec![0.0; 20]).unwrap_err();
        assert_eq!(
            err,
            PredictError::ShapeMismatch {
                expected: FEATURE_COUNT,
                actual: 20
            }
        );
    }
}
