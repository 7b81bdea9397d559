use serde::Deserialize;

use crate::error::PredictError;

/// Form field names, in the order the page lays them out.
pub const REQUIRED_FIELDS: [&str; 10] = [
    "gender",
    "age",
    "hypertension",
    "heart_disease",
    "ever_married",
    "work_type",
    "Residence_type",
    "avg_glucose_level",
    "bmi",
    "smoking_status",
];

/// Raw `POST /predict` submission. Every field is optional so absence can be
/// reported instead of rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientForm {
    pub gender: Option<String>,
    pub age: Option<String>,
    pub hypertension: Option<String>,
    pub heart_disease: Option<String>,
    pub ever_married: Option<String>,
    pub work_type: Option<String>,
    #[serde(rename = "Residence_type")]
    pub residence_type: Option<String>,
    pub avg_glucose_level: Option<String>,
    pub bmi: Option<String>,
    pub smoking_status: Option<String>,
}

/// A submission with every required field present, still unparsed.
#[derive(Debug, Clone, Copy)]
pub struct CompleteForm<'a> {
    pub gender: &'a str,
    pub age: &'a str,
    pub hypertension: &'a str,
    pub heart_disease: &'a str,
    pub ever_married: &'a str,
    pub work_type: &'a str,
    pub residence_type: &'a str,
    pub avg_glucose_level: &'a str,
    pub bmi: &'a str,
    pub smoking_status: &'a str,
}

fn field(value: &Option<String>) -> Result<&str, PredictError> {
    value.as_deref().ok_or(PredictError::MissingInput)
}

impl PatientForm {
    /// Build a submission from decoded form pairs. When a field repeats, the
    /// first value wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = PatientForm::default();
        for (key, value) in pairs {
            if let Some(slot) = form.slot_mut(key.as_ref()) {
                if slot.is_none() {
                    *slot = Some(value.into());
                }
            }
        }
        form
    }

    // Same order as REQUIRED_FIELDS.
    fn values(&self) -> [Option<&str>; 10] {
        [
            self.gender.as_deref(),
            self.age.as_deref(),
            self.hypertension.as_deref(),
            self.heart_disease.as_deref(),
            self.ever_married.as_deref(),
            self.work_type.as_deref(),
            self.residence_type.as_deref(),
            self.avg_glucose_level.as_deref(),
            self.bmi.as_deref(),
            self.smoking_status.as_deref(),
        ]
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        let idx = REQUIRED_FIELDS.iter().position(|field| *field == name)?;
        let slots = [
            &mut self.gender,
            &mut self.age,
            &mut self.hypertension,
            &mut self.heart_disease,
            &mut self.ever_married,
            &mut self.work_type,
            &mut self.residence_type,
            &mut self.avg_glucose_level,
            &mut self.bmi,
            &mut self.smoking_status,
        ];
        slots.into_iter().nth(idx)
    }

    fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        REQUIRED_FIELDS.into_iter().zip(self.values())
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .filter_map(|(name, value)| value.is_none().then_some(name))
            .collect()
    }

    /// Borrow every field, or fail with `MissingInput` if any is absent.
    pub fn require(&self) -> Result<CompleteForm<'_>, PredictError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            tracing::debug!("Missing form fields: {}", missing.join(", "));
            return Err(PredictError::MissingInput);
        }

        Ok(CompleteForm {
            gender: field(&self.gender)?,
            age: field(&self.age)?,
            hypertension: field(&self.hypertension)?,
            heart_disease: field(&self.heart_disease)?,
            ever_married: field(&self.ever_married)?,
            work_type: field(&self.work_type)?,
            residence_type: field(&self.residence_type)?,
            avg_glucose_level: field(&self.avg_glucose_level)?,
            bmi: field(&self.bmi)?,
            smoking_status: field(&self.smoking_status)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn residence_type_keeps_its_capitalized_key() {
        let form: PatientForm =
            serde_json::from_value(json!({ "Residence_type": "Urban" })).unwrap();
        assert_eq!(form.residence_type.as_deref(), Some("Urban"));
    }

    #[test]
    fn reports_missing_fields_in_form_order() {
        let form: PatientForm = serde_json::from_value(json!({
            "gender": "Male",
            "age": "67",
            "bmi": "36.6"
        }))
        .unwrap();

        assert_eq!(
            form.missing_fields(),
            vec![
                "hypertension",
                "heart_disease",
                "ever_married",
                "work_type",
                "Residence_type",
                "avg_glucose_level",
                "smoking_status",
            ]
        );
        assert_eq!(form.require().unwrap_err(), PredictError::MissingInput);
    }

    #[test]
    fn empty_form_is_missing_everything() {
        let form = PatientForm::default();
        assert_eq!(form.missing_fields(), REQUIRED_FIELDS.to_vec());
    }

    #[test]
    fn empty_string_counts_as_present() {
        let form = PatientForm::from_pairs(REQUIRED_FIELDS.map(|name| (name, "")));
        assert!(form.require().is_ok());
    }

    #[test]
    fn first_value_of_a_repeated_field_wins() {
        let form = PatientForm::from_pairs([
            ("gender", "Male"),
            ("gender", "Female"),
            ("Residence_type", "Rural"),
            ("unrelated", "ignored"),
        ]);
        assert_eq!(form.gender.as_deref(), Some("Male"));
        assert_eq!(form.residence_type.as_deref(), Some("Rural"));
        assert_eq!(form.missing_fields().len(), 8);
    }
}
