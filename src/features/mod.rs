pub mod encoding;
pub mod form;

pub use encoding::{encode, FEATURE_COUNT};
pub use form::PatientForm;
