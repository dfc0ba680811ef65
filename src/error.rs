/// Errors raised while turning an external document into a `PatientInput`.
///
/// The risk engine itself never fails; these only surface at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("questionnaire must be a JSON object of field names to values")]
    NotAnObject,

    #[error("malformed questionnaire JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed questionnaire CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown risk category '{0}' (expected Low, Medium or High)")]
    UnknownCategory(String),
}
