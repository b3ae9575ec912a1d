/// Failure while turning a submitted form into a prediction
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PredictionError {
    #[error("invalid value for {field}: '{value}' is not an integer")]
    InvalidNumber { field: &'static str, value: String },

    #[error("feature '{feature}' is categorical but no encoder was loaded for it")]
    MissingEncoder { feature: String },

    #[error("model produced a non-finite prediction ({value})")]
    NonFinite { value: f64 },
}
