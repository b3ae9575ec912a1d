//! Feature row construction
//!
//! Turns a [`VisitForm`] into the single row the regressor expects: numeric
//! fields as-is, categorical fields replaced by their encoder codes, columns
//! laid out in training order with zeros for anything the form lacks.

use std::collections::HashMap;

use super::error::PredictionError;
use super::form::VisitForm;
use crate::model::EncoderMap;

/// Build the model input row for `form`
#[allow(clippy::cast_precision_loss)]
pub fn build_feature_row(
    form: &VisitForm,
    encoders: &EncoderMap,
    feature_names: &[String],
) -> Result<Vec<f64>, PredictionError> {
    let mut columns: HashMap<&str, Option<f64>> = HashMap::new();

    for (name, value) in form.numeric_columns() {
        columns.insert(name, Some(value as f64));
    }
    for (name, value) in form.categorical_columns() {
        // A categorical column without an encoder stays a string and cannot feed the model
        let encoded = encoders.get(name).map(|encoder| encoder.encode(value));
        columns.insert(name, encoded);
    }

    feature_names
        .iter()
        .map(|feature| match columns.get(feature.as_str()) {
            Some(Some(value)) => Ok(*value),
            Some(None) => Err(PredictionError::MissingEncoder {
                feature: feature.clone(),
            }),
            None => Ok(0.0),
        })
        .collect()
}
