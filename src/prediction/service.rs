//! Revenue prediction service

use super::error::PredictionError;
use super::features::build_feature_row;
use super::form::VisitForm;
use crate::model::ModelArtifacts;

/// Result of scoring one visit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Raw model output (the model is trained on log revenue)
    pub log_revenue: f64,
    /// `max(0, exp(log_revenue))`
    pub revenue: f64,
}

impl Prediction {
    /// Revenue as a currency string, e.g. `$1,234.57`
    pub fn formatted(&self) -> String {
        format_currency(self.revenue)
    }
}

/// Loaded model plus the encoding steps in front of it
#[derive(Debug, Clone)]
pub struct RevenueModel {
    artifacts: ModelArtifacts,
}

impl RevenueModel {
    pub const fn new(artifacts: ModelArtifacts) -> Self {
        Self { artifacts }
    }

    /// Score a submitted form
    pub fn predict(&self, form: &VisitForm) -> Result<Prediction, PredictionError> {
        let row = build_feature_row(
            form,
            &self.artifacts.encoders,
            &self.artifacts.feature_names,
        )?;
        let log_revenue = self.artifacts.regressor.predict(&row);
        let revenue = log_revenue.exp().max(0.0);
        if !revenue.is_finite() {
            return Err(PredictionError::NonFinite { value: revenue });
        }
        Ok(Prediction {
            log_revenue,
            revenue,
        })
    }
}

/// Format a non-negative amount as `$` + thousands-separated, two-decimal value
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (sign, digits) = fixed
        .strip_prefix('-')
        .map_or(("", fixed.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifacts::fixtures;

    fn model() -> RevenueModel {
        let dir = tempfile::tempdir().unwrap();
        let config = fixtures::write_default(dir.path());
        RevenueModel::new(ModelArtifacts::load(&config).unwrap())
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(5.0), "$5.00");
        assert_eq!(format_currency(999.994), "$999.99");
        assert_eq!(format_currency(999.995_1), "$1,000.00");
        assert_eq!(format_currency(1_234.567), "$1,234.57");
        assert_eq!(format_currency(1_234_567.8), "$1,234,567.80");
        assert_eq!(format_currency(-12_345.0), "-$12,345.00");
    }

    #[test]
    fn test_predict_exponentiates() {
        let form = VisitForm {
            hits: 20,
            pageviews: 20,
            browser: Some("Chrome".to_string()),
            ..VisitForm::default()
        };
        let prediction = model().predict(&form).unwrap();
        assert!((prediction.log_revenue - 3.0).abs() < 1e-9);
        assert!((prediction.revenue - 3.0_f64.exp()).abs() < 1e-9);
        assert_eq!(prediction.formatted(), "$20.09");
    }

    #[test]
    fn test_empty_form_still_predicts() {
        // Unknown browser lands in the appended bucket (code 3)
        let prediction = model().predict(&VisitForm::default()).unwrap();
        assert!((prediction.log_revenue + 3.0).abs() < 1e-9);
        assert_eq!(prediction.formatted(), "$0.05");
    }

    #[test]
    fn test_overflow_is_rejected() {
        let form = VisitForm {
            hits: 100_000,
            ..VisitForm::default()
        };
        let err = model().predict(&form).unwrap_err();
        assert!(matches!(err, PredictionError::NonFinite { .. }));
    }
}
