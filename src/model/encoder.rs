//! Categorical label encoders
//!
//! An encoder maps the classes seen at training time to integer codes, the
//! code being the class position in the stored list. Values never seen at
//! training time (and empty values) fall into the `Unknown` bucket.

use serde::Deserialize;
use std::collections::HashMap;

/// Category substituted for empty or unseen values
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Fitted label encoder for one categorical feature
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl TryFrom<Vec<String>> for LabelEncoder {
    type Error = String;

    fn try_from(classes: Vec<String>) -> Result<Self, Self::Error> {
        let mut index = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), code).is_some() {
                return Err(format!("duplicate encoder class '{class}'"));
            }
        }
        Ok(Self { classes, index })
    }
}

impl LabelEncoder {
    /// Known classes in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Category a raw value is encoded as: the value itself when it is a
    /// known class, otherwise [`UNKNOWN_CATEGORY`]
    pub fn resolve<'a>(&self, value: Option<&'a str>) -> &'a str {
        match value {
            Some(v) if !v.is_empty() && self.index.contains_key(v) => v,
            _ => UNKNOWN_CATEGORY,
        }
    }

    /// Integer code for a raw value
    ///
    /// When `Unknown` was not a training class it is treated as an extra
    /// class appended after the fitted ones.
    pub fn code(&self, value: Option<&str>) -> usize {
        let category = self.resolve(value);
        self.index
            .get(category)
            .copied()
            .unwrap_or(self.classes.len())
    }

    /// Code as a model input value
    #[allow(clippy::cast_precision_loss)]
    pub fn encode(&self, value: Option<&str>) -> f64 {
        self.code(value) as f64
    }
}
