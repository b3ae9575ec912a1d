//! Submitted visit form
//!
//! Decodes an `application/x-www-form-urlencoded` body into a [`VisitForm`].
//! Missing or blank numeric fields read as 0; empty categorical fields read
//! as absent. Keys other than the nine form fields are ignored.

use super::error::PredictionError;

pub const HITS: &str = "hits";
pub const PAGEVIEWS: &str = "pageviews";
pub const VISIT_NUMBER: &str = "visitNumber";
pub const COUNTRY: &str = "country";
pub const CONTINENT: &str = "continent";
pub const BROWSER: &str = "browser";
pub const SUB_CONTINENT: &str = "subContinent";
pub const OPERATING_SYSTEM: &str = "operatingSystem";
pub const MEDIUM: &str = "medium";

/// One visit session as entered on the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitForm {
    pub hits: i64,
    pub pageviews: i64,
    pub visit_number: i64,
    pub country: Option<String>,
    pub continent: Option<String>,
    pub browser: Option<String>,
    pub sub_continent: Option<String>,
    pub operating_system: Option<String>,
    pub medium: Option<String>,
}

impl VisitForm {
    /// Parse a urlencoded request body
    pub fn parse(body: &[u8]) -> Result<Self, PredictionError> {
        let mut raw: Vec<(String, String)> = Vec::new();
        for (key, value) in form_urlencoded::parse(body) {
            // First occurrence of a repeated key wins
            if !raw.iter().any(|(k, _)| *k == key) {
                raw.push((key.into_owned(), value.into_owned()));
            }
        }
        let get = |name: &str| {
            raw.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };
        let text = |name: &str| get(name).filter(|v| !v.is_empty()).map(ToString::to_string);

        Ok(Self {
            hits: parse_count(HITS, get(HITS))?,
            pageviews: parse_count(PAGEVIEWS, get(PAGEVIEWS))?,
            visit_number: parse_count(VISIT_NUMBER, get(VISIT_NUMBER))?,
            country: text(COUNTRY),
            continent: text(CONTINENT),
            browser: text(BROWSER),
            sub_continent: text(SUB_CONTINENT),
            operating_system: text(OPERATING_SYSTEM),
            medium: text(MEDIUM),
        })
    }

    /// Numeric columns in form order
    pub const fn numeric_columns(&self) -> [(&'static str, i64); 3] {
        [
            (HITS, self.hits),
            (PAGEVIEWS, self.pageviews),
            (VISIT_NUMBER, self.visit_number),
        ]
    }

    /// Categorical columns in form order
    pub fn categorical_columns(&self) -> [(&'static str, Option<&str>); 6] {
        [
            (COUNTRY, self.country.as_deref()),
            (CONTINENT, self.continent.as_deref()),
            (BROWSER, self.browser.as_deref()),
            (SUB_CONTINENT, self.sub_continent.as_deref()),
            (OPERATING_SYSTEM, self.operating_system.as_deref()),
            (MEDIUM, self.medium.as_deref()),
        ]
    }
}

fn parse_count(field: &'static str, value: Option<&str>) -> Result<i64, PredictionError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(0);
    };
    value
        .parse::<i64>()
        .map_err(|_| PredictionError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
