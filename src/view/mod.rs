//! HTML view
//!
//! Renders the single index page: the visit form with every select field
//! populated from the static option lists, followed by either the predicted
//! revenue or an error message.

use crate::prediction::{SelectField, SELECT_FIELDS};

const INDEX_TEMPLATE: &str = include_str!("index.html");

/// What to show below the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// Plain form (GET)
    Blank,
    /// Formatted currency string
    Prediction(&'a str),
    /// Error message, shown as `Error: <message>`
    Error(&'a str),
}

/// Render the index page
pub fn render_index(outcome: Outcome<'_>) -> String {
    let mut fields = String::new();
    for field in SELECT_FIELDS {
        render_select(&mut fields, field);
    }

    let result = match outcome {
        Outcome::Blank => String::new(),
        Outcome::Prediction(value) => format!(
            "    <div class=\"result prediction\">Predicted revenue: <strong>{}</strong></div>",
            escape_html(value)
        ),
        Outcome::Error(message) => format!(
            "    <div class=\"result error\">Error: {}</div>",
            escape_html(message)
        ),
    };

    INDEX_TEMPLATE
        .replace("{{select_fields}}", fields.trim_end())
        .replace("{{result}}", &result)
}

fn render_select(out: &mut String, field: &SelectField) {
    out.push_str(&format!(
        "        <label for=\"{name}\">{label}</label>\n        <select id=\"{name}\" name=\"{name}\">\n",
        name = field.name,
        label = field.label,
    ));
    for option in field.options {
        let escaped = escape_html(option);
        out.push_str(&format!(
            "            <option value=\"{escaped}\">{escaped}</option>\n"
        ));
    }
    out.push_str("        </select>\n");
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::options;

    #[test]
    fn test_blank_page_lists_every_option() {
        let html = render_index(Outcome::Blank);
        for field in SELECT_FIELDS {
            assert!(html.contains(&format!("<select id=\"{0}\" name=\"{0}\">", field.name)));
        }
        let option_count = html.matches("<option ").count();
        let expected: usize = SELECT_FIELDS.iter().map(|f| f.options.len()).sum();
        assert_eq!(option_count, expected);
        assert!(html.contains("<option value=\"Macau\">Macau</option>"));
        assert!(html.contains("<option value=\"(not set)\">(not set)</option>"));
        assert!(!html.contains("Predicted revenue"));
        assert!(!html.contains("Error:"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_options_are_escaped() {
        let html = render_index(Outcome::Blank);
        assert!(html.contains("<option value=\"Bosnia &amp; Herzegovina\">"));
        assert!(html.contains("Côte d’Ivoire"));
        assert!(!html.contains("Trinidad & Tobago"));
        assert!(options::COUNTRIES.contains(&"Trinidad & Tobago"));
    }

    #[test]
    fn test_prediction_outcome() {
        let html = render_index(Outcome::Prediction("$1,234.57"));
        assert!(html.contains("<strong>$1,234.57</strong>"));
        assert!(!html.contains("Error:"));
    }

    #[test]
    fn test_error_outcome_is_escaped() {
        let html = render_index(Outcome::Error("invalid value for hits: '<b>'"));
        assert!(html.contains("Error: invalid value for hits: &#x27;&lt;b&gt;&#x27;"));
        assert!(!html.contains("Predicted revenue"));
    }
}
