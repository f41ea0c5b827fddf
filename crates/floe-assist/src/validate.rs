// ABOUTME: Validation diagnostics and shared field-rule helpers.
// ABOUTME: Errors fail the invocation; warnings travel with the result as advisory hints.

use serde::{Deserialize, Serialize};

/// How severe a validation finding is. An `Error` on any field makes the
/// whole result `Failed`; `Warning`s ride along on usable results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A single validation finding against one field of a task output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Re-scope a diagnostic under a parent field, e.g.
    /// `classification.category` inside the combined pre-fill output.
    pub fn scoped(mut self, parent: &str) -> Self {
        self.field = format!("{parent}.{}", self.field);
        self
    }
}

/// True when any diagnostic is an `Error`.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Required-field presence check.
pub fn require_non_empty(field: &str, value: &str) -> Option<Diagnostic> {
    value
        .trim()
        .is_empty()
        .then(|| Diagnostic::error(field, "required field is empty"))
}

/// Hard length ceiling, measured on the final candidate value.
pub fn check_max_chars(field: &str, value: &str, max: usize) -> Option<Diagnostic> {
    let len = value.chars().count();
    (len > max).then(|| {
        Diagnostic::error(
            field,
            format!("{len} characters exceeds the {max} character limit"),
        )
    })
}

/// Advisory range flag: outside typical bounds is reported, not rejected.
pub fn flag_outside_range(field: &str, value: i64, min: i64, max: i64) -> Option<Diagnostic> {
    (value < min || value > max).then(|| {
        Diagnostic::warning(
            field,
            format!("{value} is outside the typical range [{min}, {max}]"),
        )
    })
}

/// Hard numeric range check for required fields.
pub fn check_int_range(field: &str, value: i64, min: i64, max: i64) -> Option<Diagnostic> {
    (value < min || value > max)
        .then(|| Diagnostic::error(field, format!("{value} is outside [{min}, {max}]")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detection() {
        let diagnostics = vec![
            Diagnostic::warning("score", "slightly high"),
            Diagnostic::error("title", "required field is empty"),
        ];
        assert!(has_errors(&diagnostics));
        assert!(!has_errors(&[Diagnostic::warning("x", "y")]));
        assert!(!has_errors(&[]));
    }

    #[test]
    fn require_non_empty_trims() {
        assert!(require_non_empty("title", "   ").is_some());
        assert!(require_non_empty("title", "Ice Cores").is_none());
    }

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        let value = "é".repeat(10);
        assert!(check_max_chars("field", &value, 10).is_none());
        assert!(check_max_chars("field", &value, 9).is_some());
    }

    #[test]
    fn range_checks_differ_in_severity() {
        let soft = flag_outside_range("seconds", 99, 0, 59).unwrap();
        assert_eq!(soft.severity, Severity::Warning);

        let hard = check_int_range("score", 150, 0, 100).unwrap();
        assert_eq!(hard.severity, Severity::Error);

        assert!(flag_outside_range("seconds", 30, 0, 59).is_none());
        assert!(check_int_range("score", 100, 0, 100).is_none());
    }

    #[test]
    fn scoped_prefixes_field() {
        let diag = Diagnostic::error("category", "unknown key").scoped("classification");
        assert_eq!(diag.field, "classification.category");
    }
}
