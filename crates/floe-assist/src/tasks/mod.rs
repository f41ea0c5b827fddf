// ABOUTME: The eleven assistance task definitions, each a data-driven AssistTask impl.
// ABOUTME: Schemas, guards, and rulesets differ; the pipeline they run through does not.

pub mod answer;
pub mod classify;
pub mod keywords;
pub mod prefill;
pub mod purpose;
pub mod quality;
pub mod query;
pub mod resolution;
pub mod review;
pub mod spatial;
pub mod title;

use floe_core::taxonomy::ExpeditionType;
use serde::{Deserialize, Serialize};

use crate::validate::Diagnostic;

/// Shortest abstract the generation tasks will work from.
pub(crate) const MIN_ABSTRACT_FOR_GENERATION: usize = 20;
/// Shortest abstract the quality checker will score.
pub(crate) const MIN_ABSTRACT_FOR_QUALITY: usize = 10;

/// Raw user-entered submission fields shared by the submission-assist tasks.
/// Supplied by the form pipeline; this layer only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub title: String,
    pub abstract_text: String,
    pub expedition: Option<ExpeditionType>,
}

impl SubmissionDraft {
    pub fn new(
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        expedition: Option<ExpeditionType>,
    ) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
            expedition,
        }
    }
}

/// Guard shared by tasks that generate text from an abstract.
pub(crate) fn guard_min_abstract(abstract_text: &str, min: usize) -> Option<Diagnostic> {
    (abstract_text.trim().chars().count() < min).then(|| {
        Diagnostic::error(
            "abstract",
            format!("abstract is too short to work with (minimum {min} characters)"),
        )
    })
}

/// Read an integer field that may arrive as a JSON number or a numeric string.
pub(crate) fn int_field(value: &serde_json::Value, key: &str) -> Option<i64> {
    let field = value.get(key)?;
    if let Some(n) = field.as_i64() {
        return Some(n);
    }
    field.as_str().and_then(|s| s.trim().parse::<i64>().ok())
}

/// Read a string field, trimmed, treating empty as absent.
pub(crate) fn str_field(value: &serde_json::Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Read an array of non-empty strings, trimmed.
pub(crate) fn string_list(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
