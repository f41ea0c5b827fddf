// ABOUTME: Reviewer guidance task: completeness score, issues, and draft notes.
// ABOUTME: Consumes a rendered submission summary so the schema stays stable as the form grows.

use chrono::NaiveDate;
use floe_core::limits::{REVIEW_ISSUES_MAX, REVIEW_SUGGESTIONS_MAX};
use floe_core::spatial::BoundingBox;
use floe_core::taxonomy::{Category, ExpeditionType, IsoTopic};
use serde::{Deserialize, Serialize};

use crate::extract::extract_json;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::tasks::{str_field, string_list};
use crate::validate::{Diagnostic, check_int_range};

/// The full submission as the reviewer sees it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub title: String,
    pub abstract_text: String,
    pub expedition: Option<ExpeditionType>,
    pub category: Option<Category>,
    pub iso_topic: Option<IsoTopic>,
    pub keywords: Vec<String>,
    pub temporal_start: Option<NaiveDate>,
    pub temporal_end: Option<NaiveDate>,
    pub bounds: Option<BoundingBox>,
    pub purpose: String,
    pub progress: Option<String>,
    pub has_file: bool,
}

impl ReviewSubmission {
    /// Render the prompt block describing this submission.
    pub fn summary(&self) -> String {
        let optional = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_string());
        let bounds = self
            .bounds
            .map(|b| format!("N:{}, S:{}, E:{}, W:{}", b.north, b.south, b.east, b.west));
        format!(
            "- Title: {title}\n\
             - Abstract: {abstract_text}\n\
             - Expedition Type: {expedition}\n\
             - Category: {category}\n\
             - ISO Topic: {iso_topic}\n\
             - Keywords: {keywords}\n\
             - Temporal Coverage: {start} to {end}\n\
             - Spatial Bounds: {bounds}\n\
             - Purpose: {purpose}\n\
             - Data Set Progress: {progress}\n\
             - Has Data File: {has_file}",
            title = if self.title.is_empty() { "N/A" } else { self.title.as_str() },
            abstract_text = if self.abstract_text.is_empty() { "N/A" } else { self.abstract_text.as_str() },
            expedition = optional(self.expedition.map(|e| e.key().to_string())),
            category = optional(self.category.map(|c| c.key().to_string())),
            iso_topic = optional(self.iso_topic.map(|t| t.key().to_string())),
            keywords = if self.keywords.is_empty() { "N/A".to_string() } else { self.keywords.join(", ") },
            start = optional(self.temporal_start.map(|d| d.to_string())),
            end = optional(self.temporal_end.map(|d| d.to_string())),
            bounds = optional(bounds),
            purpose = if self.purpose.is_empty() { "N/A" } else { self.purpose.as_str() },
            progress = optional(self.progress.clone()),
            has_file = self.has_file,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerNotes {
    pub completeness_score: u8,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub draft_notes: String,
}

pub struct ReviewTask;

impl AssistTask for ReviewTask {
    const KIND: TaskKind = TaskKind::ReviewerNotes;

    type Input = ReviewSubmission;
    type Output = ReviewerNotes;

    fn prompt(input: &ReviewSubmission) -> CompletionRequest {
        prompt::review(&input.summary())
    }

    fn interpret(_input: &ReviewSubmission, raw: &str) -> Interpreted<ReviewerNotes> {
        let Some(value) = extract_json(raw) else {
            return Interpreted::malformed("no JSON object in review response");
        };

        let Some(raw_score) = value
            .get("completeness_score")
            .and_then(|s| s.as_f64())
            .map(|s| s.round() as i64)
        else {
            return Interpreted::invalid(vec![Diagnostic::error(
                "completeness_score",
                "required numeric field is missing",
            )]);
        };
        if let Some(diagnostic) = check_int_range("completeness_score", raw_score, 0, 100) {
            return Interpreted::invalid(vec![diagnostic]);
        }

        let mut issues = string_list(&value, "issues");
        issues.truncate(REVIEW_ISSUES_MAX);
        let mut suggestions = string_list(&value, "suggestions");
        suggestions.truncate(REVIEW_SUGGESTIONS_MAX);

        Interpreted::ok(ReviewerNotes {
            completeness_score: raw_score as u8,
            issues,
            suggestions,
            draft_notes: str_field(&value, "draft_notes").unwrap_or_default(),
        })
    }
}
