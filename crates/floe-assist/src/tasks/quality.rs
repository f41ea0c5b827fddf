// ABOUTME: Abstract quality assessment task: 0-100 score, grade, and suggestions.
// ABOUTME: The score is required and range-checked; the grade derives from it when absent.

use floe_core::limits::QUALITY_SUGGESTIONS_MAX;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::extract_json;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::tasks::{MIN_ABSTRACT_FOR_QUALITY, SubmissionDraft, guard_min_abstract, string_list};
use crate::validate::{Diagnostic, check_int_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Grade {
    pub fn from_score(score: u8) -> Grade {
        match score {
            80..=100 => Grade::Excellent,
            60..=79 => Grade::Good,
            40..=59 => Grade::Fair,
            _ => Grade::Poor,
        }
    }

    fn from_key(key: &str) -> Option<Grade> {
        match key {
            "excellent" => Some(Grade::Excellent),
            "good" => Some(Grade::Good),
            "fair" => Some(Grade::Fair),
            "poor" => Some(Grade::Poor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractQuality {
    pub score: u8,
    pub grade: Grade,
    pub suggestions: Vec<String>,
}

pub struct QualityTask;

impl AssistTask for QualityTask {
    const KIND: TaskKind = TaskKind::AbstractQuality;

    type Input = SubmissionDraft;
    type Output = AbstractQuality;

    fn guard(input: &SubmissionDraft) -> Option<Diagnostic> {
        guard_min_abstract(&input.abstract_text, MIN_ABSTRACT_FOR_QUALITY)
    }

    fn prompt(input: &SubmissionDraft) -> CompletionRequest {
        prompt::quality(&input.title, &input.abstract_text, input.expedition)
    }

    fn interpret(_input: &SubmissionDraft, raw: &str) -> Interpreted<AbstractQuality> {
        let Some(value) = extract_json(raw) else {
            return Interpreted::malformed("no JSON object in quality response");
        };
        interpret_value(&value)
    }
}

pub(crate) fn interpret_value(value: &Value) -> Interpreted<AbstractQuality> {
    let mut diagnostics = Vec::new();

    let raw_score = value
        .get("score")
        .and_then(|s| s.as_f64())
        .map(|s| s.round() as i64);

    let Some(raw_score) = raw_score else {
        return Interpreted::invalid(vec![Diagnostic::error("score", "required numeric field is missing")]);
    };
    if let Some(diagnostic) = check_int_range("score", raw_score, 0, 100) {
        return Interpreted::invalid(vec![diagnostic]);
    }
    let score = raw_score as u8;

    let grade = match value.get("grade").and_then(|g| g.as_str()) {
        None => Grade::from_score(score),
        Some(raw) => match Grade::from_key(raw) {
            Some(grade) => grade,
            None => {
                diagnostics.push(Diagnostic::warning(
                    "grade",
                    format!("'{raw}' is not a known grade, derived from score instead"),
                ));
                Grade::from_score(score)
            }
        },
    };

    let mut suggestions = string_list(value, "suggestions");
    suggestions.truncate(QUALITY_SUGGESTIONS_MAX);

    Interpreted::ok_with(
        AbstractQuality {
            score,
            grade,
            suggestions,
        },
        diagnostics,
    )
}
