// ABOUTME: Title drafting task: one primary title plus up to two alternatives.
// ABOUTME: Tolerant task: a free-text line salvages a response without JSON structure.

use floe_core::limits::{TITLE_ALTERNATIVES_MAX, TITLE_MAX_CHARS};
use floe_core::taxonomy::ExpeditionType;
use serde::{Deserialize, Serialize};

use crate::extract::{extract_json, first_usable_line};
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::tasks::{MIN_ABSTRACT_FOR_GENERATION, guard_min_abstract, string_list};
use crate::validate::{Diagnostic, check_max_chars, require_non_empty};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleInput {
    pub abstract_text: String,
    pub expedition: Option<ExpeditionType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSuggestion {
    pub title: String,
    pub alternatives: Vec<String>,
}

pub struct TitleTask;

impl AssistTask for TitleTask {
    const KIND: TaskKind = TaskKind::TitleDraft;

    type Input = TitleInput;
    type Output = TitleSuggestion;

    fn guard(input: &TitleInput) -> Option<Diagnostic> {
        guard_min_abstract(&input.abstract_text, MIN_ABSTRACT_FOR_GENERATION)
    }

    fn prompt(input: &TitleInput) -> CompletionRequest {
        prompt::title(&input.abstract_text, input.expedition)
    }

    fn interpret(_input: &TitleInput, raw: &str) -> Interpreted<TitleSuggestion> {
        let (title, alternatives) = match extract_json(raw) {
            Some(value) => {
                let title = value
                    .get("title")
                    .and_then(|t| t.as_str())
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string();
                (title, string_list(&value, "alternatives"))
            }
            // Generated prose tolerates a free-text fallback; the first
            // usable line is taken as the title candidate.
            None => match first_usable_line(raw) {
                Some(line) => (line, Vec::new()),
                None => return Interpreted::malformed("no title candidate in response"),
            },
        };

        let mut diagnostics = Vec::new();
        if let Some(diagnostic) = require_non_empty("title", &title) {
            diagnostics.push(diagnostic);
        }
        if let Some(diagnostic) = check_max_chars("title", &title, TITLE_MAX_CHARS) {
            diagnostics.push(diagnostic);
        }
        if !diagnostics.is_empty() {
            return Interpreted::invalid(diagnostics);
        }

        let mut kept = Vec::new();
        for alternative in alternatives {
            if kept.len() == TITLE_ALTERNATIVES_MAX {
                break;
            }
            if alternative.chars().count() > TITLE_MAX_CHARS {
                diagnostics.push(Diagnostic::warning(
                    "alternatives",
                    "dropped an over-long alternative title",
                ));
                continue;
            }
            kept.push(alternative);
        }

        Interpreted::ok_with(
            TitleSuggestion {
                title,
                alternatives: kept,
            },
            diagnostics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> TitleInput {
        TitleInput {
            abstract_text: "Continuous temperature records from the Maitri station network.".to_string(),
            expedition: Some(ExpeditionType::Antarctic),
        }
    }

    #[test]
    fn structured_response_parses() {
        let raw = r#"{"title": "Antarctic Station Temperature Records, Maitri", "alternatives": ["Maitri Temperature Series", "Antarctic Surface Temperatures"]}"#;
        let result = TitleTask::interpret(&input(), raw);

        let suggestion = result.output.unwrap();
        assert_eq!(suggestion.title, "Antarctic Station Temperature Records, Maitri");
        assert_eq!(suggestion.alternatives.len(), 2);
    }

    #[test]
    fn free_text_fallback_takes_first_line() {
        let raw = "Antarctic Station Temperature Records\nSome trailing explanation.";
        let result = TitleTask::interpret(&input(), raw);
        assert_eq!(result.output.unwrap().title, "Antarctic Station Temperature Records");
    }

    #[test]
    fn over_long_title_fails_even_from_structured_output() {
        let long = "t".repeat(300);
        let raw = format!(r#"{{"title": "{long}", "alternatives": []}}"#);
        let result = TitleTask::interpret(&input(), &raw);

        assert!(result.output.is_none());
        assert_eq!(result.diagnostics[0].field, "title");
    }

    #[test]
    fn empty_title_fails() {
        let result = TitleTask::interpret(&input(), r#"{"title": "", "alternatives": ["x"]}"#);
        assert!(result.output.is_none());
    }

    #[test]
    fn alternatives_capped_and_length_checked() {
        let long = "a".repeat(250);
        let raw = format!(
            r#"{{"title": "Fine Title", "alternatives": ["{long}", "Alt One", "Alt Two", "Alt Three"]}}"#
        );
        let result = TitleTask::interpret(&input(), &raw);

        let suggestion = result.output.unwrap();
        assert_eq!(suggestion.alternatives, vec!["Alt One", "Alt Two"]);
        assert_eq!(result.diagnostics.len(), 1, "over-long alternative is a warning");
    }

    #[test]
    fn short_abstract_is_guarded() {
        let short = TitleInput {
            abstract_text: "too short".to_string(),
            expedition: None,
        };
        assert!(TitleTask::guard(&short).is_some());
    }
}
