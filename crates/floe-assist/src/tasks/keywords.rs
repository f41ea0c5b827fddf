// ABOUTME: Keyword suggestion task: GCMD-style keywords from title and abstract.
// ABOUTME: Accepts a bare JSON array or a {"keywords": [...]} object.

use floe_core::limits::{KEYWORD_MAX_CHARS, KEYWORDS_MAX};
use floe_core::taxonomy::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::extract_json;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::tasks::SubmissionDraft;
use crate::validate::Diagnostic;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsInput {
    pub draft: SubmissionDraft,
    /// Known category, if classification already ran; sharpens the prompt.
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub keywords: Vec<String>,
}

pub struct KeywordsTask;

impl AssistTask for KeywordsTask {
    const KIND: TaskKind = TaskKind::Keywords;

    type Input = KeywordsInput;
    type Output = KeywordSet;

    fn prompt(input: &KeywordsInput) -> CompletionRequest {
        prompt::keywords(
            &input.draft.title,
            &input.draft.abstract_text,
            input.category,
            KEYWORDS_MAX,
        )
    }

    fn interpret(_input: &KeywordsInput, raw: &str) -> Interpreted<KeywordSet> {
        let Some(value) = extract_json(raw) else {
            return Interpreted::malformed("no JSON array in keywords response");
        };
        interpret_value(&value)
    }
}

pub(crate) fn interpret_value(value: &Value) -> Interpreted<KeywordSet> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(_) => value
            .get("keywords")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };

    let mut diagnostics = Vec::new();
    let mut keywords = Vec::new();

    for item in items {
        let Some(keyword) = item.as_str().map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        if keyword.chars().count() > KEYWORD_MAX_CHARS {
            diagnostics.push(Diagnostic::warning(
                "keywords",
                format!("dropped over-long keyword ({} characters)", keyword.chars().count()),
            ));
            continue;
        }
        if keywords.iter().any(|k: &String| k.eq_ignore_ascii_case(keyword)) {
            continue;
        }
        keywords.push(keyword.to_string());
        if keywords.len() == KEYWORDS_MAX {
            break;
        }
    }

    if keywords.is_empty() {
        diagnostics.push(Diagnostic::error("keywords", "no usable keywords in response"));
        return Interpreted::invalid(diagnostics);
    }

    Interpreted::ok_with(KeywordSet { keywords }, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> KeywordsInput {
        KeywordsInput {
            draft: SubmissionDraft::new("T", "A", None),
            category: Some(Category::Cryosphere),
        }
    }

    #[test]
    fn bare_array_parses() {
        let raw = r#"["Glaciology", "Ice Core Analysis", "Antarctica"]"#;
        let result = KeywordsTask::interpret(&input(), raw);
        assert_eq!(
            result.output.unwrap().keywords,
            vec!["Glaciology", "Ice Core Analysis", "Antarctica"]
        );
    }

    #[test]
    fn object_wrapped_array_parses() {
        let raw = r#"{"keywords": ["Sea Ice", "Remote Sensing"]}"#;
        let result = KeywordsTask::interpret(&input(), raw);
        assert_eq!(result.output.unwrap().keywords.len(), 2);
    }

    #[test]
    fn list_is_capped_and_deduplicated() {
        let many: Vec<String> = (0..15).map(|i| format!("kw{i}")).collect();
        let mut with_dupe = many.clone();
        with_dupe.insert(1, "KW0".to_string());
        let raw = serde_json::to_string(&with_dupe).unwrap();

        let result = KeywordsTask::interpret(&input(), &raw);
        let keywords = result.output.unwrap().keywords;
        assert_eq!(keywords.len(), KEYWORDS_MAX);
        assert_eq!(keywords[0], "kw0");
        assert_eq!(keywords[1], "kw1", "case-insensitive duplicate dropped");
    }

    #[test]
    fn over_long_keyword_dropped_with_warning() {
        let long = "x".repeat(120);
        let raw = format!(r#"["Glaciology", "{long}"]"#);
        let result = KeywordsTask::interpret(&input(), &raw);

        assert_eq!(result.output.unwrap().keywords, vec!["Glaciology"]);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn empty_list_fails() {
        let result = KeywordsTask::interpret(&input(), r#"[]"#);
        assert!(result.output.is_none());
    }

    #[test]
    fn prose_without_structure_is_malformed() {
        let result = KeywordsTask::interpret(&input(), "glaciology, sea ice");
        assert!(result.output.is_none());
        assert_eq!(result.diagnostics[0].field, "response");
    }
}
