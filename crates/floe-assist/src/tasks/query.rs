// ABOUTME: Query-understanding task: natural-language search text into FilterQuery parts.
// ABOUTME: Unknown filter values are dropped with warnings; free-text terms are never discarded.

use std::sync::LazyLock;

use floe_core::filter::{FilterQuery, YearSpan};
use floe_core::taxonomy::{Category, ExpeditionType, IsoTopic};
use regex::Regex;

use crate::extract::extract_json;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::tasks::str_field;
use crate::validate::Diagnostic;

static YEAR_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(?:\s*-\s*(\d{4}))?$").unwrap());

/// Longest keyword string accepted from the parser.
const KEYWORDS_MAX_CHARS: usize = 200;

pub struct QueryParseTask;

impl AssistTask for QueryParseTask {
    const KIND: TaskKind = TaskKind::QueryParse;

    type Input = String;
    type Output = FilterQuery;

    fn prompt(input: &String) -> CompletionRequest {
        prompt::query(input)
    }

    fn interpret(input: &String, raw: &str) -> Interpreted<FilterQuery> {
        let Some(value) = extract_json(raw) else {
            return Interpreted::malformed("no JSON object in query-parse response");
        };

        let mut diagnostics = Vec::new();
        let mut filter = FilterQuery::default();

        if let Some(raw_keywords) = str_field(&value, "keywords") {
            let mut keywords = raw_keywords;
            if keywords.chars().count() > KEYWORDS_MAX_CHARS {
                keywords = keywords.chars().take(KEYWORDS_MAX_CHARS).collect();
            }
            filter.terms = keywords.split_whitespace().map(String::from).collect();
        }

        if let Some(raw_expedition) = str_field(&value, "expedition") {
            match ExpeditionType::from_key(&raw_expedition) {
                Some(expedition) => filter.expedition = Some(expedition),
                None => diagnostics.push(Diagnostic::warning(
                    "expedition",
                    format!("'{raw_expedition}' is not a known expedition type, dropped"),
                )),
            }
        }

        if let Some(raw_category) = str_field(&value, "category") {
            match Category::from_key(&raw_category) {
                Some(category) => filter.category = Some(category),
                None => diagnostics.push(Diagnostic::warning(
                    "category",
                    format!("'{raw_category}' is not a known category, dropped"),
                )),
            }
        }

        if let Some(raw_iso) = str_field(&value, "iso_topic") {
            match IsoTopic::from_key(&raw_iso) {
                Some(iso) => filter.iso_topic = Some(iso),
                None => diagnostics.push(Diagnostic::warning(
                    "iso_topic",
                    format!("'{raw_iso}' is not a known ISO topic, dropped"),
                )),
            }
        }

        if let Some(raw_year) = str_field(&value, "year") {
            match parse_year_span(&raw_year) {
                Some(span) => filter.years = Some(span),
                None => diagnostics.push(Diagnostic::warning(
                    "year",
                    format!("'{raw_year}' is not a usable year within the corpus range, dropped"),
                )),
            }
        }

        // The query itself is the floor: if the parser produced no usable
        // predicate at all, the raw text carries on as free-text terms.
        if filter.is_empty() {
            filter.terms = input.split_whitespace().map(String::from).collect();
        }

        Interpreted::ok_with(filter, diagnostics)
    }
}

/// Accepts "2024" or "2024-2025", bounded by the corpus year range.
pub(crate) fn parse_year_span(raw: &str) -> Option<YearSpan> {
    let captures = YEAR_FORM.captures(raw.trim())?;
    let start: u16 = captures.get(1)?.as_str().parse().ok()?;
    let end: u16 = match captures.get(2) {
        Some(end) => end.as_str().parse().ok()?,
        None => start,
    };
    YearSpan::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_fields_map_to_predicates() {
        let raw = r#"{"keywords": "glacier", "expedition": "himalaya", "year": "2024", "category": "cryosphere"}"#;
        let result = QueryParseTask::interpret(&"show me glacier data from Himalaya 2024".to_string(), raw);

        let filter = result.output.unwrap();
        assert_eq!(filter.expedition, Some(ExpeditionType::Himalaya));
        assert_eq!(filter.category, Some(Category::Cryosphere));
        assert_eq!(filter.years, YearSpan::single(2024));
        assert_eq!(filter.terms, vec!["glacier"], "free-text term retained");
    }

    #[test]
    fn unknown_enum_values_dropped_with_warnings() {
        let raw = r#"{"keywords": "ice", "expedition": "lunar", "category": "volcanology", "iso_topic": "space"}"#;
        let result = QueryParseTask::interpret(&"ice".to_string(), raw);

        let filter = result.output.unwrap();
        assert!(filter.expedition.is_none());
        assert!(filter.category.is_none());
        assert!(filter.iso_topic.is_none());
        assert_eq!(filter.terms, vec!["ice"]);
        assert_eq!(result.diagnostics.len(), 3);
    }

    #[test]
    fn year_span_form_parses_and_bounds() {
        assert_eq!(parse_year_span("2024-2025"), YearSpan::new(2024, 2025));
        assert_eq!(parse_year_span(" 2024 "), YearSpan::single(2024));
        assert_eq!(parse_year_span("1492"), None, "outside corpus range");
        assert_eq!(parse_year_span("24"), None);
        assert_eq!(parse_year_span("2024ish"), None);
    }

    #[test]
    fn empty_parse_falls_back_to_raw_query_terms() {
        let result = QueryParseTask::interpret(&"katabatic winds".to_string(), r#"{}"#);
        let filter = result.output.unwrap();
        assert_eq!(filter.terms, vec!["katabatic", "winds"]);
    }

    #[test]
    fn over_long_keywords_are_truncated() {
        let long = "word ".repeat(100);
        let raw = format!(r#"{{"keywords": "{}"}}"#, long.trim());
        let result = QueryParseTask::interpret(&"q".to_string(), &raw);

        let filter = result.output.unwrap();
        let total: usize = filter.terms.iter().map(|t| t.len() + 1).sum();
        assert!(total <= KEYWORDS_MAX_CHARS + 1);
    }

    #[test]
    fn unstructured_response_is_malformed() {
        let result = QueryParseTask::interpret(&"q".to_string(), "try searching for ice");
        assert!(result.output.is_none());
    }
}
