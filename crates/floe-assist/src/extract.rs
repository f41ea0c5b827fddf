// ABOUTME: Structured extraction from raw provider output.
// ABOUTME: Parse ladder: direct JSON, fenced code block, outermost brace scan, then give up.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").unwrap());

static BOLD_MARKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static HEADING_MARKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#+\s*").unwrap());

/// Extract a JSON value from raw model output.
///
/// Models asked for "ONLY valid JSON" still wrap payloads in prose or
/// markdown fences often enough that a single `from_str` is not usable.
pub fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(captures) = FENCED_JSON.captures(trimmed)
        && let Some(inner) = captures.get(1)
        && let Ok(value) = serde_json::from_str::<Value>(inner.as_str())
    {
        return Some(value);
    }

    // Outermost object, then outermost array.
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let Some(start) = trimmed.find(open)
            && let Some(end) = trimmed.rfind(close)
            && start < end
            && let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end])
        {
            return Some(value);
        }
    }

    None
}

/// Remove markdown bold/heading markers that slip through plain-text
/// instructions.
pub fn strip_markdown(text: &str) -> String {
    let without_bold = BOLD_MARKS.replace_all(text, "$1");
    HEADING_MARKS.replace_all(&without_bold, "").trim().to_string()
}

/// Best-effort free-text salvage: the first non-empty line, unquoted and
/// unfenced. Only tolerant tasks (title, purpose drafts) may use this;
/// enumerated and numeric tasks never do.
pub fn first_usable_line(raw: &str) -> Option<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(|line| strip_markdown(line.trim_matches('"').trim()))
        .find(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direct_json_parses() {
        let value = extract_json(r#"{"category": "cryosphere"}"#).unwrap();
        assert_eq!(value, json!({"category": "cryosphere"}));
    }

    #[test]
    fn fenced_json_parses() {
        let raw = "Here you go:\n```json\n{\"score\": 80}\n```\nHope that helps!";
        assert_eq!(extract_json(raw).unwrap(), json!({"score": 80}));
    }

    #[test]
    fn unfenced_prose_wrapped_json_parses() {
        let raw = "The classification is {\"category\": \"oceans\", \"topic\": \"Hydrography\"} as requested.";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["category"], "oceans");
    }

    #[test]
    fn bare_array_parses() {
        let raw = "Keywords: [\"Glaciology\", \"Sea Ice\"]";
        let value = extract_json(raw).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn garbage_yields_none() {
        assert_eq!(extract_json("no structure here at all"), None);
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("{broken: json"), None);
    }

    #[test]
    fn strip_markdown_removes_bold_and_headings() {
        assert_eq!(
            strip_markdown("## Summary\n**Three** datasets found"),
            "Summary\nThree datasets found"
        );
    }

    #[test]
    fn first_usable_line_skips_fences_and_quotes() {
        let raw = "```\n\n\"Antarctic Lake Sediment Cores\"\nsecond line";
        assert_eq!(
            first_usable_line(raw).as_deref(),
            Some("Antarctic Lake Sediment Cores")
        );
        assert_eq!(first_usable_line("   \n\n"), None);
    }
}
