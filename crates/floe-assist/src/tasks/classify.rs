// ABOUTME: Dataset classification task: category, sub-topic, and ISO topic.
// ABOUTME: Enumerated fields are rejected on mismatch, never silently defaulted.

use floe_core::taxonomy::{Category, IsoTopic};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::extract_json;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::tasks::{SubmissionDraft, str_field};
use crate::validate::Diagnostic;

/// A validated classification. `topic` is advisory; the enum fields are the
/// contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub topic: Option<String>,
    pub iso_topic: IsoTopic,
}

pub struct ClassifyTask;

impl AssistTask for ClassifyTask {
    const KIND: TaskKind = TaskKind::Classify;

    type Input = SubmissionDraft;
    type Output = Classification;

    fn prompt(input: &SubmissionDraft) -> CompletionRequest {
        prompt::classify(&input.title, &input.abstract_text, input.expedition)
    }

    fn interpret(_input: &SubmissionDraft, raw: &str) -> Interpreted<Classification> {
        let Some(value) = extract_json(raw) else {
            return Interpreted::malformed("no JSON object in classification response");
        };
        interpret_value(&value)
    }
}

/// Shared with the combined pre-fill task, which embeds the same section.
pub(crate) fn interpret_value(value: &Value) -> Interpreted<Classification> {
    let mut diagnostics = Vec::new();

    let category = match str_field(value, "category") {
        None => {
            diagnostics.push(Diagnostic::error("category", "required field is missing"));
            None
        }
        Some(raw) => match Category::from_key(&raw) {
            Some(category) => Some(category),
            None => {
                diagnostics.push(Diagnostic::error(
                    "category",
                    format!("'{raw}' is not a recognized category key"),
                ));
                None
            }
        },
    };

    let iso_topic = match str_field(value, "iso_topic") {
        None => {
            diagnostics.push(Diagnostic::error("iso_topic", "required field is missing"));
            None
        }
        Some(raw) => match IsoTopic::from_key(&raw) {
            Some(topic) => Some(topic),
            None => {
                diagnostics.push(Diagnostic::error(
                    "iso_topic",
                    format!("'{raw}' is not a recognized ISO topic key"),
                ));
                None
            }
        },
    };

    let topic = str_field(value, "topic");
    if let (Some(category), Some(topic_name)) = (category, topic.as_deref())
        && !category.topics().contains(&topic_name)
    {
        diagnostics.push(Diagnostic::warning(
            "topic",
            format!("'{topic_name}' is not a listed topic for category '{}'", category.key()),
        ));
    }

    match (category, iso_topic) {
        (Some(category), Some(iso_topic)) => Interpreted::ok_with(
            Classification {
                category,
                topic,
                iso_topic,
            },
            diagnostics,
        ),
        _ => Interpreted::invalid(diagnostics),
    }
}
