// ABOUTME: Corpus question-answering task over retrieved dataset context.
// ABOUTME: Answers must cite context ids; citations outside the context demote to ungrounded.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extract::strip_markdown;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::retrieval::RetrievalContext;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::validate::Diagnostic;

static CITATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[ID:\s*([^\]\s]+)\s*\]").unwrap());

const UNRELATED_PREFIX: &str = "UNRELATED:";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerInput {
    pub question: String,
    pub context: RetrievalContext,
}

/// A corpus answer. `grounded` is true only when every citation points into
/// the supplied context; ungrounded answers must be presented as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusAnswer {
    pub answer: String,
    pub cited_ids: Vec<String>,
    pub grounded: bool,
    pub off_topic: bool,
}

impl CorpusAnswer {
    /// The fixed ungrounded reply used when retrieval finds nothing; no
    /// provider output is involved, so nothing can be fabricated.
    pub fn ungrounded(question: &str) -> Self {
        CorpusAnswer {
            answer: format!("I couldn't find any matching datasets for '{question}'."),
            cited_ids: Vec::new(),
            grounded: false,
            off_topic: false,
        }
    }
}

pub struct AnswerTask;

impl AssistTask for AnswerTask {
    const KIND: TaskKind = TaskKind::CorpusAnswer;

    type Input = AnswerInput;
    type Output = CorpusAnswer;

    fn guard(input: &AnswerInput) -> Option<Diagnostic> {
        input
            .context
            .is_empty()
            .then(|| Diagnostic::error("context", "no grounding context supplied"))
    }

    fn prompt(input: &AnswerInput) -> CompletionRequest {
        prompt::answer(&input.question, &input.context)
    }

    fn interpret(input: &AnswerInput, raw: &str) -> Interpreted<CorpusAnswer> {
        let mut answer = strip_markdown(raw);
        if answer.is_empty() {
            return Interpreted::malformed("empty answer text");
        }

        let off_topic = answer.to_uppercase().starts_with(UNRELATED_PREFIX);
        if off_topic {
            answer = answer[UNRELATED_PREFIX.len()..].trim().to_string();
        }

        let mut diagnostics = Vec::new();
        let known: HashSet<&str> = input.context.ids().into_iter().collect();

        let mut cited_ids = Vec::new();
        for captures in CITATION.captures_iter(&answer) {
            let id = captures[1].to_string();
            if !cited_ids.contains(&id) {
                cited_ids.push(id);
            }
        }

        let mut grounded = !off_topic && !cited_ids.is_empty();
        for id in &cited_ids {
            if !known.contains(id.as_str()) {
                diagnostics.push(Diagnostic::warning(
                    "citations",
                    format!("cited dataset '{id}' is not in the supplied context"),
                ));
                grounded = false;
            }
        }
        if !off_topic && cited_ids.is_empty() {
            diagnostics.push(Diagnostic::warning("citations", "answer cites no datasets"));
        }

        Interpreted::ok_with(
            CorpusAnswer {
                answer,
                cited_ids,
                grounded,
                off_topic,
            },
            diagnostics,
        )
    }
}
