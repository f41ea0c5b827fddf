// ABOUTME: Retrieval component: selects bounded grounding context for corpus answering.
// ABOUTME: The AnswerEngine wires retrieval into the answer task and never fabricates when retrieval is empty.

use std::sync::Arc;
use std::time::Instant;

use floe_core::filter::FilterQuery;
use floe_core::index::DatasetIndex;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::task::{AssistanceResult, Assistant, Outcome};
use crate::tasks::answer::{AnswerInput, AnswerTask, CorpusAnswer};
use crate::validate::Diagnostic;

/// Most context entries handed to the answer task.
pub const CONTEXT_MAX_ENTRIES: usize = 5;
/// Total character budget across all rendered entries.
pub const CONTEXT_MAX_CHARS: usize = 4000;
/// Longest abstract excerpt per entry.
pub const EXCERPT_MAX_CHARS: usize = 300;

/// Question words and glue that carry no search signal.
const STOPWORDS: [&str; 28] = [
    "the", "and", "for", "with", "from", "about", "what", "which", "where", "when", "who", "how",
    "many", "much", "are", "is", "was", "were", "there", "any", "all", "show", "find", "give",
    "list", "data", "dataset", "datasets",
];

/// One grounding entry: enough metadata to cite, short enough to afford.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub id: String,
    pub title: String,
    pub excerpt: String,
}

/// Ordered, bounded grounding context for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalContext {
    pub entries: Vec<ContextEntry>,
    /// True when the entry count or character budget cut material.
    pub truncated: bool,
}

impl RetrievalContext {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            truncated: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    /// Render entries the way the answer template expects them.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "{n}. [ID: {id}] {title}\n   {excerpt}\n",
                    n = i + 1,
                    id = entry.id,
                    title = entry.title,
                    excerpt = entry.excerpt,
                )
            })
            .collect()
    }
}

/// Split a question into search-significant terms.
pub(crate) fn significant_terms(question: &str) -> Vec<String> {
    question
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|term| term.len() >= 3 && !STOPWORDS.contains(&term.as_str()))
        .collect()
}

/// Select a relevance-ranked, bounded context for the question. Read-only
/// against the index; holds nothing across the provider call that follows.
pub fn build_context(index: &dyn DatasetIndex, question: &str) -> RetrievalContext {
    let terms = significant_terms(question);
    if terms.is_empty() {
        return RetrievalContext::empty();
    }

    let records = index.search(&FilterQuery::from_terms(terms), CONTEXT_MAX_ENTRIES);

    let mut entries = Vec::new();
    let mut used_chars = 0usize;
    let mut truncated = false;

    for record in &records {
        let mut excerpt: String = record.abstract_text.chars().take(EXCERPT_MAX_CHARS).collect();
        if excerpt.len() < record.abstract_text.len() {
            truncated = true;
        }
        let entry_chars = record.id.chars().count() + record.title.chars().count() + excerpt.chars().count();
        if used_chars + entry_chars > CONTEXT_MAX_CHARS {
            truncated = true;
            let remaining = CONTEXT_MAX_CHARS.saturating_sub(used_chars);
            let overhead = record.id.chars().count() + record.title.chars().count();
            if remaining <= overhead {
                break;
            }
            excerpt = excerpt.chars().take(remaining - overhead).collect();
        }
        used_chars += record.id.chars().count() + record.title.chars().count() + excerpt.chars().count();
        entries.push(ContextEntry {
            id: record.id.clone(),
            title: record.title.clone(),
            excerpt,
        });
    }

    RetrievalContext { entries, truncated }
}

/// Retrieval-augmented question answering over the dataset corpus.
pub struct AnswerEngine {
    assistant: Assistant,
    index: Arc<dyn DatasetIndex>,
}

impl AnswerEngine {
    pub fn new(assistant: Assistant, index: Arc<dyn DatasetIndex>) -> Self {
        Self { assistant, index }
    }

    /// Answer a free-text question grounded in retrieved dataset metadata.
    ///
    /// With no usable context the result is an ungrounded canned answer and
    /// no provider call happens; nothing dataset-specific can be invented.
    pub async fn answer(&self, question: &str) -> AssistanceResult<CorpusAnswer> {
        let started = Instant::now();
        let correlation_id = Ulid::new();

        if self.assistant.gateway().is_disabled() {
            return AssistanceResult {
                outcome: Outcome::Disabled,
                output: None,
                diagnostics: Vec::new(),
                provider: None,
                elapsed: started.elapsed(),
                correlation_id,
            };
        }

        let context = build_context(&*self.index, question);
        if context.is_empty() {
            tracing::debug!(%correlation_id, "no grounding context found, returning ungrounded answer");
            return AssistanceResult {
                outcome: Outcome::Success,
                output: Some(CorpusAnswer::ungrounded(question)),
                diagnostics: vec![Diagnostic::warning(
                    "retrieval",
                    "no matching datasets found to ground an answer",
                )],
                provider: None,
                elapsed: started.elapsed(),
                correlation_id,
            };
        }

        let input = AnswerInput {
            question: question.to_string(),
            context,
        };
        self.assistant.run::<AnswerTask>(&input).await
    }
}
