// ABOUTME: Query-to-filter translation and search execution with zero-result recovery.
// ABOUTME: DOI queries bypass the pipeline; recovery is capped and never repeats a tried query.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use floe_core::filter::FilterQuery;
use floe_core::index::{DatasetIndex, DatasetRecord};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::extract::extract_json;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, AssistanceResult, Assistant, Interpreted, Outcome, TaskKind};
use crate::tasks::query::QueryParseTask;
use crate::tasks::{str_field, string_list};

/// Hard cap on zero-result recovery rounds per search.
pub const MAX_RECOVERY_ROUNDS: usize = 2;
/// Result page size handed to the index.
pub const SEARCH_LIMIT: usize = 25;
/// Corpus terms sampled into the recovery prompt.
const RECOVERY_TERM_SAMPLE: usize = 30;

/// What zero-result recovery did for one search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoveryReport {
    pub rounds: usize,
    pub attempted_queries: Vec<String>,
    /// The alternative query that produced results, if any did.
    pub recovered_with: Option<String>,
    pub suggestions: Vec<String>,
    pub off_topic: bool,
}

/// A full search pass: the executed predicate set, its results, the status
/// of the translation step, and any recovery activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub filter: FilterQuery,
    pub records: Vec<DatasetRecord>,
    pub translation: Outcome,
    pub recovery: Option<RecoveryReport>,
}

/// Recovery suggestion payload from the recovery template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySuggestions {
    pub corrected_query: Option<String>,
    pub suggestions: Vec<String>,
    pub off_topic: bool,
}

#[derive(Debug, Clone)]
pub struct RecoveryInput {
    pub query: String,
    pub known_terms: Vec<String>,
}

/// Internal adapter behind the translator's recovery flow. Runs through the
/// same pipeline as every other task; logged under the query capability.
struct RecoveryTask;

impl AssistTask for RecoveryTask {
    const KIND: TaskKind = TaskKind::QueryParse;

    type Input = RecoveryInput;
    type Output = RecoverySuggestions;

    fn prompt(input: &RecoveryInput) -> CompletionRequest {
        prompt::recovery(&input.query, &input.known_terms)
    }

    fn interpret(_input: &RecoveryInput, raw: &str) -> Interpreted<RecoverySuggestions> {
        let Some(value) = extract_json(raw) else {
            return Interpreted::malformed("no JSON object in recovery response");
        };

        let mut suggestions = string_list(&value, "suggestions");
        suggestions.truncate(4);
        for suggestion in &mut suggestions {
            if suggestion.chars().count() > 100 {
                *suggestion = suggestion.chars().take(100).collect();
            }
        }

        let corrected_query = str_field(&value, "corrected_query")
            .map(|q| q.chars().take(200).collect::<String>());

        Interpreted::ok(RecoverySuggestions {
            corrected_query,
            suggestions,
            off_topic: value
                .get("off_topic")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }
}

/// Turns natural-language queries into filter predicates and executes them
/// against the dataset index.
pub struct QueryTranslator {
    assistant: Assistant,
    index: Arc<dyn DatasetIndex>,
}

impl QueryTranslator {
    pub fn new(assistant: Assistant, index: Arc<dyn DatasetIndex>) -> Self {
        Self { assistant, index }
    }

    /// Translate a query into a predicate set.
    ///
    /// DOI-style input (a `10.` prefix) short-circuits to a DOI-exact
    /// predicate with no provider involvement at all.
    pub async fn translate(&self, query: &str) -> AssistanceResult<FilterQuery> {
        let trimmed = query.trim();

        if trimmed.starts_with("10.") {
            return AssistanceResult {
                outcome: Outcome::Success,
                output: Some(FilterQuery::doi_exact(trimmed)),
                diagnostics: Vec::new(),
                provider: None,
                elapsed: Instant::now().elapsed(),
                correlation_id: Ulid::new(),
            };
        }

        self.assistant.run::<QueryParseTask>(&trimmed.to_string()).await
    }

    /// Whitespace-split fallback used whenever translation is unavailable.
    /// Baseline search keeps working with the gateway Disabled or Failed.
    fn fallback_filter(query: &str) -> FilterQuery {
        FilterQuery::from_terms(query.split_whitespace())
    }

    /// Translate, execute, and if the result set is empty run bounded
    /// zero-result recovery.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let translation = self.translate(query).await;
        let translation_outcome = translation.outcome;

        let filter = translation
            .output
            .unwrap_or_else(|| Self::fallback_filter(query));

        let records = self.index.search(&filter, SEARCH_LIMIT);

        // DOI lookups are exact: an empty result means the DOI is absent,
        // and suggesting "similar DOIs" would be noise.
        if !records.is_empty() || filter.doi.is_some() {
            return SearchOutcome {
                filter,
                records,
                translation: translation_outcome,
                recovery: None,
            };
        }

        let recovery = self.recover(query).await;
        let records = recovery
            .1
            .unwrap_or_default();

        SearchOutcome {
            filter,
            records,
            translation: translation_outcome,
            recovery: Some(recovery.0),
        }
    }

    /// Bounded recovery: one suggestion call, then up to
    /// `MAX_RECOVERY_ROUNDS` alternative searches. The original query and
    /// every attempted alternative are tracked so no query runs twice.
    async fn recover(&self, original_query: &str) -> (RecoveryReport, Option<Vec<DatasetRecord>>) {
        let mut report = RecoveryReport::default();

        if self.assistant.gateway().is_disabled() {
            return (report, None);
        }

        let input = RecoveryInput {
            query: original_query.to_string(),
            known_terms: self.index.sample_terms(RECOVERY_TERM_SAMPLE),
        };
        let result = self.assistant.run::<RecoveryTask>(&input).await;
        let Some(suggestions) = result.output else {
            return (report, None);
        };

        report.suggestions = suggestions.suggestions.clone();
        report.off_topic = suggestions.off_topic;

        // Scope check: an off-topic query gets no alternative searches.
        if suggestions.off_topic {
            tracing::info!(query = %original_query, "query classified outside the portal's domain");
            return (report, None);
        }

        let mut tried: HashSet<String> = HashSet::new();
        tried.insert(normalize(original_query));

        let candidates = suggestions
            .corrected_query
            .into_iter()
            .chain(suggestions.suggestions);

        for candidate in candidates {
            if report.rounds == MAX_RECOVERY_ROUNDS {
                break;
            }
            if !tried.insert(normalize(&candidate)) {
                // Identical to the original or an earlier attempt.
                continue;
            }

            report.rounds += 1;
            report.attempted_queries.push(candidate.clone());

            let filter = Self::fallback_filter(&candidate);
            let records = self.index.search(&filter, SEARCH_LIMIT);
            tracing::debug!(
                round = report.rounds,
                candidate = %candidate,
                hits = records.len(),
                "zero-result recovery attempt"
            );

            if !records.is_empty() {
                report.recovered_with = Some(candidate);
                return (report, Some(records));
            }
        }

        (report, None)
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}
