// ABOUTME: End-to-end smoke test for the assistance layer.
// ABOUTME: Drives query translation, search recovery, submission helpers, and corpus answering over stubs.

use std::sync::Arc;
use std::time::Duration;

use floe_assist::gateway::{ProviderGateway, ProviderSlot};
use floe_assist::tasks::SubmissionDraft;
use floe_assist::tasks::classify::ClassifyTask;
use floe_assist::tasks::title::{TitleInput, TitleTask};
use floe_assist::testing::StubProvider;
use floe_assist::{AnswerEngine, Assistant, Outcome, QueryTranslator};
use floe_core::taxonomy::{Category, ExpeditionType};
use floe_core::{DatasetRecord, MemoryIndex};

fn dataset(id: &str, title: &str, abstract_text: &str, expedition: ExpeditionType) -> DatasetRecord {
    DatasetRecord {
        id: id.to_string(),
        title: title.to_string(),
        abstract_text: abstract_text.to_string(),
        keywords: vec!["Glaciology".to_string()],
        category: Category::Cryosphere,
        expedition,
        iso_topic: None,
        expedition_year: Some(2024),
        temporal_start: None,
        temporal_end: None,
        bounds: None,
        doi: Some(format!("10.5000/{}", id.to_lowercase())),
    }
}

fn corpus() -> Arc<MemoryIndex> {
    Arc::new(MemoryIndex::new(vec![
        dataset(
            "FL-101",
            "Himalayan Glacier Velocity Survey",
            "Annual stake velocities on three benchmark glaciers in the Khumbu region, 2022-2024.",
            ExpeditionType::Himalaya,
        ),
        dataset(
            "FL-102",
            "Arctic Sea Ice Extent Composite",
            "Weekly sea ice extent composites for the Fram Strait sector.",
            ExpeditionType::Arctic,
        ),
    ]))
}

fn assistant(provider: StubProvider) -> Assistant {
    let gateway = ProviderGateway::new(vec![ProviderSlot {
        provider: Arc::new(provider),
        timeout: Duration::from_millis(200),
        max_retries: 0,
    }]);
    Assistant::new(Arc::new(gateway))
}

#[tokio::test]
async fn query_to_results_full_path() {
    // 1. Natural-language query becomes structured predicates.
    let translator = QueryTranslator::new(
        assistant(StubProvider::with_text(
            "groq",
            r#"{"keywords": "glacier", "expedition": "himalaya", "year": "2024", "category": "cryosphere"}"#,
        )),
        corpus(),
    );

    let outcome = translator.search("show me glacier data from Himalaya 2024").await;

    // 2. Predicates carried the structured filters plus the free-text term.
    assert_eq!(outcome.translation, Outcome::Success);
    assert_eq!(outcome.filter.expedition, Some(ExpeditionType::Himalaya));
    assert_eq!(outcome.filter.category, Some(Category::Cryosphere));
    assert!(outcome.filter.years.unwrap().contains(2024));
    assert_eq!(outcome.filter.terms, vec!["glacier"]);

    // 3. The index returned the matching record, no recovery needed.
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].id, "FL-101");
    assert!(outcome.recovery.is_none());
}

#[tokio::test]
async fn misspelled_query_recovers_once() {
    let translator = QueryTranslator::new(
        assistant(StubProvider::with_responses(
            "groq",
            [
                r#"{"keywords": "glasier velocety"}"#,
                r#"{"corrected_query": "glacier velocity", "suggestions": ["sea ice extent"]}"#,
            ],
        )),
        corpus(),
    );

    let outcome = translator.search("glasier velocety").await;

    let recovery = outcome.recovery.expect("zero results should trigger recovery");
    assert_eq!(recovery.rounds, 1);
    assert_eq!(recovery.recovered_with.as_deref(), Some("glacier velocity"));
    assert_eq!(outcome.records[0].id, "FL-101");
}

#[tokio::test]
async fn disabled_everything_keeps_baseline_search_alive() {
    let disabled = Assistant::new(Arc::new(ProviderGateway::new(Vec::new())));

    // Submission helpers answer Disabled instantly.
    let draft = SubmissionDraft::new("T", "A draft abstract long enough to classify.", None);
    let result = disabled.run::<ClassifyTask>(&draft).await;
    assert_eq!(result.outcome, Outcome::Disabled);

    // Search still works on raw terms.
    let translator = QueryTranslator::new(disabled.clone(), corpus());
    let outcome = translator.search("sea ice").await;
    assert_eq!(outcome.translation, Outcome::Disabled);
    assert_eq!(outcome.records[0].id, "FL-102");

    // Question answering reports Disabled rather than failing.
    let engine = AnswerEngine::new(disabled, corpus());
    assert_eq!(engine.answer("glacier data?").await.outcome, Outcome::Disabled);
}

#[tokio::test]
async fn grounded_answer_cites_corpus_ids() {
    let engine = AnswerEngine::new(
        assistant(StubProvider::with_text(
            "groq",
            "I found 1 dataset about glacier velocity.\n\
             Himalayan Glacier Velocity Survey [ID: FL-101]: annual stake velocities from Khumbu.",
        )),
        corpus(),
    );

    let result = engine.answer("What glacier velocity data do you have?").await;

    assert_eq!(result.outcome, Outcome::Success);
    let answer = result.output.unwrap();
    assert!(answer.grounded);
    assert_eq!(answer.cited_ids, vec!["FL-101"]);
}

#[tokio::test]
async fn fallback_provider_marks_submission_helper_degraded() {
    let gateway = ProviderGateway::new(vec![
        ProviderSlot {
            provider: Arc::new(StubProvider::failing("groq")),
            timeout: Duration::from_millis(200),
            max_retries: 0,
        },
        ProviderSlot {
            provider: Arc::new(StubProvider::with_text(
                "openrouter",
                r#"{"title": "Khumbu Glacier Stake Velocity Records", "alternatives": []}"#,
            )),
            timeout: Duration::from_millis(200),
            max_retries: 0,
        },
    ]);
    let assistant = Assistant::new(Arc::new(gateway));

    let input = TitleInput {
        abstract_text: "Annual stake velocities on three benchmark glaciers.".to_string(),
        expedition: Some(ExpeditionType::Himalaya),
    };
    let result = assistant.run::<TitleTask>(&input).await;

    assert_eq!(result.outcome, Outcome::Degraded);
    assert_eq!(result.provider.as_deref(), Some("openrouter"));
    assert_eq!(
        result.output.unwrap().title,
        "Khumbu Glacier Stake Velocity Records"
    );
}
