// ABOUTME: Combined form pre-fill task: classification, keywords, quality, spatial in one call.
// ABOUTME: Each section reuses its standalone ruleset; diagnostics are scoped per section.

use floe_core::taxonomy::ExpeditionType;
use serde::{Deserialize, Serialize};

use crate::extract::extract_json;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::tasks::classify::{self, Classification};
use crate::tasks::keywords;
use crate::tasks::quality::{self, AbstractQuality};
use crate::tasks::spatial::{self, SpatialExtent};
use crate::tasks::{MIN_ABSTRACT_FOR_GENERATION, SubmissionDraft, guard_min_abstract};
use crate::validate::{Diagnostic, has_errors};

/// Location fields derived from the expedition type and extracted subregion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationHint {
    pub category: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
}

/// Everything the submission form can be pre-filled with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPrefill {
    pub classification: Classification,
    pub keywords: Vec<String>,
    pub quality: AbstractQuality,
    pub spatial: SpatialExtent,
    pub location: LocationHint,
}

pub struct PrefillTask;

impl AssistTask for PrefillTask {
    const KIND: TaskKind = TaskKind::Prefill;

    type Input = SubmissionDraft;
    type Output = FormPrefill;

    fn guard(input: &SubmissionDraft) -> Option<Diagnostic> {
        guard_min_abstract(&input.abstract_text, MIN_ABSTRACT_FOR_GENERATION)
    }

    fn prompt(input: &SubmissionDraft) -> CompletionRequest {
        prompt::prefill(&input.title, &input.abstract_text, input.expedition)
    }

    fn interpret(input: &SubmissionDraft, raw: &str) -> Interpreted<FormPrefill> {
        let Some(value) = extract_json(raw) else {
            return Interpreted::malformed("no JSON object in prefill response");
        };

        let mut diagnostics = Vec::new();

        let section = |key: &str| value.get(key);

        let classification = match section("classification") {
            Some(section) => {
                let interpreted = classify::interpret_value(section);
                diagnostics.extend(interpreted.diagnostics.into_iter().map(|d| d.scoped("classification")));
                interpreted.output
            }
            None => {
                diagnostics.push(Diagnostic::error("classification", "required section is missing"));
                None
            }
        };

        let keyword_set = {
            let interpreted = keywords::interpret_value(&value);
            diagnostics.extend(interpreted.diagnostics.into_iter().map(|d| d.scoped("keywords")));
            interpreted.output
        };

        let abstract_quality = match section("abstract_quality") {
            Some(section) => {
                let interpreted = quality::interpret_value(section);
                diagnostics.extend(interpreted.diagnostics.into_iter().map(|d| d.scoped("abstract_quality")));
                interpreted.output
            }
            None => {
                diagnostics.push(Diagnostic::error("abstract_quality", "required section is missing"));
                None
            }
        };

        let spatial_extent = match section("spatial") {
            Some(section) => {
                let interpreted = spatial::interpret_value(input, section);
                diagnostics.extend(interpreted.diagnostics.into_iter().map(|d| d.scoped("spatial")));
                interpreted.output
            }
            None => {
                diagnostics.push(Diagnostic::error("spatial", "required section is missing"));
                None
            }
        };

        if has_errors(&diagnostics) {
            return Interpreted::invalid(diagnostics);
        }

        // All four unwraps are guarded by the error check above.
        let (Some(classification), Some(keyword_set), Some(abstract_quality), Some(spatial_extent)) =
            (classification, keyword_set, abstract_quality, spatial_extent)
        else {
            return Interpreted::invalid(diagnostics);
        };

        let location = derive_location(input.expedition, spatial_extent.subregion.clone());

        Interpreted::ok_with(
            FormPrefill {
                classification,
                keywords: keyword_set.keywords,
                quality: abstract_quality,
                spatial: spatial_extent,
                location,
            },
            diagnostics,
        )
    }
}

fn derive_location(expedition: Option<ExpeditionType>, subregion: Option<String>) -> LocationHint {
    let (category, region) = match expedition {
        Some(ExpeditionType::Antarctic) => (Some("region"), Some("Antarctica")),
        Some(ExpeditionType::Arctic) => (Some("region"), Some("Arctic")),
        Some(ExpeditionType::SouthernOcean) => (Some("ocean"), Some("Southern Ocean")),
        Some(ExpeditionType::Himalaya) => (Some("region"), Some("Himalaya")),
        None => (None, None),
    };
    LocationHint {
        category: category.map(String::from),
        region: region.map(String::from),
        subregion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floe_core::taxonomy::Category;

    fn draft() -> SubmissionDraft {
        SubmissionDraft::new(
            "Lake Monitoring",
            "Seasonal water chemistry from Schirmacher Oasis lakes, 2018-2022.",
            Some(ExpeditionType::Antarctic),
        )
    }

    fn full_response() -> String {
        serde_json::json!({
            "classification": {"category": "terrestrial_hydrosphere", "topic": "Cryosphere", "iso_topic": "inlandWaters"},
            "keywords": ["Limnology", "Water Chemistry", "Antarctica"],
            "abstract_quality": {"score": 81, "grade": "excellent", "suggestions": ["Mention sampling frequency"]},
            "spatial": {"north": -70.7, "south": -70.8, "east": 11.8, "west": 11.6,
                        "zone_type": "bounding_box", "location_name": "Schirmacher Oasis", "subregion": "Schirmacher Oasis"}
        })
        .to_string()
    }

    #[test]
    fn full_prefill_parses_all_sections() {
        let result = PrefillTask::interpret(&draft(), &full_response());

        let prefill = result.output.unwrap();
        assert_eq!(prefill.classification.category, Category::TerrestrialHydrosphere);
        assert_eq!(prefill.keywords.len(), 3);
        assert_eq!(prefill.quality.score, 81);
        assert_eq!(prefill.location.region.as_deref(), Some("Antarctica"));
        assert_eq!(prefill.location.subregion.as_deref(), Some("Schirmacher Oasis"));
    }

    #[test]
    fn missing_section_fails_with_scoped_diagnostic() {
        let raw = serde_json::json!({
            "classification": {"category": "cryosphere", "topic": "Sea Ice", "iso_topic": "environment"},
            "keywords": ["Sea Ice"],
            "abstract_quality": {"score": 60}
        })
        .to_string();

        let result = PrefillTask::interpret(&draft(), &raw);
        assert!(result.output.is_none());
        assert!(result.diagnostics.iter().any(|d| d.field == "spatial"));
    }

    #[test]
    fn section_failure_is_scoped() {
        let raw = full_response().replace("terrestrial_hydrosphere", "volcanology");
        let result = PrefillTask::interpret(&draft(), &raw);

        assert!(result.output.is_none());
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.field == "classification.category"),
            "diagnostics carry the section prefix"
        );
    }

    #[test]
    fn section_warnings_survive_on_success() {
        let raw = full_response().replace("\"Cryosphere\"", "\"Invented Topic\"");
        let result = PrefillTask::interpret(&draft(), &raw);

        assert!(result.output.is_some());
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.field == "classification.topic")
        );
    }

    #[test]
    fn location_derivation_by_expedition() {
        let location = derive_location(Some(ExpeditionType::SouthernOcean), None);
        assert_eq!(location.category.as_deref(), Some("ocean"));
        assert_eq!(location.region.as_deref(), Some("Southern Ocean"));

        let none = derive_location(None, Some("Khumbu".to_string()));
        assert!(none.category.is_none());
        assert_eq!(none.subregion.as_deref(), Some("Khumbu"));
    }
}
