// ABOUTME: Spatial coordinate extraction task: bounding box, zone type, location names.
// ABOUTME: Missing coordinates fall back to the expedition default; invalid ones fail hard.

use floe_core::spatial::{BoundingBox, SpatialError, ZoneType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::extract_json;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::tasks::{SubmissionDraft, str_field};
use crate::validate::Diagnostic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub bounds: BoundingBox,
    pub zone_type: ZoneType,
    pub location_name: Option<String>,
    pub subregion: Option<String>,
}

pub struct SpatialTask;

impl AssistTask for SpatialTask {
    const KIND: TaskKind = TaskKind::SpatialExtract;

    type Input = SubmissionDraft;
    type Output = SpatialExtent;

    fn prompt(input: &SubmissionDraft) -> CompletionRequest {
        prompt::spatial(&input.title, &input.abstract_text, input.expedition)
    }

    fn interpret(input: &SubmissionDraft, raw: &str) -> Interpreted<SpatialExtent> {
        let Some(value) = extract_json(raw) else {
            return Interpreted::malformed("no JSON object in spatial response");
        };
        interpret_value(input, &value)
    }
}

pub(crate) fn interpret_value(input: &SubmissionDraft, value: &Value) -> Interpreted<SpatialExtent> {
    let defaults = input
        .expedition
        .map(|e| e.default_bounds())
        .unwrap_or_else(BoundingBox::global);

    let coordinate = |key: &str, fallback: f64| -> f64 {
        value.get(key).and_then(|v| v.as_f64()).unwrap_or(fallback)
    };

    let bounds = BoundingBox::new(
        coordinate("west", defaults.west),
        coordinate("east", defaults.east),
        coordinate("south", defaults.south),
        coordinate("north", defaults.north),
    );

    // Validation runs on the final candidate value, whatever mix of
    // extracted and default coordinates produced it.
    if let Err(error) = bounds.validate() {
        return Interpreted::invalid(vec![spatial_diagnostic(&error)]);
    }

    let mut diagnostics = Vec::new();

    let zone_type = match str_field(value, "zone_type") {
        None => ZoneType::default(),
        Some(raw) => match ZoneType::from_key(&raw) {
            Some(zone) => zone,
            None => {
                diagnostics.push(Diagnostic::warning(
                    "zone_type",
                    format!("'{raw}' is not a known zone type, assuming bounding_box"),
                ));
                ZoneType::default()
            }
        },
    };

    Interpreted::ok_with(
        SpatialExtent {
            bounds,
            zone_type,
            location_name: str_field(value, "location_name"),
            subregion: str_field(value, "subregion"),
        },
        diagnostics,
    )
}

fn spatial_diagnostic(error: &SpatialError) -> Diagnostic {
    let field = match error {
        SpatialError::OutOfRange { field, .. } => field,
        SpatialError::WestEastInverted { .. } => "west",
        SpatialError::SouthNorthInverted { .. } => "south",
    };
    Diagnostic::error(field, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use floe_core::taxonomy::ExpeditionType;

    fn draft() -> SubmissionDraft {
        SubmissionDraft::new(
            "Lake Monitoring",
            "Water temperature at Schirmacher Oasis lakes.",
            Some(ExpeditionType::Antarctic),
        )
    }

    #[test]
    fn explicit_coordinates_parse() {
        let raw = r#"{"north": -70.7, "south": -70.8, "east": 11.8, "west": 11.6,
                      "zone_type": "point", "location_name": "Schirmacher Oasis", "subregion": "Schirmacher Oasis"}"#;
        let result = SpatialTask::interpret(&draft(), raw);

        let extent = result.output.unwrap();
        assert_eq!(extent.zone_type, ZoneType::Point);
        assert_eq!(extent.location_name.as_deref(), Some("Schirmacher Oasis"));
        assert!(extent.bounds.validate().is_ok());
    }

    #[test]
    fn missing_coordinates_use_expedition_defaults() {
        let result = SpatialTask::interpret(&draft(), r#"{"zone_type": "bounding_box"}"#);
        let extent = result.output.unwrap();
        assert_eq!(extent.bounds, ExpeditionType::Antarctic.default_bounds());
    }

    #[test]
    fn out_of_range_west_fails() {
        let raw = r#"{"north": -60.0, "south": -90.0, "east": 180.0, "west": 200.0}"#;
        let result = SpatialTask::interpret(&draft(), raw);

        assert!(result.output.is_none());
        assert_eq!(result.diagnostics[0].field, "west");
    }

    #[test]
    fn inverted_box_fails_rather_than_swaps() {
        let raw = r#"{"north": -90.0, "south": -60.0, "east": 180.0, "west": -180.0}"#;
        let result = SpatialTask::interpret(&draft(), raw);

        assert!(result.output.is_none(), "inverted south/north must not be silently swapped");
        assert_eq!(result.diagnostics[0].field, "south");
    }

    #[test]
    fn unknown_zone_type_warns_and_defaults() {
        let raw = r#"{"north": -60.0, "south": -90.0, "east": 180.0, "west": -180.0, "zone_type": "hemisphere"}"#;
        let result = SpatialTask::interpret(&draft(), raw);

        let extent = result.output.unwrap();
        assert_eq!(extent.zone_type, ZoneType::BoundingBox);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn validated_extent_revalidates_clean() {
        let raw = r#"{"north": -50.0, "south": -60.0, "east": 20.0, "west": -10.0}"#;
        let extent = SpatialTask::interpret(&draft(), raw).output.unwrap();

        assert!(extent.bounds.validate().is_ok());
        assert!(extent.bounds.validate().is_ok(), "validation is idempotent");
    }
}
