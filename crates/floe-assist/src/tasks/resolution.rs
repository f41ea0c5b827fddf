// ABOUTME: Data-resolution suggestion task: DMS lat/lon integers and range descriptors.
// ABOUTME: Numeric fields are required; atypical values are flagged, not rejected.

use serde::{Deserialize, Serialize};

use crate::extract::extract_json;
use crate::prompt;
use crate::provider::CompletionRequest;
use crate::task::{AssistTask, Interpreted, TaskKind};
use crate::tasks::{MIN_ABSTRACT_FOR_GENERATION, SubmissionDraft, guard_min_abstract, int_field, str_field};
use crate::validate::{Diagnostic, flag_outside_range};

pub const HORIZONTAL_RANGES: [&str; 15] = [
    "Point Resolution",
    "< 1 meter",
    "1 meter - 30 meters",
    "30 meters - 100 meters",
    "100 meters - 250 meters",
    "250 meters - 500 meters",
    "500 meters - 1 km",
    "1 km - 10 km",
    "10 km - 50 km",
    "50 km - 100 km",
    "100 km - 250 km",
    "250 km - 500 km",
    "500 km - 1000 km",
    "> 1000 km",
    "Varies",
];

pub const VERTICAL_RANGES: [&str; 6] = [
    "Point Resolution",
    "< 1 meter",
    "1 meter - 100 meters",
    "> 100 meters",
    "Not Applicable",
    "Varies",
];

pub const TEMPORAL_RANGES: [&str; 10] = [
    "Hourly - Sub-hourly",
    "Sub-daily",
    "Daily",
    "Weekly",
    "Monthly",
    "Annually",
    "Sub-annual",
    "Multi-annual",
    "One-time",
    "Varies",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionHint {
    pub lat_deg: i64,
    pub lat_min: i64,
    pub lat_sec: i64,
    pub lon_deg: i64,
    pub lon_min: i64,
    pub lon_sec: i64,
    pub horizontal_resolution_range: String,
    pub vertical_resolution: String,
    pub vertical_resolution_range: String,
    pub temporal_resolution: String,
    pub temporal_resolution_range: String,
}

pub struct ResolutionTask;

impl AssistTask for ResolutionTask {
    const KIND: TaskKind = TaskKind::ResolutionHint;

    type Input = SubmissionDraft;
    type Output = ResolutionHint;

    fn guard(input: &SubmissionDraft) -> Option<Diagnostic> {
        guard_min_abstract(&input.abstract_text, MIN_ABSTRACT_FOR_GENERATION)
    }

    fn prompt(input: &SubmissionDraft) -> CompletionRequest {
        prompt::resolution(&input.title, &input.abstract_text, input.expedition)
    }

    fn interpret(_input: &SubmissionDraft, raw: &str) -> Interpreted<ResolutionHint> {
        let Some(value) = extract_json(raw) else {
            return Interpreted::malformed("no JSON object in resolution response");
        };

        let mut diagnostics = Vec::new();
        let mut dms = [0i64; 6];
        let dms_fields = ["lat_deg", "lat_min", "lat_sec", "lon_deg", "lon_min", "lon_sec"];

        for (slot, field) in dms.iter_mut().zip(dms_fields) {
            match int_field(&value, field) {
                Some(parsed) => *slot = parsed,
                None => diagnostics.push(Diagnostic::error(
                    field,
                    "required integer field is missing or not numeric",
                )),
            }
        }

        if diagnostics.iter().any(|d| d.severity == crate::validate::Severity::Error) {
            return Interpreted::invalid(diagnostics);
        }

        let [lat_deg, lat_min, lat_sec, lon_deg, lon_min, lon_sec] = dms;

        // Typical-range flags only; unusual resolutions are worth a look,
        // not a rejection.
        diagnostics.extend(flag_outside_range("lat_deg", lat_deg, 0, 90));
        diagnostics.extend(flag_outside_range("lon_deg", lon_deg, 0, 180));
        for (field, value) in [
            ("lat_min", lat_min),
            ("lat_sec", lat_sec),
            ("lon_min", lon_min),
            ("lon_sec", lon_sec),
        ] {
            diagnostics.extend(flag_outside_range(field, value, 0, 59));
        }

        let descriptor = |key: &str, allowed: &[&str], diagnostics: &mut Vec<Diagnostic>| {
            let text = str_field(&value, key).unwrap_or_default();
            if !text.is_empty() && !allowed.is_empty() && !allowed.contains(&text.as_str()) {
                diagnostics.push(Diagnostic::warning(
                    key,
                    format!("'{text}' is not one of the documented options"),
                ));
            }
            text
        };

        let horizontal_resolution_range =
            descriptor("horizontal_resolution_range", &HORIZONTAL_RANGES, &mut diagnostics);
        let vertical_resolution = descriptor("vertical_resolution", &[], &mut diagnostics);
        let vertical_resolution_range =
            descriptor("vertical_resolution_range", &VERTICAL_RANGES, &mut diagnostics);
        let temporal_resolution = descriptor("temporal_resolution", &[], &mut diagnostics);
        let temporal_resolution_range =
            descriptor("temporal_resolution_range", &TEMPORAL_RANGES, &mut diagnostics);

        Interpreted::ok_with(
            ResolutionHint {
                lat_deg,
                lat_min,
                lat_sec,
                lon_deg,
                lon_min,
                lon_sec,
                horizontal_resolution_range,
                vertical_resolution,
                vertical_resolution_range,
                temporal_resolution,
                temporal_resolution_range,
            },
            diagnostics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Severity, has_errors};

    fn draft() -> SubmissionDraft {
        SubmissionDraft::new(
            "Ice Core Record",
            "A 120 m ice core drilled at Dome C covering eight centuries.",
            None,
        )
    }

    const GOOD: &str = r#"{"lat_deg": 0, "lat_min": 0, "lat_sec": 5,
        "lon_deg": 0, "lon_min": 0, "lon_sec": 5,
        "horizontal_resolution_range": "Point Resolution",
        "vertical_resolution": "1 centimeter",
        "vertical_resolution_range": "< 1 meter",
        "temporal_resolution": "Annually",
        "temporal_resolution_range": "Annually"}"#;

    #[test]
    fn full_response_parses_clean() {
        let result = ResolutionTask::interpret(&draft(), GOOD);
        let hint = result.output.unwrap();
        assert_eq!(hint.lat_sec, 5);
        assert_eq!(hint.temporal_resolution_range, "Annually");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let raw = GOOD.replace("\"lat_sec\": 5", "\"lat_sec\": \"5\"");
        let result = ResolutionTask::interpret(&draft(), &raw);
        assert_eq!(result.output.unwrap().lat_sec, 5);
    }

    #[test]
    fn non_numeric_dms_fails() {
        let raw = GOOD.replace("\"lat_deg\": 0", "\"lat_deg\": \"about one\"");
        let result = ResolutionTask::interpret(&draft(), &raw);
        assert!(result.output.is_none());
        assert!(has_errors(&result.diagnostics));
    }

    #[test]
    fn atypical_values_flagged_not_rejected() {
        let raw = GOOD.replace("\"lat_sec\": 5", "\"lat_sec\": 99");
        let result = ResolutionTask::interpret(&draft(), &raw);

        let hint = result.output.expect("atypical seconds must still produce output");
        assert_eq!(hint.lat_sec, 99);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn undocumented_range_option_is_flagged() {
        let raw = GOOD.replace("Point Resolution", "Roughly a meter");
        let result = ResolutionTask::interpret(&draft(), &raw);

        assert!(result.output.is_some());
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.field == "horizontal_resolution_range")
        );
    }
}
