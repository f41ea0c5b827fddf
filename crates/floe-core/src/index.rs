// ABOUTME: Read-only seam to the portal's dataset index, plus an in-memory reference index.
// ABOUTME: Structured predicates AND together; free-text terms produce a ranked match.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::filter::FilterQuery;
use crate::spatial::BoundingBox;
use crate::taxonomy::{Category, ExpeditionType, IsoTopic};

/// A published dataset as returned by the index. This layer never mutates
/// records; they exist to build predicates against and to ground answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub category: Category,
    pub expedition: ExpeditionType,
    #[serde(default)]
    pub iso_topic: Option<IsoTopic>,
    #[serde(default)]
    pub expedition_year: Option<u16>,
    #[serde(default)]
    pub temporal_start: Option<NaiveDate>,
    #[serde(default)]
    pub temporal_end: Option<NaiveDate>,
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
    #[serde(default)]
    pub doi: Option<String>,
}

/// Read-only query access to the dataset corpus.
///
/// The real index lives outside this layer (the portal's search backend);
/// `MemoryIndex` below implements the same contract for tests and the CLI.
pub trait DatasetIndex: Send + Sync {
    /// Execute a predicate set and return at most `limit` records,
    /// best match first.
    fn search(&self, query: &FilterQuery, limit: usize) -> Vec<DatasetRecord>;

    /// A small sample of titles, keywords, and category labels from the
    /// corpus, used to steer zero-result recovery suggestions toward terms
    /// that exist. Backends without cheap access may return nothing.
    fn sample_terms(&self, limit: usize) -> Vec<String> {
        let _ = limit;
        Vec::new()
    }
}

/// In-memory `DatasetIndex` over a fixed record list.
pub struct MemoryIndex {
    records: Vec<DatasetRecord>,
}

impl MemoryIndex {
    pub fn new(records: Vec<DatasetRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matches_filters(record: &DatasetRecord, query: &FilterQuery) -> bool {
        if let Some(exp) = query.expedition
            && record.expedition != exp
        {
            return false;
        }
        if let Some(cat) = query.category
            && record.category != cat
        {
            return false;
        }
        if let Some(iso) = query.iso_topic
            && record.iso_topic != Some(iso)
        {
            return false;
        }
        if let Some(span) = query.years {
            let year = record
                .expedition_year
                .or_else(|| record.temporal_start.map(|d| d.year() as u16));
            match year {
                Some(y) if span.contains(y) => {}
                _ => return false,
            }
        }
        if let Some(wanted) = query.bounds {
            match record.bounds {
                Some(got) => {
                    let overlaps = got.west <= wanted.east
                        && got.east >= wanted.west
                        && got.south <= wanted.north
                        && got.north >= wanted.south;
                    if !overlaps {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }

    /// Term score: title and keyword hits weigh more than abstract hits,
    /// mirroring the portal's weighted full-text configuration.
    fn term_score(record: &DatasetRecord, terms: &[String]) -> u32 {
        let title = record.title.to_lowercase();
        let abstract_text = record.abstract_text.to_lowercase();
        let keywords: Vec<String> = record.keywords.iter().map(|k| k.to_lowercase()).collect();

        let mut score = 0;
        for term in terms {
            let term = term.to_lowercase();
            if term.is_empty() {
                continue;
            }
            if title.contains(&term) {
                score += 3;
            }
            if keywords.iter().any(|k| k.contains(&term)) {
                score += 3;
            }
            if abstract_text.contains(&term) {
                score += 1;
            }
        }
        score
    }
}

impl DatasetIndex for MemoryIndex {
    fn search(&self, query: &FilterQuery, limit: usize) -> Vec<DatasetRecord> {
        // DOI predicates are exact lookups, nothing else applies.
        if let Some(doi) = &query.doi {
            return self
                .records
                .iter()
                .filter(|r| {
                    r.doi
                        .as_deref()
                        .is_some_and(|d| d.eq_ignore_ascii_case(doi))
                })
                .take(limit)
                .cloned()
                .collect();
        }

        let mut scored: Vec<(u32, &DatasetRecord)> = self
            .records
            .iter()
            .filter(|r| Self::matches_filters(r, query))
            .filter_map(|r| {
                if query.terms.is_empty() {
                    Some((0, r))
                } else {
                    let score = Self::term_score(r, &query.terms);
                    (score > 0).then_some((score, r))
                }
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
        scored.into_iter().take(limit).map(|(_, r)| r.clone()).collect()
    }

    fn sample_terms(&self, limit: usize) -> Vec<String> {
        let mut terms = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let mut push = |term: &str, terms: &mut Vec<String>| {
            let term = term.trim();
            if !term.is_empty() && seen.insert(term.to_lowercase()) {
                terms.push(term.to_string());
            }
        };

        for record in &self.records {
            let title: String = record.title.chars().take(50).collect();
            push(&title, &mut terms);
            for keyword in &record.keywords {
                push(keyword, &mut terms);
            }
            push(record.category.label(), &mut terms);
            if terms.len() >= limit {
                break;
            }
        }
        terms.truncate(limit);
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::YearSpan;

    fn record(id: &str, title: &str, expedition: ExpeditionType) -> DatasetRecord {
        DatasetRecord {
            id: id.to_string(),
            title: title.to_string(),
            abstract_text: format!("{title} collected during routine fieldwork."),
            keywords: Vec::new(),
            category: Category::Cryosphere,
            expedition,
            iso_topic: None,
            expedition_year: None,
            temporal_start: None,
            temporal_end: None,
            bounds: None,
            doi: None,
        }
    }

    fn fixture() -> MemoryIndex {
        let mut glacier = record("NX-001", "Himalayan Glacier Velocity Survey", ExpeditionType::Himalaya);
        glacier.expedition_year = Some(2024);
        glacier.keywords = vec!["Glaciology".to_string(), "Velocity".to_string()];

        let mut moss = record("NX-002", "Arctic Moss Distribution", ExpeditionType::Arctic);
        moss.category = Category::Biosphere;
        moss.expedition_year = Some(2019);

        let mut mooring = record("NX-003", "Southern Ocean Mooring Temperatures", ExpeditionType::SouthernOcean);
        mooring.category = Category::Oceans;
        mooring.doi = Some("10.1234/abcd".to_string());

        MemoryIndex::new(vec![glacier, moss, mooring])
    }

    #[test]
    fn structured_filters_and_together() {
        let index = fixture();

        let mut query = FilterQuery::default();
        query.expedition = Some(ExpeditionType::Himalaya);
        query.years = YearSpan::single(2024);
        assert_eq!(index.search(&query, 10).len(), 1);

        // Same expedition, wrong year: no match.
        query.years = YearSpan::single(2020);
        assert!(index.search(&query, 10).is_empty());
    }

    #[test]
    fn term_ranking_prefers_title_hits() {
        let index = fixture();
        let query = FilterQuery::from_terms(["glacier"]);
        let results = index.search(&query, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "NX-001");
    }

    #[test]
    fn doi_lookup_is_exact_and_case_insensitive() {
        let index = fixture();
        let results = index.search(&FilterQuery::doi_exact("10.1234/ABCD"), 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "NX-003");

        assert!(index.search(&FilterQuery::doi_exact("10.9999/none"), 10).is_empty());
    }

    #[test]
    fn no_terms_returns_all_matching_filters() {
        let index = fixture();
        let query = FilterQuery::default();
        assert_eq!(index.search(&query, 10).len(), 3);
        assert_eq!(index.search(&query, 2).len(), 2, "limit respected");
    }

    #[test]
    fn unmatched_terms_exclude_record() {
        let index = fixture();
        let query = FilterQuery::from_terms(["penguin colonies"]);
        assert!(index.search(&query, 10).is_empty());
    }
}
