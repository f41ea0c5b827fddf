// ABOUTME: Structured filter predicates derived from natural-language search queries.
// ABOUTME: A FilterQuery combines optional structured constraints with free-text terms.

use serde::{Deserialize, Serialize};

use crate::spatial::BoundingBox;
use crate::taxonomy::{Category, ExpeditionType, IsoTopic};

/// Earliest expedition year present in the corpus.
pub const YEAR_MIN: u16 = 1981;
/// Latest year the portal accepts for planned expeditions.
pub const YEAR_MAX: u16 = 2036;

/// An inclusive span of expedition years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub start: u16,
    pub end: u16,
}

impl YearSpan {
    /// Construct a span, rejecting years outside the corpus range or an
    /// inverted span. A single year is the span `year..=year`.
    pub fn new(start: u16, end: u16) -> Option<YearSpan> {
        if start < YEAR_MIN || end > YEAR_MAX || start > end {
            return None;
        }
        Some(YearSpan { start, end })
    }

    pub fn single(year: u16) -> Option<YearSpan> {
        YearSpan::new(year, year)
    }

    pub fn contains(&self, year: u16) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// The predicate set handed to the dataset index.
///
/// Absent fields mean "no constraint". Free-text terms are never discarded:
/// query tokens that resolve to no structured field stay in `terms`. A DOI
/// predicate is exact-match and bypasses everything else.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    pub expedition: Option<ExpeditionType>,
    pub category: Option<Category>,
    pub iso_topic: Option<IsoTopic>,
    pub years: Option<YearSpan>,
    pub bounds: Option<BoundingBox>,
    pub terms: Vec<String>,
    pub doi: Option<String>,
}

impl FilterQuery {
    /// A purely free-text query.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterQuery {
            terms: terms.into_iter().map(Into::into).collect(),
            ..FilterQuery::default()
        }
    }

    /// An exact-DOI lookup, bypassing all other predicates.
    pub fn doi_exact(doi: impl Into<String>) -> Self {
        FilterQuery {
            doi: Some(doi.into()),
            ..FilterQuery::default()
        }
    }

    /// True when no predicate of any kind is present.
    pub fn is_empty(&self) -> bool {
        self.expedition.is_none()
            && self.category.is_none()
            && self.iso_topic.is_none()
            && self.years.is_none()
            && self.bounds.is_none()
            && self.terms.is_empty()
            && self.doi.is_none()
    }

    /// True when the only constraint is free text.
    pub fn is_text_only(&self) -> bool {
        !self.terms.is_empty()
            && self.expedition.is_none()
            && self.category.is_none()
            && self.iso_topic.is_none()
            && self.years.is_none()
            && self.bounds.is_none()
            && self.doi.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_span_bounds() {
        assert_eq!(YearSpan::new(2024, 2025), Some(YearSpan { start: 2024, end: 2025 }));
        assert!(YearSpan::single(2024).unwrap().contains(2024));

        assert_eq!(YearSpan::new(1880, 1980), None, "below corpus range");
        assert_eq!(YearSpan::new(2030, 2040), None, "above corpus range");
        assert_eq!(YearSpan::new(2025, 2024), None, "inverted");
    }

    #[test]
    fn empty_query_has_no_constraints() {
        let query = FilterQuery::default();
        assert!(query.is_empty());
        assert!(!query.is_text_only());
    }

    #[test]
    fn terms_only_query() {
        let query = FilterQuery::from_terms(["glacier", "velocity"]);
        assert!(query.is_text_only());
        assert!(!query.is_empty());
        assert_eq!(query.terms, vec!["glacier", "velocity"]);
    }

    #[test]
    fn doi_query_is_exact() {
        let query = FilterQuery::doi_exact("10.1234/abcd");
        assert_eq!(query.doi.as_deref(), Some("10.1234/abcd"));
        assert!(!query.is_empty());
        assert!(!query.is_text_only());
    }
}
