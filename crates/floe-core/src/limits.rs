// ABOUTME: Field-length ceilings and count caps for portal metadata.
// ABOUTME: The validator enforces these on final candidate values, not provider claims.

/// Maximum dataset title length in characters.
pub const TITLE_MAX_CHARS: usize = 220;

/// Maximum abstract length in characters.
pub const ABSTRACT_MAX_CHARS: usize = 1000;

/// Maximum purpose-statement length in characters.
pub const PURPOSE_MAX_CHARS: usize = 1000;

/// Maximum keywords suggested per dataset.
pub const KEYWORDS_MAX: usize = 10;

/// Maximum length of a single keyword.
pub const KEYWORD_MAX_CHARS: usize = 80;

/// Maximum alternative titles offered alongside the primary suggestion.
pub const TITLE_ALTERNATIVES_MAX: usize = 2;

/// Caps on reviewer-guidance list fields.
pub const REVIEW_ISSUES_MAX: usize = 6;
pub const REVIEW_SUGGESTIONS_MAX: usize = 6;

/// Caps on abstract-quality suggestion lists.
pub const QUALITY_SUGGESTIONS_MAX: usize = 4;
