//! Domain types for dialect attestation lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic restriction of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// All towns of Landkreis Ansbach (the district, excluding the city).
    LandkreisAnsbach,
    /// The kreisfreie Stadt Ansbach only.
    StadtAnsbach,
    /// One named town or village, resolved against the gazetteer.
    CustomTown(String),
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LandkreisAnsbach => write!(f, "Landkreis Ansbach"),
            Self::StadtAnsbach => write!(f, "Stadt Ansbach"),
            Self::CustomTown(town) => write!(f, "{}", town),
        }
    }
}

/// Opaque key identifying one place queryable in the remote corpus.
///
/// The wrapped value is the corpus `orte` query parameter for that place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded dialect form with corpus evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    /// Dialect form as attested in the corpus.
    pub dialect_form: String,
    /// Deduplication key: lower-cased, whitespace-collapsed form.
    pub normalized_form: String,
    /// Occurrence count in the corpus for the contributing location(s).
    pub frequency: u64,
    /// Example usage from the corpus, if recorded.
    pub example_sentence: Option<String>,
    /// Human-readable place name the attestation was recorded in.
    pub location: String,
    /// Corpus confidence score, passed through when present.
    pub confidence: Option<f64>,
}

impl Attestation {
    pub fn new(
        dialect_form: impl Into<String>,
        frequency: u64,
        example_sentence: Option<String>,
        location: impl Into<String>,
        confidence: Option<f64>,
    ) -> Self {
        let dialect_form = dialect_form.into();
        let normalized_form = normalized_form(&dialect_form);
        Self {
            dialect_form,
            normalized_form,
            frequency,
            example_sentence,
            location: location.into(),
            confidence,
        }
    }
}

/// Lower-cased, whitespace-collapsed key used for deduplication.
pub fn normalized_form(form: &str) -> String {
    form.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Final result of one lookup. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub queried_word: String,
    pub scope: SearchScope,
    /// Ordered by rank: frequency descending, dialect form ascending.
    pub attestations: Vec<Attestation>,
    /// Number of merged attestations before limit truncation.
    pub total_before_limit: usize,
    pub exact_match_applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_form_lowercases_and_collapses_whitespace() {
        assert_eq!(normalized_form("Kimmerli"), "kimmerli");
        assert_eq!(normalized_form("  Äbirn   und  Worscht "), "äbirn und worscht");
    }

    #[test]
    fn attestation_new_derives_normalized_form() {
        let att = Attestation::new("Worscht", 3, None, "Feuchtwangen", None);
        assert_eq!(att.normalized_form, "worscht");
    }
}
