//! Input validation at the single system boundary.
//!
//! A `ValidatedQuery` can only be constructed by `ValidatedQuery::validate`;
//! downstream components never re-examine raw input. The whole request is
//! classified before anything else happens, so a rejected request has no
//! side effects.

use crate::domain::SearchScope;
use crate::error::ValidationError;

/// Maximum byte length of the queried word.
pub const MAX_WORD_BYTES: usize = 100;
/// Maximum byte length of a custom town name.
pub const MAX_TOWN_BYTES: usize = 50;
/// Attestations returned when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: usize = 10;
/// Hard ceiling on the requested limit. Out of range is an error, not a clamp.
pub const MAX_LIMIT: usize = 50;

/// Raw, untrusted request as the caller hands it in.
#[derive(Debug, Clone, Default)]
pub struct TranslationRequest {
    pub word: String,
    /// Scope selector; `None` defaults to the Landkreis Ansbach scope.
    pub scope: Option<String>,
    pub town: Option<String>,
    pub limit: Option<usize>,
    pub exact_match: bool,
}

/// A fully validated query. Invariant: every field has passed the boundary
/// checks; no downstream component re-validates.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    word: String,
    scope: SearchScope,
    limit: usize,
    exact_match: bool,
}

impl ValidatedQuery {
    /// Classify the complete raw request, rejecting it on the first violated
    /// constraint.
    pub fn validate(raw: &TranslationRequest) -> Result<Self, ValidationError> {
        let word = check_word(&raw.word)?;

        let town = match raw.town.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(town) => Some(check_town(town)?),
        };

        let scope = parse_scope(raw.scope.as_deref(), town)?;

        let limit = match raw.limit {
            None => DEFAULT_LIMIT,
            Some(limit) if (1..=MAX_LIMIT).contains(&limit) => limit,
            Some(limit) => {
                return Err(ValidationError::LimitOutOfRange {
                    got: limit,
                    max: MAX_LIMIT,
                })
            }
        };

        Ok(Self {
            word,
            scope,
            limit,
            exact_match: raw.exact_match,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn exact_match(&self) -> bool {
        self.exact_match
    }
}

/// The character whitelist: German/Latin letters, umlauts, ß, hyphen, space.
/// Digits, punctuation, control and markup characters are all rejected.
pub(crate) fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(c, 'ä' | 'ö' | 'ü' | 'Ä' | 'Ö' | 'Ü' | 'ß')
        || c == '-'
        || c == ' '
}

fn check_word(raw: &str) -> Result<String, ValidationError> {
    let word = raw.trim();
    if word.is_empty() {
        return Err(ValidationError::EmptyWord);
    }
    if word.len() > MAX_WORD_BYTES {
        return Err(ValidationError::WordTooLong {
            max: MAX_WORD_BYTES,
        });
    }
    if let Some(found) = word.chars().find(|c| !is_allowed_char(*c)) {
        return Err(ValidationError::ForbiddenCharacter {
            field: "word",
            found,
        });
    }
    Ok(word.to_string())
}

fn check_town(town: &str) -> Result<String, ValidationError> {
    if town.len() > MAX_TOWN_BYTES {
        return Err(ValidationError::TownTooLong {
            max: MAX_TOWN_BYTES,
        });
    }
    if let Some(found) = town.chars().find(|c| !is_allowed_char(*c)) {
        return Err(ValidationError::ForbiddenCharacter {
            field: "town",
            found,
        });
    }
    Ok(town.to_string())
}

fn parse_scope(
    raw: Option<&str>,
    town: Option<String>,
) -> Result<SearchScope, ValidationError> {
    let selector = raw.unwrap_or("landkreis_ansbach").trim().to_lowercase();
    // Accept both separator styles; CLI flags use kebab-case.
    match selector.replace('-', "_").as_str() {
        "landkreis_ansbach" => match town {
            None => Ok(SearchScope::LandkreisAnsbach),
            Some(_) => Err(ValidationError::TownNotAllowed),
        },
        "stadt_ansbach" => match town {
            None => Ok(SearchScope::StadtAnsbach),
            Some(_) => Err(ValidationError::TownNotAllowed),
        },
        "custom_town" => match town {
            Some(town) => Ok(SearchScope::CustomTown(town)),
            None => Err(ValidationError::TownMissing),
        },
        _ => Err(ValidationError::UnknownScope(selector)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(word: &str) -> TranslationRequest {
        TranslationRequest {
            word: word.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_german_word_with_umlauts() {
        let query = ValidatedQuery::validate(&raw("Mädchen")).unwrap();
        assert_eq!(query.word(), "Mädchen");
        assert_eq!(query.scope(), &SearchScope::LandkreisAnsbach);
        assert_eq!(query.limit(), DEFAULT_LIMIT);
        assert!(!query.exact_match());
    }

    #[test]
    fn accepts_hyphen_and_space() {
        assert!(ValidatedQuery::validate(&raw("Nürnberger Bratwurst")).is_ok());
        assert!(ValidatedQuery::validate(&raw("Baden-Württemberg")).is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace_only_word() {
        assert_eq!(
            ValidatedQuery::validate(&raw("")),
            Err(ValidationError::EmptyWord)
        );
        assert_eq!(
            ValidatedQuery::validate(&raw("   ")),
            Err(ValidationError::EmptyWord)
        );
    }

    #[test]
    fn rejects_over_length_word() {
        let long = "a".repeat(MAX_WORD_BYTES + 1);
        assert_eq!(
            ValidatedQuery::validate(&raw(&long)),
            Err(ValidationError::WordTooLong {
                max: MAX_WORD_BYTES
            })
        );
    }

    #[test]
    fn rejects_markup_and_control_characters() {
        for bad in ["Wurst<b>", "Brot&amp", "Haus\u{0}", "zwei\nZeilen", "a\tb"] {
            match ValidatedQuery::validate(&raw(bad)) {
                Err(ValidationError::ForbiddenCharacter { field: "word", .. }) => {}
                other => panic!("expected rejection for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_digits_and_punctuation() {
        for bad in ["Haus1", "Wurst!", "Brot.", "Käse?"] {
            assert!(
                matches!(
                    ValidatedQuery::validate(&raw(bad)),
                    Err(ValidationError::ForbiddenCharacter { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_unknown_scope() {
        let mut request = raw("Wurst");
        request.scope = Some("oberpfalz".to_string());
        assert_eq!(
            ValidatedQuery::validate(&request),
            Err(ValidationError::UnknownScope("oberpfalz".to_string()))
        );
    }

    #[test]
    fn scope_accepts_kebab_case_selector() {
        let mut request = raw("Wurst");
        request.scope = Some("stadt-ansbach".to_string());
        let query = ValidatedQuery::validate(&request).unwrap();
        assert_eq!(query.scope(), &SearchScope::StadtAnsbach);
    }

    #[test]
    fn custom_town_requires_town() {
        let mut request = raw("Wurst");
        request.scope = Some("custom_town".to_string());
        assert_eq!(
            ValidatedQuery::validate(&request),
            Err(ValidationError::TownMissing)
        );

        request.town = Some("  ".to_string());
        assert_eq!(
            ValidatedQuery::validate(&request),
            Err(ValidationError::TownMissing)
        );

        request.town = Some("Merkendorf".to_string());
        let query = ValidatedQuery::validate(&request).unwrap();
        assert_eq!(
            query.scope(),
            &SearchScope::CustomTown("Merkendorf".to_string())
        );
    }

    #[test]
    fn town_is_rejected_outside_custom_scope() {
        let mut request = raw("Wurst");
        request.town = Some("Merkendorf".to_string());
        assert_eq!(
            ValidatedQuery::validate(&request),
            Err(ValidationError::TownNotAllowed)
        );
    }

    #[test]
    fn rejects_over_length_town() {
        let mut request = raw("Wurst");
        request.scope = Some("custom_town".to_string());
        request.town = Some("b".repeat(MAX_TOWN_BYTES + 1));
        assert_eq!(
            ValidatedQuery::validate(&request),
            Err(ValidationError::TownTooLong {
                max: MAX_TOWN_BYTES
            })
        );
    }

    #[test]
    fn limit_bounds_are_errors_not_clamps() {
        let mut request = raw("Wurst");
        request.limit = Some(0);
        assert_eq!(
            ValidatedQuery::validate(&request),
            Err(ValidationError::LimitOutOfRange {
                got: 0,
                max: MAX_LIMIT
            })
        );

        request.limit = Some(MAX_LIMIT + 1);
        assert_eq!(
            ValidatedQuery::validate(&request),
            Err(ValidationError::LimitOutOfRange {
                got: MAX_LIMIT + 1,
                max: MAX_LIMIT
            })
        );

        request.limit = Some(MAX_LIMIT);
        assert_eq!(ValidatedQuery::validate(&request).unwrap().limit(), MAX_LIMIT);
    }
}
