//! Final result assembly and exact-match filtering.

use crate::domain::{Attestation, SearchScope, TranslationResult};

/// Build the caller-facing result. With `exact_match` set, only attestations
/// whose dialect form (or a known orthographic variant of it) equals the
/// query word case-insensitively survive; an emptied list is still a valid
/// result, distinct from an upstream failure.
pub fn assemble(
    word: &str,
    scope: SearchScope,
    ranked: Vec<Attestation>,
    total_before_limit: usize,
    exact_match: bool,
) -> TranslationResult {
    let attestations = if exact_match {
        let wanted = fold_orthography(word);
        ranked
            .into_iter()
            .filter(|attestation| fold_orthography(&attestation.dialect_form) == wanted)
            .collect()
    } else {
        ranked
    };

    TranslationResult {
        queried_word: word.to_string(),
        scope,
        attestations,
        total_before_limit,
        exact_match_applied: exact_match,
    }
}

/// Case-fold plus the usual German transliterations, so "Kaese" and "Käse"
/// or "Strasse" and "Straße" compare equal.
pub fn fold_orthography(word: &str) -> String {
    let mut folded = String::with_capacity(word.len());
    for c in word.to_lowercase().chars() {
        match c {
            'ä' => folded.push_str("ae"),
            'ö' => folded.push_str("oe"),
            'ü' => folded.push_str("ue"),
            'ß' => folded.push_str("ss"),
            other => folded.push(other),
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn att(form: &str, frequency: u64) -> Attestation {
        Attestation::new(form, frequency, None, "Ansbach", None)
    }

    #[test]
    fn exact_match_keeps_only_equal_forms() {
        let result = assemble(
            "Kartoffel",
            SearchScope::StadtAnsbach,
            vec![att("Äbirn", 493), att("Kartoffel", 7)],
            2,
            true,
        );
        assert_eq!(result.attestations.len(), 1);
        assert_eq!(result.attestations[0].dialect_form, "Kartoffel");
        assert!(result.exact_match_applied);
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let result = assemble(
            "kartoffel",
            SearchScope::StadtAnsbach,
            vec![att("KARTOFFEL", 2)],
            1,
            true,
        );
        assert_eq!(result.attestations.len(), 1);
    }

    #[test]
    fn exact_match_accepts_orthographic_variants() {
        let result = assemble(
            "Kaese",
            SearchScope::StadtAnsbach,
            vec![att("Käse", 2), att("Kees", 5)],
            2,
            true,
        );
        assert_eq!(result.attestations.len(), 1);
        assert_eq!(result.attestations[0].dialect_form, "Käse");
    }

    #[test]
    fn unmatched_exact_query_yields_empty_result_not_error() {
        let result = assemble(
            "Zwiebel",
            SearchScope::StadtAnsbach,
            vec![att("Äbirn", 493)],
            1,
            true,
        );
        assert!(result.attestations.is_empty());
        assert_eq!(result.total_before_limit, 1);
    }

    #[test]
    fn without_exact_match_everything_passes_through() {
        let result = assemble(
            "Kartoffel",
            SearchScope::LandkreisAnsbach,
            vec![att("Äbirn", 493), att("Ebbern", 210)],
            5,
            false,
        );
        assert_eq!(result.attestations.len(), 2);
        assert_eq!(result.total_before_limit, 5);
        assert!(!result.exact_match_applied);
    }
}
