//! Scope resolution against the static gazetteer.
//!
//! Maps a geographic scope to the concrete corpus location ids to query.
//! Resolution is pure and happens before any network activity, so an unknown
//! town is a validation failure, never a transport error.

use crate::domain::{LocationId, SearchScope};
use crate::error::ValidationError;

/// One queryable place: canonical corpus name plus accepted short forms.
#[derive(Debug, Clone, Copy)]
pub struct GazetteerEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

/// The kreisfreie Stadt Ansbach. Not part of the district list below.
pub const STADT_ANSBACH: GazetteerEntry = GazetteerEntry {
    name: "Ansbach",
    aliases: &[],
};

/// Towns and markets of Landkreis Ansbach queryable in the corpus.
pub const LANDKREIS_ANSBACH_TOWNS: &[GazetteerEntry] = &[
    GazetteerEntry { name: "Bechhofen", aliases: &[] },
    GazetteerEntry { name: "Colmberg", aliases: &[] },
    GazetteerEntry { name: "Dietenhofen", aliases: &[] },
    GazetteerEntry { name: "Dinkelsbühl", aliases: &[] },
    GazetteerEntry { name: "Dombühl", aliases: &[] },
    GazetteerEntry { name: "Feuchtwangen", aliases: &[] },
    GazetteerEntry { name: "Flachslanden", aliases: &[] },
    GazetteerEntry { name: "Heilsbronn", aliases: &[] },
    GazetteerEntry { name: "Herrieden", aliases: &[] },
    GazetteerEntry { name: "Leutershausen", aliases: &[] },
    GazetteerEntry { name: "Lichtenau", aliases: &[] },
    GazetteerEntry { name: "Merkendorf", aliases: &[] },
    GazetteerEntry { name: "Neuendettelsau", aliases: &[] },
    GazetteerEntry { name: "Petersaurach", aliases: &[] },
    GazetteerEntry {
        name: "Rothenburg ob der Tauber",
        aliases: &["Rothenburg"],
    },
    GazetteerEntry {
        name: "Sachsen bei Ansbach",
        aliases: &["Sachsen"],
    },
    GazetteerEntry { name: "Schillingsfürst", aliases: &[] },
    GazetteerEntry { name: "Wassertrüdingen", aliases: &[] },
    GazetteerEntry { name: "Windsbach", aliases: &[] },
    GazetteerEntry {
        name: "Wolframs-Eschenbach",
        aliases: &["Eschenbach"],
    },
];

/// Resolve a scope to the set of location ids to query.
pub fn resolve(scope: &SearchScope) -> Result<Vec<LocationId>, ValidationError> {
    match scope {
        SearchScope::LandkreisAnsbach => Ok(LANDKREIS_ANSBACH_TOWNS
            .iter()
            .map(|entry| LocationId::new(entry.name))
            .collect()),
        SearchScope::StadtAnsbach => Ok(vec![LocationId::new(STADT_ANSBACH.name)]),
        SearchScope::CustomTown(town) => lookup_town(town)
            .map(|entry| vec![LocationId::new(entry.name)])
            .ok_or_else(|| ValidationError::UnknownTown(town.clone())),
    }
}

/// Case-insensitive gazetteer lookup over canonical names and aliases.
pub fn lookup_town(name: &str) -> Option<&'static GazetteerEntry> {
    let needle = name.trim().to_lowercase();
    all_entries().find(|entry| {
        entry.name.to_lowercase() == needle
            || entry
                .aliases
                .iter()
                .any(|alias| alias.to_lowercase() == needle)
    })
}

/// Every queryable place: the district towns plus the city of Ansbach.
pub fn all_entries() -> impl Iterator<Item = &'static GazetteerEntry> {
    LANDKREIS_ANSBACH_TOWNS
        .iter()
        .chain(std::iter::once(&STADT_ANSBACH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landkreis_resolves_to_district_towns_without_the_city() {
        let locations = resolve(&SearchScope::LandkreisAnsbach).unwrap();
        assert_eq!(locations.len(), LANDKREIS_ANSBACH_TOWNS.len());
        assert!(locations.iter().all(|l| l.as_str() != "Ansbach"));
        assert!(locations.iter().any(|l| l.as_str() == "Feuchtwangen"));
    }

    #[test]
    fn stadt_resolves_to_singleton() {
        let locations = resolve(&SearchScope::StadtAnsbach).unwrap();
        assert_eq!(locations, vec![LocationId::new("Ansbach")]);
    }

    #[test]
    fn custom_town_resolves_via_alias_to_canonical_name() {
        let scope = SearchScope::CustomTown("Rothenburg".to_string());
        let locations = resolve(&scope).unwrap();
        assert_eq!(
            locations,
            vec![LocationId::new("Rothenburg ob der Tauber")]
        );
    }

    #[test]
    fn custom_town_lookup_is_case_insensitive() {
        let scope = SearchScope::CustomTown("rothenburg ob der tauber".to_string());
        assert_eq!(resolve(&scope).unwrap().len(), 1);
    }

    #[test]
    fn unknown_town_fails_validation() {
        let scope = SearchScope::CustomTown("Atlantis".to_string());
        assert_eq!(
            resolve(&scope),
            Err(ValidationError::UnknownTown("Atlantis".to_string()))
        );
    }
}
