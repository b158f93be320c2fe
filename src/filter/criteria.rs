use std::collections::HashSet;

use crate::error::{MetaFilterError, Result};
use crate::text::normalize;
use crate::vocab::Vocabulary;

/// A validated filter selection. Country and faculty names are canonical;
/// the normalized comparison sets (countries alias-expanded) are computed
/// once at construction.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    paises: Vec<String>,
    facultades: Vec<String>,
    paises_normalized: HashSet<String>,
    facultades_normalized: HashSet<String>,
    pub max_eur: f64,
    pub max_mxn: f64,
}

impl FilterCriteria {
    /// Validate a selection against the vocabulary. Requires at least one
    /// country and one faculty; unknown names are rejected naming the
    /// offender. Selected countries with registered aliases are expanded to
    /// their full alias set for matching.
    pub fn new(
        vocabulary: &Vocabulary,
        paises: &[String],
        facultades: &[String],
        max_eur: f64,
        max_mxn: f64,
    ) -> Result<Self> {
        if paises.is_empty() || facultades.is_empty() {
            return Err(MetaFilterError::SelectionRequired);
        }

        let mut canonical_paises = Vec::new();
        for name in paises {
            let canonical = vocabulary.resolve_pais(name).ok_or_else(|| {
                MetaFilterError::UnknownCountry { name: name.clone() }
            })?;
            canonical_paises.push(canonical.to_string());
        }

        let mut canonical_facultades = Vec::new();
        for name in facultades {
            let canonical = vocabulary.resolve_facultad(name).ok_or_else(|| {
                MetaFilterError::UnknownFaculty { name: name.clone() }
            })?;
            canonical_facultades.push(canonical.to_string());
        }

        let paises_normalized = canonical_paises
            .iter()
            .flat_map(|p| vocabulary.expand_pais(p))
            .map(normalize)
            .collect();

        let facultades_normalized = canonical_facultades.iter().map(|f| normalize(f)).collect();

        Ok(Self {
            paises: canonical_paises,
            facultades: canonical_facultades,
            paises_normalized,
            facultades_normalized,
            max_eur,
            max_mxn,
        })
    }

    pub fn paises(&self) -> &[String] {
        &self.paises
    }

    pub fn facultades(&self) -> &[String] {
        &self.facultades
    }

    pub fn matches_pais(&self, pais: &str) -> bool {
        self.paises_normalized.contains(&normalize(pais))
    }

    pub fn matches_facultad(&self, facultad: &str) -> bool {
        self.facultades_normalized.contains(&normalize(facultad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(paises: &[&str], facultades: &[&str]) -> Result<FilterCriteria> {
        FilterCriteria::new(
            &Vocabulary::default(),
            &paises.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            &facultades.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            2.0,
            41.0,
        )
    }

    #[test]
    fn test_empty_selection_rejected() {
        let err = criteria(&[], &["Medicina"]).unwrap_err();
        assert!(matches!(err, MetaFilterError::SelectionRequired));

        let err = criteria(&["España"], &[]).unwrap_err();
        assert!(matches!(err, MetaFilterError::SelectionRequired));
    }

    #[test]
    fn test_unknown_names_rejected() {
        let err = criteria(&["Atlantida"], &["Medicina"]).unwrap_err();
        assert!(matches!(err, MetaFilterError::UnknownCountry { .. }));

        let err = criteria(&["España"], &["Alquimia"]).unwrap_err();
        assert!(matches!(err, MetaFilterError::UnknownFaculty { .. }));
    }

    #[test]
    fn test_selection_is_canonicalized() {
        let c = criteria(&["espana"], &["medicina"]).unwrap();
        assert_eq!(c.paises(), ["España"]);
        assert_eq!(c.facultades(), ["Medicina"]);
    }

    #[test]
    fn test_alias_expansion_matches_variants() {
        let c = criteria(&["Estados Unidos"], &["Derecho"]).unwrap();
        assert!(c.matches_pais("Estados Unidos"));
        assert!(c.matches_pais("Estados Unidos de América"));
        assert!(!c.matches_pais("México"));
    }

    #[test]
    fn test_matching_is_accent_insensitive() {
        let c = criteria(&["México"], &["Psicología"]).unwrap();
        assert!(c.matches_pais("Mexico"));
        assert!(c.matches_facultad("psicologia"));
    }
}
