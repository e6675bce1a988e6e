use crate::error::PenalError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const STANDARD_ADDITIONS_JSON: &str = include_str!("../../../codes/additions.json");

/// A liability modifier (attempt, accomplice, parole violation, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addition {
    pub name: String,
    /// Factor applied to minimum and maximum time.
    pub sentence_multiplier: Decimal,
    /// Factor applied to points.
    pub points_multiplier: Decimal,
}

impl Addition {
    pub fn is_identity(&self) -> bool {
        self.sentence_multiplier == Decimal::ONE && self.points_multiplier == Decimal::ONE
    }
}

/// Named additions available to a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionCatalog {
    pub additions: Vec<Addition>,
}

impl AdditionCatalog {
    /// Look up an addition by name, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&Addition> {
        let wanted = name.trim();
        self.additions
            .iter()
            .find(|a| a.name.trim().eq_ignore_ascii_case(wanted))
    }

    /// Additions a user may pick for a charge: everything but the parole addition.
    pub fn selectable<'a>(&'a self, parole_name: &'a str) -> impl Iterator<Item = &'a Addition> {
        self.additions
            .iter()
            .filter(move |a| !a.name.trim().eq_ignore_ascii_case(parole_name.trim()))
    }

    pub fn len(&self) -> usize {
        self.additions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
    }
}

/// Load an addition catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<AdditionCatalog, PenalError> {
    let content = std::fs::read_to_string(path).map_err(|e| PenalError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let catalog: AdditionCatalog =
        serde_json::from_str(&content).map_err(|e| PenalError::CatalogLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Parse an addition catalog from a JSON string.
pub fn parse_catalog_str(json: &str) -> Result<AdditionCatalog, PenalError> {
    let catalog: AdditionCatalog = serde_json::from_str(json)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// The catalog shipped with the crate.
pub fn builtin_catalog() -> Result<AdditionCatalog, PenalError> {
    parse_catalog_str(STANDARD_ADDITIONS_JSON)
}

pub fn validate_catalog(catalog: &AdditionCatalog) -> Result<(), PenalError> {
    let mut seen = HashSet::new();

    for addition in &catalog.additions {
        let name = addition.name.trim();
        if name.is_empty() {
            return Err(PenalError::CatalogInvalid(
                "addition name must not be empty".into(),
            ));
        }

        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(PenalError::CatalogInvalid(format!(
                "duplicate addition '{name}'"
            )));
        }

        if addition.sentence_multiplier.is_sign_negative()
            || addition.points_multiplier.is_sign_negative()
        {
            return Err(PenalError::CatalogInvalid(format!(
                "addition '{name}' has a negative multiplier"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_catalog() {
        let catalog = builtin_catalog().unwrap();
        let offender = catalog.get("offender").unwrap();
        assert!(offender.is_identity());

        let accomplice = catalog.get(" Accomplice ").unwrap();
        assert_eq!(accomplice.sentence_multiplier, dec!(0.5));
        assert!(!accomplice.is_identity());
    }

    #[test]
    fn test_selectable_excludes_parole() {
        let catalog = builtin_catalog().unwrap();
        let names: Vec<&str> = catalog
            .selectable("Parole Violation")
            .map(|a| a.name.as_str())
            .collect();
        assert!(!names.contains(&"Parole Violation"));
        assert!(names.contains(&"Offender"));
        assert_eq!(names.len(), catalog.len() - 1);
    }

    #[test]
    fn test_duplicate_addition_rejected() {
        let json = r#"{ "additions": [
            { "name": "Attempt", "sentenceMultiplier": "0.5", "pointsMultiplier": "0.5" },
            { "name": "attempt", "sentenceMultiplier": "0.5", "pointsMultiplier": "0.5" }
        ] }"#;
        assert!(parse_catalog_str(json).is_err());
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let json = r#"{ "additions": [
            { "name": "Odd", "sentenceMultiplier": "-1", "pointsMultiplier": "1" }
        ] }"#;
        let err = parse_catalog_str(json).unwrap_err();
        assert!(err.to_string().contains("negative multiplier"));
    }

    #[test]
    fn test_load_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("additions.json");
        std::fs::write(&path, STANDARD_ADDITIONS_JSON).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert!(catalog.get("Parole Violation").is_some());
    }
}
