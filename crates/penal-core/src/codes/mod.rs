pub mod builtin;
pub mod schema;

use crate::error::PenalError;
use crate::model::OffenseCount;
use schema::{ByKey, ChargeDefinition, LegalCodeDef};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A validated legal code, indexed by charge id.
///
/// Read-only for the lifetime of an evaluation.
#[derive(Debug, Clone, Default)]
pub struct LegalCodeTable {
    name: String,
    version: String,
    description: Option<String>,
    charges: Vec<ChargeDefinition>,
    index: HashMap<String, usize>,
}

impl LegalCodeTable {
    /// Validate a definition and index it by charge id.
    pub fn from_def(def: LegalCodeDef) -> Result<Self, PenalError> {
        validate_legal_code(&def)?;
        let index = def
            .charges
            .iter()
            .enumerate()
            .map(|(i, charge)| (charge.id.trim().to_string(), i))
            .collect();
        Ok(Self {
            name: def.name,
            version: def.version,
            description: def.description,
            charges: def.charges,
            index,
        })
    }

    pub fn get(&self, id: &str) -> Option<&ChargeDefinition> {
        self.index.get(id.trim()).map(|&i| &self.charges[i])
    }

    /// Charges in file order.
    pub fn iter(&self) -> impl Iterator<Item = &ChargeDefinition> {
        self.charges.iter()
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Load a legal code from a JSON file.
pub fn load_legal_code(path: &Path) -> Result<LegalCodeTable, PenalError> {
    let content = std::fs::read_to_string(path).map_err(|e| PenalError::CodeLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_legal_code(&content, path)
}

/// Parse a legal code from a JSON string.
pub fn parse_legal_code(json: &str, source: &Path) -> Result<LegalCodeTable, PenalError> {
    let def: LegalCodeDef = serde_json::from_str(json).map_err(|e| PenalError::CodeLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    LegalCodeTable::from_def(def)
}

/// Parse a legal code from a JSON string (no file path context).
pub fn parse_legal_code_str(json: &str) -> Result<LegalCodeTable, PenalError> {
    let def: LegalCodeDef = serde_json::from_str(json).map_err(PenalError::Json)?;
    LegalCodeTable::from_def(def)
}

/// Validate that a legal code is well-formed.
///
/// Only structural problems are rejected; odd but evaluable data is
/// reported by [`lint_legal_code`] instead.
pub fn validate_legal_code(def: &LegalCodeDef) -> Result<(), PenalError> {
    let mut seen = HashSet::new();

    for charge in &def.charges {
        let id = charge.id.trim();
        if id.is_empty() {
            return Err(PenalError::CodeInvalid(format!(
                "charge '{}' has an empty id",
                charge.name
            )));
        }

        if !seen.insert(id.to_string()) {
            return Err(PenalError::CodeInvalid(format!("duplicate charge id '{id}'")));
        }

        if charge.name.trim().is_empty() {
            return Err(PenalError::CodeInvalid(format!(
                "charge '{id}' has an empty name"
            )));
        }

        let mut labels = HashSet::new();
        for label in &charge.drugs {
            if label.trim().is_empty() {
                return Err(PenalError::CodeInvalid(format!(
                    "charge '{id}' has an empty drug category"
                )));
            }
            if !labels.insert(label.as_str()) {
                return Err(PenalError::CodeInvalid(format!(
                    "charge '{id}' lists drug category '{label}' twice"
                )));
            }
        }
    }

    Ok(())
}

/// Non-fatal findings about a loaded legal code.
pub fn lint_legal_code(table: &LegalCodeTable) -> Vec<String> {
    let mut warnings = Vec::new();

    for charge in table.iter() {
        let valid_key = |key: &str| {
            OffenseCount::from_str_loose(key).is_some() || charge.has_category(key)
        };

        let keyed_fields = [
            ("minTime", charge.min_time.keys()),
            ("maxTime", charge.max_time.keys()),
            ("fine", charge.fine.as_ref().map(ByKey::keys).unwrap_or_default()),
        ];
        for (field, keys) in keyed_fields {
            for key in keys.into_iter().filter(|k| !valid_key(*k)) {
                warnings.push(format!(
                    "charge '{}' {} uses key '{}', which is neither an offense number nor a drug category",
                    charge.id, field, key
                ));
            }
        }

        let offense_fields = [
            ("impound", charge.impound.as_ref()),
            ("suspension", charge.suspension.as_ref()),
        ];
        for (field, spec) in offense_fields {
            let keys = spec.map(ByKey::keys).unwrap_or_default();
            for key in keys
                .into_iter()
                .filter(|k| OffenseCount::from_str_loose(k).is_none())
            {
                warnings.push(format!(
                    "charge '{}' {} uses key '{}', which is not an offense number",
                    charge.id, field, key
                ));
            }
        }

        let bail_keyed = charge.bail.auto.as_ref().is_some_and(ByKey::is_keyed)
            || charge.bail.cost.as_ref().is_some_and(ByKey::is_keyed);
        if bail_keyed && !charge.has_drug_categories() {
            warnings.push(format!(
                "charge '{}' has per-category bail but no drug categories; bail will be N/A",
                charge.id
            ));
        }

        for key in inverted_keys(charge) {
            warnings.push(format!(
                "charge '{}' has maxTime below minTime for '{}'; max will be raised to min",
                charge.id, key
            ));
        }

        if charge.legal_offenses().is_empty() {
            warnings.push(format!(
                "charge '{}' allows no offense count; time and fine will always be zero",
                charge.id
            ));
        }
    }

    warnings
}

/// Keys for which the raw table has `maxTime < minTime`.
fn inverted_keys(charge: &ChargeDefinition) -> Vec<String> {
    let mut keys: Vec<String> = match (&charge.min_time, &charge.max_time) {
        (ByKey::Flat(_), ByKey::Flat(_)) => vec!["*".to_string()],
        _ => charge
            .min_time
            .keys()
            .into_iter()
            .chain(charge.max_time.keys())
            .map(str::to_string)
            .collect(),
    };
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter(|key| {
            let min = charge.min_time.resolve(key).map(|t| t.to_minutes());
            let max = charge.max_time.resolve(key).map(|t| t.to_minutes());
            matches!((min, max), (Some(min), Some(max)) if max < min)
        })
        .collect()
}
