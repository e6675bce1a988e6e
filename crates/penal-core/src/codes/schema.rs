use crate::model::{ChargeClass, OffenseCount, TimeSpan};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel the legal code uses for "no stipulation".
pub const NO_STIPULATION: &str = "N/A";

/// A legal-code file: metadata plus every charge definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalCodeDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub charges: Vec<ChargeDefinition>,
}

/// A field that is either a single value or a map keyed by offense
/// number ("1".."5") or drug category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ByKey<T> {
    Flat(T),
    Keyed(BTreeMap<String, T>),
}

impl<T> ByKey<T> {
    /// Value for `key`. A flat value answers every key.
    pub fn resolve(&self, key: &str) -> Option<&T> {
        match self {
            ByKey::Flat(value) => Some(value),
            ByKey::Keyed(map) => map.get(key),
        }
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self, ByKey::Keyed(_))
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            ByKey::Flat(_) => Vec::new(),
            ByKey::Keyed(map) => map.keys().map(String::as_str).collect(),
        }
    }
}

/// Statutory category of a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChargeType {
    Felony,
    Misdemeanor,
    Infraction,
    Unknown(String),
}

impl ChargeType {
    /// Short code used in report titles.
    pub fn code(&self) -> &str {
        match self {
            ChargeType::Felony => "F",
            ChargeType::Misdemeanor => "M",
            ChargeType::Infraction => "I",
            ChargeType::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ChargeType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "f" | "felony" => ChargeType::Felony,
            "m" | "misdemeanor" => ChargeType::Misdemeanor,
            "i" | "infraction" => ChargeType::Infraction,
            _ => ChargeType::Unknown(value.trim().to_string()),
        }
    }
}

impl From<ChargeType> for String {
    fn from(value: ChargeType) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeType::Felony => write!(f, "Felony"),
            ChargeType::Misdemeanor => write!(f, "Misdemeanor"),
            ChargeType::Infraction => write!(f, "Infraction"),
            ChargeType::Unknown(raw) if raw.is_empty() => write!(f, "Unknown"),
            ChargeType::Unknown(raw) => write!(f, "Unknown ({raw})"),
        }
    }
}

/// Automatic bail eligibility of a charge: `true`, `false` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBailFlag", into = "RawBailFlag")]
pub enum BailFlag {
    Eligible,
    NotEligible,
    Discretionary,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum RawBailFlag {
    Bool(bool),
    Level(u8),
}

impl TryFrom<RawBailFlag> for BailFlag {
    type Error = String;

    fn try_from(raw: RawBailFlag) -> Result<Self, Self::Error> {
        match raw {
            RawBailFlag::Bool(true) => Ok(BailFlag::Eligible),
            RawBailFlag::Bool(false) => Ok(BailFlag::NotEligible),
            RawBailFlag::Level(2) => Ok(BailFlag::Discretionary),
            RawBailFlag::Level(other) => Err(format!(
                "invalid bail flag {other} (expected true, false or 2)"
            )),
        }
    }
}

impl From<BailFlag> for RawBailFlag {
    fn from(flag: BailFlag) -> Self {
        match flag {
            BailFlag::Eligible => RawBailFlag::Bool(true),
            BailFlag::NotEligible => RawBailFlag::Bool(false),
            BailFlag::Discretionary => RawBailFlag::Level(2),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BailTerms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<ByKey<BailFlag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<ByKey<Decimal>>,
}

/// One statutory offense in the legal code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeDefinition {
    #[serde(deserialize_with = "text_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub charge_type: ChargeType,
    /// Which sentencing classes are legal for this charge.
    pub class: BTreeMap<ChargeClass, bool>,
    /// Which offense counts ("1".."5") are legal for this charge.
    pub offense: BTreeMap<String, bool>,
    pub min_time: ByKey<TimeSpan>,
    pub max_time: ByKey<TimeSpan>,
    #[serde(default)]
    pub points: BTreeMap<ChargeClass, Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine: Option<ByKey<Decimal>>,
    /// Vehicle impound in days, per offense count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impound: Option<ByKey<Decimal>>,
    /// License suspension in days, per offense count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspension: Option<ByKey<Decimal>>,
    #[serde(default)]
    pub bail: BailTerms,
    /// Ordered drug-category labels; empty for ordinary charges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drugs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl ChargeDefinition {
    pub fn allows_class(&self, class: ChargeClass) -> bool {
        self.class.get(&class).copied().unwrap_or(false)
    }

    pub fn allows_offense(&self, offense: OffenseCount) -> bool {
        self.offense
            .get(&offense.to_string())
            .copied()
            .unwrap_or(false)
    }

    pub fn has_drug_categories(&self) -> bool {
        !self.drugs.is_empty()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.drugs.iter().any(|c| c == category)
    }

    pub fn legal_classes(&self) -> Vec<ChargeClass> {
        self.class
            .iter()
            .filter(|(_, allowed)| **allowed)
            .map(|(class, _)| *class)
            .collect()
    }

    pub fn legal_offenses(&self) -> Vec<OffenseCount> {
        (1..=OffenseCount::MAX)
            .filter_map(OffenseCount::new)
            .filter(|n| self.allows_offense(*n))
            .collect()
    }

    /// Stipulation text, unless absent, blank or the "N/A" sentinel.
    pub fn stipulation(&self) -> Option<&str> {
        self.extra
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty() && *text != NO_STIPULATION)
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
