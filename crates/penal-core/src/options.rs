use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAROLE_ADDITION: &str = "Parole Violation";
pub const DEFAULT_OFFENDER_ADDITION: &str = "Offender";

/// Statutory ceilings on a whole report, in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub max_sentence_days: Decimal,
    pub max_impound_days: Decimal,
    pub max_suspension_days: Decimal,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_sentence_days: Decimal::from(365),
            max_impound_days: Decimal::from(30),
            max_suspension_days: Decimal::from(365),
        }
    }
}

/// How the parole-violation addition combines with the row's own addition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdditionStacking {
    /// Both additions apply; their multipliers multiply.
    #[default]
    Multiply,
    /// The parole addition takes the place of the row's addition.
    Replace,
    /// The parole addition is listed but does not change any figure.
    DisplayOnly,
}

impl AdditionStacking {
    pub const ALL: &'static [&'static str] = &["multiply", "replace", "display-only"];
}

impl fmt::Display for AdditionStacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdditionStacking::Multiply => write!(f, "multiply"),
            AdditionStacking::Replace => write!(f, "replace"),
            AdditionStacking::DisplayOnly => write!(f, "display-only"),
        }
    }
}

impl FromStr for AdditionStacking {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "multiply" => Ok(AdditionStacking::Multiply),
            "replace" => Ok(AdditionStacking::Replace),
            "display-only" | "display" => Ok(AdditionStacking::DisplayOnly),
            other => Err(format!(
                "unknown stacking policy '{other}' (expected one of: {})",
                Self::ALL.join(", ")
            )),
        }
    }
}

/// Options controlling a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationOptions {
    pub limits: Limits,
    /// Name of the addition applied to parole violators.
    pub parole_addition: String,
    /// Addition used when a row names none.
    pub default_addition: String,
    pub stacking: AdditionStacking,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            parole_addition: DEFAULT_PAROLE_ADDITION.to_string(),
            default_addition: DEFAULT_OFFENDER_ADDITION.to_string(),
            stacking: AdditionStacking::default(),
        }
    }
}

impl CalculationOptions {
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_stacking(mut self, stacking: AdditionStacking) -> Self {
        self.stacking = stacking;
        self
    }

    pub fn is_parole_addition(&self, name: &str) -> bool {
        name.trim().eq_ignore_ascii_case(self.parole_addition.trim())
    }
}
