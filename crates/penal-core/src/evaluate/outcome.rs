use crate::additions::Addition;
use crate::codes::schema::{BailFlag, ChargeDefinition};
use crate::model::{OffenseCount, SelectedCharge, TimeSpan};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentence range and points. Times are in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceFigures {
    pub min_time: Decimal,
    pub max_time: Decimal,
    pub points: Decimal,
}

impl SentenceFigures {
    /// Saturating sum; totals never overflow.
    pub fn add(&mut self, other: &SentenceFigures) {
        self.min_time = self.min_time.saturating_add(other.min_time);
        self.max_time = self.max_time.saturating_add(other.max_time);
        self.points = self.points.saturating_add(other.points);
    }
}

/// Per-charge durations split into days/hours/minutes for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeDisplay {
    pub original_min_time: TimeSpan,
    pub original_max_time: TimeSpan,
    pub modified_min_time: TimeSpan,
    pub modified_max_time: TimeSpan,
    pub impound: TimeSpan,
    pub suspension: TimeSpan,
}

/// Evaluation of one charge row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResult {
    pub row: SelectedCharge,
    /// `None` when the row's charge id is not in the legal code.
    pub charge_details: Option<ChargeDefinition>,
    /// Offense count used for lookups, if legal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offense: Option<OffenseCount>,
    /// Drug category used for time and fine lookups, if one applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Before additions.
    pub original: SentenceFigures,
    /// After additions.
    pub modified: SentenceFigures,
    pub applied_additions: Vec<Addition>,
    pub is_modified: bool,
    pub fine: Decimal,
    /// Impound in minutes.
    pub impound: Decimal,
    /// Suspension in minutes.
    pub suspension: Decimal,
    /// `None` means N/A.
    pub bail_auto: Option<BailFlag>,
    pub bail_cost: Decimal,
    pub display: ChargeDisplay,
}

impl ChargeResult {
    /// Zero-valued result for a row whose charge could not be resolved.
    pub fn unresolved(row: SelectedCharge) -> Self {
        Self {
            row,
            charge_details: None,
            offense: None,
            category: None,
            original: SentenceFigures::default(),
            modified: SentenceFigures::default(),
            applied_additions: Vec::new(),
            is_modified: false,
            fine: Decimal::ZERO,
            impound: Decimal::ZERO,
            suspension: Decimal::ZERO,
            bail_auto: None,
            bail_cost: Decimal::ZERO,
            display: ChargeDisplay::default(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.charge_details.is_some()
    }
}

/// Overall bail classification of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BailStatus {
    #[serde(rename = "N/A")]
    NotApplicable,
    #[serde(rename = "NOT ELIGIBLE")]
    NotEligible,
    #[serde(rename = "DISCRETIONARY")]
    Discretionary,
    #[serde(rename = "ELIGIBLE")]
    Eligible,
}

impl fmt::Display for BailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BailStatus::NotApplicable => write!(f, "N/A"),
            BailStatus::NotEligible => write!(f, "NOT ELIGIBLE"),
            BailStatus::Discretionary => write!(f, "DISCRETIONARY"),
            BailStatus::Eligible => write!(f, "ELIGIBLE"),
        }
    }
}

/// A stipulation note surfaced for a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stipulation {
    pub title: String,
    pub extra: String,
}

/// Report-level sums before caps. Times in minutes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub original: SentenceFigures,
    pub modified: SentenceFigures,
    pub fine: Decimal,
    pub total_bail_cost: Decimal,
    pub impound: Decimal,
    pub suspension: Decimal,
}

/// Full calculation for an arrest report.
///
/// Every `Decimal` field (money, points, minutes) serializes as a JSON
/// string such as `"1500"` to keep exact precision. Consumers must parse
/// these before doing arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrestCalculation {
    pub calculation_results: Vec<ChargeResult>,
    pub extras: Vec<Stipulation>,
    pub totals: Totals,
    pub min_time_capped: Decimal,
    pub max_time_capped: Decimal,
    pub is_capped: bool,
    pub impound_capped: Decimal,
    pub is_impound_capped: bool,
    pub suspension_capped: Decimal,
    pub is_suspension_capped: bool,
    pub bail_status: BailStatus,
    pub is_streets_eligible: bool,
}
