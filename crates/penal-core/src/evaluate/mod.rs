pub mod charge;
pub mod lookup;
pub mod outcome;

pub use charge::evaluate_charge;
pub use lookup::SentenceLookup;
pub use outcome::{ArrestCalculation, BailStatus, ChargeResult, SentenceFigures, Stipulation, Totals};

use crate::additions::AdditionCatalog;
use crate::codes::LegalCodeTable;
use crate::model::SelectedCharge;
use crate::options::CalculationOptions;

/// Evaluate every row of a report, preserving row order.
pub fn evaluate_report(
    rows: &[SelectedCharge],
    table: &LegalCodeTable,
    catalog: &AdditionCatalog,
    is_parole_violator: bool,
    options: &CalculationOptions,
) -> Vec<ChargeResult> {
    rows.iter()
        .map(|row| evaluate_charge(row, table, catalog, is_parole_violator, options))
        .collect()
}
