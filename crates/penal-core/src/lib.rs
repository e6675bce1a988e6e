pub mod additions;
pub mod aggregate;
pub mod codes;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod options;
pub mod stipulation;

pub use options::{AdditionStacking, CalculationOptions, Limits};

use additions::AdditionCatalog;
use codes::schema::ChargeDefinition;
use codes::LegalCodeTable;
use evaluate::outcome::ArrestCalculation;
use model::SelectedCharge;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request body: the charge rows of one report plus the parole flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    #[serde(default)]
    pub report: Vec<SelectedCharge>,
    #[serde(default)]
    pub is_parole_violator: bool,
}

/// Special-statute eligibility check supplied by the caller.
pub trait StreetsPredicate {
    fn is_eligible(&self, charges: &[SelectedCharge], details: &[&ChargeDefinition]) -> bool;
}

impl<F> StreetsPredicate for F
where
    F: Fn(&[SelectedCharge], &[&ChargeDefinition]) -> bool,
{
    fn is_eligible(&self, charges: &[SelectedCharge], details: &[&ChargeDefinition]) -> bool {
        self(charges, details)
    }
}

/// Predicate for callers without a special-statute rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverEligible;

impl StreetsPredicate for NeverEligible {
    fn is_eligible(&self, _charges: &[SelectedCharge], _details: &[&ChargeDefinition]) -> bool {
        false
    }
}

/// Main API entry point: evaluate every charge, collect stipulations,
/// aggregate totals under the configured caps and ask the streets predicate.
///
/// Pure and deterministic: the same inputs always give the same result.
pub fn calculate(
    charges: &[SelectedCharge],
    is_parole_violator: bool,
    table: &LegalCodeTable,
    catalog: &AdditionCatalog,
    options: &CalculationOptions,
    streets: &dyn StreetsPredicate,
) -> ArrestCalculation {
    let results = evaluate::evaluate_report(charges, table, catalog, is_parole_violator, options);
    let extras = stipulation::extract(&results);
    let summary = aggregate::aggregate(&results, &options.limits);

    let resolved: Vec<&ChargeDefinition> = results
        .iter()
        .filter_map(|r| r.charge_details.as_ref())
        .collect();
    let is_streets_eligible = streets.is_eligible(charges, &resolved);

    debug!(
        charges = charges.len(),
        resolved = resolved.len(),
        is_parole_violator,
        capped = summary.is_capped,
        bail_status = %summary.bail_status,
        "arrest calculation complete"
    );

    ArrestCalculation {
        calculation_results: results,
        extras,
        totals: summary.totals,
        min_time_capped: summary.min_time_capped,
        max_time_capped: summary.max_time_capped,
        is_capped: summary.is_capped,
        impound_capped: summary.impound_capped,
        is_impound_capped: summary.is_impound_capped,
        suspension_capped: summary.suspension_capped,
        is_suspension_capped: summary.is_suspension_capped,
        bail_status: summary.bail_status,
        is_streets_eligible,
    }
}

/// [`calculate`] driven by a deserialized request body.
pub fn calculate_request(
    request: &CalculationRequest,
    table: &LegalCodeTable,
    catalog: &AdditionCatalog,
    options: &CalculationOptions,
    streets: &dyn StreetsPredicate,
) -> ArrestCalculation {
    calculate(
        &request.report,
        request.is_parole_violator,
        table,
        catalog,
        options,
        streets,
    )
}
