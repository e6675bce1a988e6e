use crate::additions::{Addition, AdditionCatalog};
use crate::codes::schema::ChargeDefinition;
use crate::codes::LegalCodeTable;
use crate::evaluate::lookup::SentenceLookup;
use crate::evaluate::outcome::{ChargeDisplay, ChargeResult, SentenceFigures};
use crate::model::{LookupKey, OffenseCount, SelectedCharge, TimeSpan};
use crate::options::{AdditionStacking, CalculationOptions};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Evaluate a single charge row against the legal code and addition catalog.
///
/// Never fails: an unknown charge yields an unresolved zero result, and any
/// illegal class, offense, category or addition contributes nothing.
pub fn evaluate_charge(
    row: &SelectedCharge,
    table: &LegalCodeTable,
    catalog: &AdditionCatalog,
    is_parole_violator: bool,
    options: &CalculationOptions,
) -> ChargeResult {
    let Some(details) = row.charge_id().and_then(|id| table.get(id)) else {
        debug!(
            charge_id = row.charge_id().unwrap_or("<none>"),
            "charge not in legal code; excluded from totals"
        );
        return ChargeResult::unresolved(row.clone());
    };

    let offense = legal_offense(row, details);
    let key = lookup_key(row, details, offense);

    let (min_time, max_time) = key
        .as_ref()
        .map(|k| details.time_range(k))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));

    let points = match row.class() {
        Some(class) if details.allows_class(class) => details.points(class),
        _ => {
            debug!(charge = %details.id, class = ?row.class, "class unset or illegal; no points");
            Decimal::ZERO
        }
    };

    let original = SentenceFigures {
        min_time,
        max_time,
        points,
    };

    let (applied, effective) = resolve_additions(row, catalog, is_parole_violator, options);
    let sentence_factor = effective
        .iter()
        .fold(Decimal::ONE, |acc, a| acc.saturating_mul(a.sentence_multiplier));
    let points_factor = effective
        .iter()
        .fold(Decimal::ONE, |acc, a| acc.saturating_mul(a.points_multiplier));
    let is_modified = effective.iter().any(|a| !a.is_identity());

    let modified = SentenceFigures {
        min_time: original.min_time.saturating_mul(sentence_factor),
        max_time: original.max_time.saturating_mul(sentence_factor),
        points: original.points.saturating_mul(points_factor),
    };

    let fine = key
        .as_ref()
        .map(|k| details.fine(k))
        .unwrap_or(Decimal::ZERO);
    let impound = offense.map(|n| details.impound(n)).unwrap_or(Decimal::ZERO);
    let suspension = offense
        .map(|n| details.suspension(n))
        .unwrap_or(Decimal::ZERO);
    let (bail_auto, bail_cost) = details.bail(row.category());

    let category = match key {
        Some(LookupKey::Category(c)) => Some(c),
        _ => None,
    };

    ChargeResult {
        row: row.clone(),
        charge_details: Some(details.clone()),
        offense,
        category,
        original,
        modified,
        applied_additions: applied.into_iter().cloned().collect(),
        is_modified,
        fine,
        impound,
        suspension,
        bail_auto,
        bail_cost,
        display: ChargeDisplay {
            original_min_time: TimeSpan::from_minutes(original.min_time),
            original_max_time: TimeSpan::from_minutes(original.max_time),
            modified_min_time: TimeSpan::from_minutes(modified.min_time),
            modified_max_time: TimeSpan::from_minutes(modified.max_time),
            impound: TimeSpan::from_minutes(impound),
            suspension: TimeSpan::from_minutes(suspension),
        },
    }
}

/// The row's offense count, if set to something the charge allows.
fn legal_offense(row: &SelectedCharge, details: &ChargeDefinition) -> Option<OffenseCount> {
    match row.offense() {
        Some(n) if details.allows_offense(n) => Some(n),
        _ => {
            debug!(charge = %details.id, offense = ?row.offense, "offense unset or illegal");
            None
        }
    }
}

/// Drug charges with a category selected look up by category; everything
/// else looks up by offense count.
fn lookup_key(
    row: &SelectedCharge,
    details: &ChargeDefinition,
    offense: Option<OffenseCount>,
) -> Option<LookupKey> {
    match row.category() {
        Some(category) if details.has_drug_categories() => {
            if details.has_category(category) {
                Some(LookupKey::Category(category.to_string()))
            } else {
                debug!(charge = %details.id, category, "drug category not declared for charge");
                None
            }
        }
        _ => offense.map(LookupKey::Offense),
    }
}

/// Returns the additions listed on the result and the subset whose
/// multipliers apply.
fn resolve_additions<'a>(
    row: &SelectedCharge,
    catalog: &'a AdditionCatalog,
    is_parole_violator: bool,
    options: &CalculationOptions,
) -> (Vec<&'a Addition>, Vec<&'a Addition>) {
    let requested = match row.addition() {
        Some(name) if options.is_parole_addition(name) => {
            warn!(
                addition = name,
                "parole addition is not selectable per charge; using default addition"
            );
            options.default_addition.as_str()
        }
        Some(name) => name,
        None => options.default_addition.as_str(),
    };

    let chosen = catalog.get(requested);
    if chosen.is_none() {
        debug!(addition = requested, "addition not in catalog; no multiplier applied");
    }

    let parole = if is_parole_violator {
        let parole = catalog.get(&options.parole_addition);
        if parole.is_none() {
            debug!(
                addition = %options.parole_addition,
                "parole addition not in catalog; parole flag has no effect"
            );
        }
        parole
    } else {
        None
    };

    let chosen: Vec<&Addition> = chosen.into_iter().collect();
    match (parole, options.stacking) {
        (None, _) => (chosen.clone(), chosen),
        (Some(parole), AdditionStacking::Multiply) => {
            let mut both = chosen;
            both.push(parole);
            (both.clone(), both)
        }
        (Some(parole), AdditionStacking::Replace) => (vec![parole], vec![parole]),
        (Some(parole), AdditionStacking::DisplayOnly) => {
            let mut listed = chosen.clone();
            listed.push(parole);
            (listed, chosen)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::additions::builtin_catalog;
    use crate::codes::parse_legal_code_str;
    use crate::codes::schema::BailFlag;
    use rust_decimal_macros::dec;

    const CODE: &str = r#"{
        "name": "Charge Tests", "version": "1.0",
        "charges": [
            {
                "id": "10", "name": "Burglary", "type": "F",
                "class": { "A": true, "B": true, "C": false },
                "offense": { "1": true, "2": true, "3": false },
                "minTime": {
                    "1": { "days": 0, "hours": 2, "min": 0 },
                    "2": { "days": 0, "hours": 4, "min": 0 }
                },
                "maxTime": {
                    "1": { "days": 0, "hours": 1, "min": 0 },
                    "2": { "days": 0, "hours": 8, "min": 0 }
                },
                "points": { "A": 8, "B": 6, "C": 4 },
                "fine": { "1": 1000, "2": 2000 },
                "impound": { "1": 1, "2": 2 },
                "suspension": { "2": 5 },
                "bail": { "auto": 2, "cost": 4000 }
            },
            {
                "id": "20", "name": "Drug Sale", "type": "F",
                "class": { "A": true },
                "offense": { "1": true, "2": true },
                "drugs": ["Cannabis", "Cocaine"],
                "minTime": { "Cannabis": { "days": 0, "hours": 1, "min": 0 } },
                "maxTime": { "Cannabis": { "days": 0, "hours": 3, "min": 0 } },
                "points": { "A": 4 },
                "fine": { "Cannabis": 300, "1": 9999 },
                "impound": { "2": 3 },
                "bail": { "auto": { "Cannabis": true }, "cost": { "Cannabis": 250 } }
            }
        ]
    }"#;

    fn eval(row: SelectedCharge, parole: bool, options: &CalculationOptions) -> ChargeResult {
        let table = parse_legal_code_str(CODE).unwrap();
        let catalog = builtin_catalog().unwrap();
        evaluate_charge(&row, &table, &catalog, parole, options)
    }

    #[test]
    fn test_unknown_charge_is_unresolved() {
        let result = eval(
            SelectedCharge::new("999"),
            false,
            &CalculationOptions::default(),
        );
        assert!(!result.is_resolved());
        assert_eq!(result.fine, Decimal::ZERO);
        assert!(result.applied_additions.is_empty());
    }

    #[test]
    fn test_inverted_table_range_clamped() {
        let row = SelectedCharge::new("10").with_class("A");
        let result = eval(row, false, &CalculationOptions::default());
        assert_eq!(result.original.min_time, dec!(120));
        assert_eq!(result.original.max_time, dec!(120));
        assert_eq!(result.original.points, dec!(8));
        assert_eq!(result.fine, dec!(1000));
        assert_eq!(result.impound, dec!(1440));
        assert_eq!(result.bail_auto, Some(BailFlag::Discretionary));
        assert_eq!(result.bail_cost, dec!(4000));
    }

    #[test]
    fn test_illegal_offense_contributes_nothing() {
        let row = SelectedCharge::new("10").with_class("A").with_offense("3");
        let result = eval(row, false, &CalculationOptions::default());
        assert!(result.is_resolved());
        assert_eq!(result.offense, None);
        assert_eq!(result.original.min_time, Decimal::ZERO);
        assert_eq!(result.fine, Decimal::ZERO);
        assert_eq!(result.impound, Decimal::ZERO);
        // Class is still legal, so points remain.
        assert_eq!(result.original.points, dec!(8));
    }

    #[test]
    fn test_illegal_class_gives_zero_points() {
        let row = SelectedCharge::new("10").with_class("C").with_offense("2");
        let result = eval(row, false, &CalculationOptions::default());
        assert_eq!(result.original.points, Decimal::ZERO);
        assert_eq!(result.original.min_time, dec!(240));
        assert_eq!(result.suspension, dec!(7200));
    }

    #[test]
    fn test_accomplice_halves_sentence_and_points() {
        let row = SelectedCharge::new("10")
            .with_class("B")
            .with_offense("2")
            .with_addition("Accomplice");
        let result = eval(row, false, &CalculationOptions::default());
        assert!(result.is_modified);
        assert_eq!(result.modified.min_time, dec!(120));
        assert_eq!(result.modified.max_time, dec!(240));
        assert_eq!(result.modified.points, dec!(3));
        // Fines are not scaled by additions.
        assert_eq!(result.fine, dec!(2000));
        assert_eq!(result.display.modified_max_time.hours, 4);
    }

    #[test]
    fn test_default_offender_is_identity() {
        let row = SelectedCharge::new("10").with_class("A").with_offense("2");
        let result = eval(row, false, &CalculationOptions::default());
        assert!(!result.is_modified);
        assert_eq!(result.applied_additions.len(), 1);
        assert_eq!(result.applied_additions[0].name, "Offender");
        assert_eq!(result.modified, result.original);
    }

    #[test]
    fn test_parole_multiplies_with_chosen_addition() {
        let row = SelectedCharge::new("10")
            .with_class("A")
            .with_offense("2")
            .with_addition("Attempt");
        let result = eval(row, true, &CalculationOptions::default());
        let names: Vec<&str> = result
            .applied_additions
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["Attempt", "Parole Violation"]);
        // 240 * 0.5 * 1.5
        assert_eq!(result.modified.min_time, dec!(180));
        // 8 * 0.5 * 1
        assert_eq!(result.modified.points, dec!(4));
    }

    #[test]
    fn test_parole_replace_policy() {
        let options = CalculationOptions::default().with_stacking(AdditionStacking::Replace);
        let row = SelectedCharge::new("10")
            .with_class("A")
            .with_offense("2")
            .with_addition("Attempt");
        let result = eval(row, true, &options);
        assert_eq!(result.applied_additions.len(), 1);
        assert_eq!(result.modified.min_time, dec!(360));
        assert_eq!(result.modified.points, dec!(8));
    }

    #[test]
    fn test_parole_display_only_policy() {
        let options = CalculationOptions::default().with_stacking(AdditionStacking::DisplayOnly);
        let row = SelectedCharge::new("10").with_class("A").with_offense("2");
        let result = eval(row, true, &options);
        assert_eq!(result.applied_additions.len(), 2);
        assert!(!result.is_modified);
        assert_eq!(result.modified, result.original);
    }

    #[test]
    fn test_parole_not_selectable_per_row() {
        let row = SelectedCharge::new("10")
            .with_class("A")
            .with_offense("2")
            .with_addition("parole violation");
        let result = eval(row, false, &CalculationOptions::default());
        assert_eq!(result.applied_additions[0].name, "Offender");
        assert!(!result.is_modified);
    }

    #[test]
    fn test_unknown_addition_is_identity() {
        let row = SelectedCharge::new("10")
            .with_class("A")
            .with_addition("Mastermind");
        let result = eval(row, false, &CalculationOptions::default());
        assert!(result.applied_additions.is_empty());
        assert!(!result.is_modified);
        assert_eq!(result.modified, result.original);
    }

    #[test]
    fn test_drug_category_drives_time_and_fine_only() {
        let row = SelectedCharge::new("20")
            .with_class("A")
            .with_offense("2")
            .with_category("Cannabis");
        let result = eval(row, false, &CalculationOptions::default());
        assert_eq!(result.category.as_deref(), Some("Cannabis"));
        assert_eq!(result.original.min_time, dec!(60));
        assert_eq!(result.original.max_time, dec!(180));
        assert_eq!(result.fine, dec!(300));
        assert_eq!(result.impound, dec!(4320));
        assert_eq!(result.bail_auto, Some(BailFlag::Eligible));
        assert_eq!(result.bail_cost, dec!(250));
    }

    #[test]
    fn test_undeclared_category_contributes_nothing() {
        let row = SelectedCharge::new("20")
            .with_class("A")
            .with_category("Heroin");
        let result = eval(row, false, &CalculationOptions::default());
        assert_eq!(result.category, None);
        assert_eq!(result.original.max_time, Decimal::ZERO);
        assert_eq!(result.fine, Decimal::ZERO);
        assert_eq!(result.bail_auto, None);
    }

    #[test]
    fn test_drug_charge_without_category_uses_offense() {
        let row = SelectedCharge::new("20").with_class("A");
        let result = eval(row, false, &CalculationOptions::default());
        assert_eq!(result.category, None);
        assert_eq!(result.fine, dec!(9999));
        assert_eq!(result.original.min_time, Decimal::ZERO);
        assert_eq!(result.bail_auto, None);
    }
}
