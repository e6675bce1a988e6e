use crate::codes::schema::BailFlag;
use crate::evaluate::outcome::{BailStatus, ChargeResult, Totals};
use crate::model::days_to_minutes;
use crate::options::Limits;
use rust_decimal::Decimal;

/// Report-level totals with statutory caps applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub totals: Totals,
    pub min_time_capped: Decimal,
    pub max_time_capped: Decimal,
    pub is_capped: bool,
    pub impound_capped: Decimal,
    pub is_impound_capped: bool,
    pub suspension_capped: Decimal,
    pub is_suspension_capped: bool,
    pub bail_status: BailStatus,
}

/// Sum resolved charge results, apply caps and derive the bail status.
/// Unresolved rows contribute nothing.
pub fn aggregate(results: &[ChargeResult], limits: &Limits) -> ReportSummary {
    let mut totals = Totals::default();

    for result in results.iter().filter(|r| r.is_resolved()) {
        totals.original.add(&result.original);
        totals.modified.add(&result.modified);
        totals.fine = totals.fine.saturating_add(result.fine);
        totals.impound = totals.impound.saturating_add(result.impound);
        totals.suspension = totals.suspension.saturating_add(result.suspension);
        if result.bail_auto != Some(BailFlag::NotEligible) {
            totals.total_bail_cost = totals.total_bail_cost.saturating_add(result.bail_cost);
        }
    }

    let sentence_cap = days_to_minutes(limits.max_sentence_days);
    let (min_time_capped, _) = cap(totals.modified.min_time, sentence_cap);
    let (max_time_capped, is_capped) = cap(totals.modified.max_time, sentence_cap);
    let (impound_capped, is_impound_capped) =
        cap(totals.impound, days_to_minutes(limits.max_impound_days));
    let (suspension_capped, is_suspension_capped) =
        cap(totals.suspension, days_to_minutes(limits.max_suspension_days));

    ReportSummary {
        bail_status: bail_status(results),
        totals,
        min_time_capped,
        max_time_capped,
        is_capped,
        impound_capped,
        is_impound_capped,
        suspension_capped,
        is_suspension_capped,
    }
}

/// Clamp `total` to `ceiling`, reporting whether it strictly exceeded it.
fn cap(total: Decimal, ceiling: Decimal) -> (Decimal, bool) {
    (total.min(ceiling), total > ceiling)
}

/// First matching rule wins: any non-bailable charge makes the whole report
/// non-bailable, then discretionary, then eligible.
pub fn bail_status(results: &[ChargeResult]) -> BailStatus {
    let flags: Vec<BailFlag> = results
        .iter()
        .filter(|r| r.is_resolved())
        .filter_map(|r| r.bail_auto)
        .collect();

    if flags.contains(&BailFlag::NotEligible) {
        BailStatus::NotEligible
    } else if flags.contains(&BailFlag::Discretionary) {
        BailStatus::Discretionary
    } else if flags.contains(&BailFlag::Eligible) {
        BailStatus::Eligible
    } else {
        BailStatus::NotApplicable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::outcome::SentenceFigures;
    use crate::model::SelectedCharge;
    use rust_decimal_macros::dec;

    fn resolved(minutes: Decimal, bail: Option<BailFlag>, cost: Decimal) -> ChargeResult {
        let code = crate::codes::builtin::load_preset("sample").unwrap();
        let mut result = ChargeResult::unresolved(SelectedCharge::new("101"));
        result.charge_details = code.get("101").cloned();
        let figures = SentenceFigures {
            min_time: minutes,
            max_time: minutes * dec!(2),
            points: dec!(1),
        };
        result.original = figures;
        result.modified = figures;
        result.fine = dec!(100);
        result.bail_auto = bail;
        result.bail_cost = cost;
        result
    }

    #[test]
    fn test_sums_and_bail_cost_exclusion() {
        let results = vec![
            resolved(dec!(60), Some(BailFlag::Eligible), dec!(1000)),
            resolved(dec!(30), Some(BailFlag::NotEligible), dec!(5000)),
            resolved(dec!(10), None, dec!(50)),
        ];
        let summary = aggregate(&results, &Limits::default());
        assert_eq!(summary.totals.modified.min_time, dec!(100));
        assert_eq!(summary.totals.modified.max_time, dec!(200));
        assert_eq!(summary.totals.modified.points, dec!(3));
        assert_eq!(summary.totals.fine, dec!(300));
        assert_eq!(summary.totals.total_bail_cost, dec!(1050));
        assert_eq!(summary.bail_status, BailStatus::NotEligible);
        assert!(!summary.is_capped);
    }

    #[test]
    fn test_unresolved_rows_ignored() {
        let mut ghost = ChargeResult::unresolved(SelectedCharge::default());
        ghost.fine = dec!(999);
        ghost.bail_auto = Some(BailFlag::NotEligible);
        let results = vec![resolved(dec!(60), Some(BailFlag::Eligible), dec!(10)), ghost];
        let summary = aggregate(&results, &Limits::default());
        assert_eq!(summary.totals.fine, dec!(100));
        assert_eq!(summary.bail_status, BailStatus::Eligible);
    }

    #[test]
    fn test_cap_is_strict() {
        let limits = Limits {
            max_sentence_days: dec!(0.05),
            ..Limits::default()
        };
        // max total 72 == cap: not capped.
        let at_cap = aggregate(&[resolved(dec!(36), None, dec!(0))], &limits);
        assert!(!at_cap.is_capped);
        assert_eq!(at_cap.max_time_capped, dec!(72));

        let over = aggregate(&[resolved(dec!(60), None, dec!(0))], &limits);
        assert!(over.is_capped);
        assert_eq!(over.max_time_capped, dec!(72));
        assert_eq!(over.min_time_capped, dec!(60));
    }

    #[test]
    fn test_impound_and_suspension_capped_independently() {
        let mut a = resolved(dec!(0), None, dec!(0));
        a.impound = days_to_minutes(dec!(20));
        a.suspension = days_to_minutes(dec!(10));
        let mut b = a.clone();
        b.impound = days_to_minutes(dec!(15));

        let summary = aggregate(&[a, b], &Limits::default());
        assert!(summary.is_impound_capped);
        assert_eq!(summary.impound_capped, days_to_minutes(dec!(30)));
        assert_eq!(summary.totals.impound, days_to_minutes(dec!(35)));
        assert!(!summary.is_suspension_capped);
        assert_eq!(summary.suspension_capped, days_to_minutes(dec!(20)));
    }

    #[test]
    fn test_unbounded_limits_and_huge_amounts_saturate() {
        let limits = Limits {
            max_sentence_days: Decimal::MAX,
            max_impound_days: Decimal::MAX,
            max_suspension_days: Decimal::MAX,
        };
        let huge = dec!(50000000000000000000000000000);
        let mut a = resolved(dec!(60), Some(BailFlag::Eligible), huge);
        a.fine = huge;
        let b = a.clone();

        let summary = aggregate(&[a, b], &limits);
        assert_eq!(summary.totals.fine, Decimal::MAX);
        assert_eq!(summary.totals.total_bail_cost, Decimal::MAX);
        assert_eq!(summary.max_time_capped, dec!(240));
        assert!(!summary.is_capped);
    }

    #[test]
    fn test_bail_status_precedence() {
        let eligible = resolved(dec!(1), Some(BailFlag::Eligible), dec!(0));
        let discretionary = resolved(dec!(1), Some(BailFlag::Discretionary), dec!(0));
        let none = resolved(dec!(1), None, dec!(0));

        assert_eq!(bail_status(&[]), BailStatus::NotApplicable);
        assert_eq!(bail_status(&[none.clone()]), BailStatus::NotApplicable);
        assert_eq!(
            bail_status(&[eligible.clone(), none]),
            BailStatus::Eligible
        );
        assert_eq!(
            bail_status(&[eligible, discretionary]),
            BailStatus::Discretionary
        );
    }
}
