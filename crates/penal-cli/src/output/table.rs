use penal_core::evaluate::outcome::{ArrestCalculation, ChargeResult};
use penal_core::model::TimeSpan;
use penal_core::CalculationOptions;
use rust_decimal::Decimal;

pub fn print(calculation: &ArrestCalculation, options: &CalculationOptions, verbose: bool) {
    println!("=== Charges ===\n");

    if calculation.calculation_results.is_empty() {
        println!("  (no charges)\n");
    }

    for (i, result) in calculation.calculation_results.iter().enumerate() {
        print_charge(i + 1, result, verbose);
    }

    if !calculation.extras.is_empty() {
        println!("=== Stipulations ===\n");
        for extra in &calculation.extras {
            println!("  {}", extra.title);
            println!("    {}", extra.extra);
        }
        println!();
    }

    let totals = &calculation.totals;
    println!("=== Totals ===\n");
    println!(
        "  Time:        {} - {}{}",
        span(calculation.min_time_capped),
        span(calculation.max_time_capped),
        capped_note(calculation.is_capped, options.limits.max_sentence_days)
    );
    if calculation.is_capped || verbose {
        println!(
            "  Uncapped:    {} - {}",
            span(totals.modified.min_time),
            span(totals.modified.max_time)
        );
    }
    println!("  Points:      {}", totals.modified.points.normalize());
    println!("  Fine:        ${}", totals.fine.normalize());
    if !totals.impound.is_zero() {
        println!(
            "  Impound:     {}{}",
            span(calculation.impound_capped),
            capped_note(calculation.is_impound_capped, options.limits.max_impound_days)
        );
    }
    if !totals.suspension.is_zero() {
        println!(
            "  Suspension:  {}{}",
            span(calculation.suspension_capped),
            capped_note(
                calculation.is_suspension_capped,
                options.limits.max_suspension_days
            )
        );
    }
    println!("  Bail:        {}", calculation.bail_status);
    println!("  Bail cost:   ${}", totals.total_bail_cost.normalize());
    if calculation.is_streets_eligible {
        println!("  Streets:     eligible");
    }
    println!();
}

fn print_charge(index: usize, result: &ChargeResult, verbose: bool) {
    let Some(details) = result.charge_details.as_ref() else {
        let id = result.row.charge_id().unwrap_or("(none)");
        println!("  {}. {} -> not found in legal code\n", index, id);
        return;
    };

    let class = result
        .row
        .class()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!(
        "  {}. {}{} {}. {}",
        index,
        details.charge_type.code(),
        class,
        details.id,
        details.name
    );

    let display = &result.display;
    println!(
        "     Time: {} - {}   Points: {}   Fine: ${}",
        display.modified_min_time,
        display.modified_max_time,
        result.modified.points.normalize(),
        result.fine.normalize()
    );

    if verbose {
        let key = match (&result.category, result.offense) {
            (Some(category), _) => format!("category {category}"),
            (None, Some(offense)) => format!("offense #{offense}"),
            (None, None) => "illegal offense".to_string(),
        };
        println!("     Lookup: {}", key);
        if result.is_modified {
            println!(
                "     Before additions: {} - {}   Points: {}",
                display.original_min_time,
                display.original_max_time,
                result.original.points.normalize()
            );
        }
        let additions: Vec<String> = result
            .applied_additions
            .iter()
            .map(|a| {
                format!(
                    "{} (x{} time, x{} points)",
                    a.name,
                    a.sentence_multiplier.normalize(),
                    a.points_multiplier.normalize()
                )
            })
            .collect();
        if !additions.is_empty() {
            println!("     Additions: {}", additions.join(", "));
        }
        if !display.impound.is_zero() || !display.suspension.is_zero() {
            println!(
                "     Impound: {}   Suspension: {}",
                display.impound, display.suspension
            );
        }
        let bail = match result.bail_auto {
            Some(flag) => format!("{flag:?}"),
            None => "N/A".to_string(),
        };
        println!("     Bail: {} (${})", bail, result.bail_cost.normalize());
    }
    println!();
}

fn span(minutes: Decimal) -> TimeSpan {
    TimeSpan::from_minutes(minutes)
}

fn capped_note(capped: bool, limit_days: Decimal) -> String {
    if capped {
        format!("  (capped at {} days)", limit_days.normalize())
    } else {
        String::new()
    }
}
