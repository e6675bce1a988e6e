use penal_core::codes::schema::{BailFlag, ByKey, ChargeDefinition};
use penal_core::codes::{builtin, lint_legal_code};
use penal_core::error::PenalError;
use std::fmt::Display;
use std::path::Path;

pub fn list() -> Result<(), PenalError> {
    println!("Available legal codes:\n");
    for name in builtin::PRESETS {
        let table = builtin::load_preset(name)?;
        println!(
            "  {:<8} {} (v{}) [{} charges]",
            name,
            table.name(),
            table.version(),
            table.len()
        );
        if let Some(desc) = table.description() {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(id: &str, codes: Option<&Path>, preset: Option<&str>) -> Result<(), PenalError> {
    let table = super::load_table(codes, preset)?;
    let charge = table.get(id).ok_or_else(|| {
        PenalError::CodeInvalid(format!("charge '{}' not found in '{}'", id.trim(), table.name()))
    })?;

    println!("{}. {} ({})\n", charge.id, charge.name, charge.charge_type);
    print_legality(charge);
    println!();

    println!("  Minimum time:  {}", describe(&charge.min_time));
    println!("  Maximum time:  {}", describe(&charge.max_time));

    let points: Vec<String> = charge
        .points
        .iter()
        .map(|(class, points)| format!("{class}: {}", points.normalize()))
        .collect();
    println!("  Points:        {}", or_dash(points.join(", ")));
    println!("  Fine:          {}", describe_amount(charge.fine.as_ref(), "$"));
    if charge.impound.is_some() {
        println!(
            "  Impound:       {}",
            describe_amount(charge.impound.as_ref(), "days ")
        );
    }
    if charge.suspension.is_some() {
        println!(
            "  Suspension:    {}",
            describe_amount(charge.suspension.as_ref(), "days ")
        );
    }

    let bail = match &charge.bail.auto {
        None => "-".to_string(),
        Some(ByKey::Flat(flag)) => bail_label(*flag).to_string(),
        Some(ByKey::Keyed(map)) => map
            .iter()
            .map(|(key, flag)| format!("{key}: {}", bail_label(*flag)))
            .collect::<Vec<_>>()
            .join(", "),
    };
    println!("  Bail:          {}", bail);
    println!(
        "  Bail cost:     {}",
        describe_amount(charge.bail.cost.as_ref(), "$")
    );

    if charge.has_drug_categories() {
        println!("\n  Drug categories: {}", charge.drugs.join(", "));
        println!("  Time and fine are looked up by category when one is selected.");
    }

    if let Some(note) = charge.stipulation() {
        println!("\n  Stipulation: {}", note);
    }
    println!();

    Ok(())
}

fn print_legality(charge: &ChargeDefinition) {
    let classes: Vec<String> = charge.legal_classes().iter().map(|c| c.to_string()).collect();
    let offenses: Vec<String> = charge
        .legal_offenses()
        .iter()
        .map(|n| n.to_string())
        .collect();
    println!("  Legal classes:  {}", or_dash(classes.join(", ")));
    println!("  Legal offenses: {}", or_dash(offenses.join(", ")));
}

fn describe<T: Display>(spec: &ByKey<T>) -> String {
    match spec {
        ByKey::Flat(value) => value.to_string(),
        ByKey::Keyed(map) => map
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn describe_amount(spec: Option<&ByKey<rust_decimal::Decimal>>, prefix: &str) -> String {
    match spec {
        None => "-".to_string(),
        Some(ByKey::Flat(value)) => format!("{prefix}{}", value.normalize()),
        Some(ByKey::Keyed(map)) => map
            .iter()
            .map(|(key, value)| format!("{key}: {prefix}{}", value.normalize()))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn bail_label(flag: BailFlag) -> &'static str {
    match flag {
        BailFlag::Eligible => "eligible",
        BailFlag::NotEligible => "not eligible",
        BailFlag::Discretionary => "discretionary",
    }
}

fn or_dash(s: String) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s
    }
}

pub fn validate(file: &Path) -> Result<(), PenalError> {
    let table = penal_core::codes::load_legal_code(file)?;

    println!(
        "Legal code '{}' (v{}) is valid.",
        table.name(),
        table.version()
    );
    println!("  Charges: {}", table.len());

    let warnings = lint_legal_code(&table);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

pub fn schema() -> Result<(), PenalError> {
    print!(
        r#"Legal Code Schema
=================

A legal code file lists every chargeable offense with its sentencing
tables. `penal calculate` looks up each charge row of a report here.

Top-level fields:
  name          (string, required)  Human-readable name of the legal code
  description   (string, optional)  What this legal code covers
  version       (string, required)  Version identifier (e.g., "2024.1")
  charges       (array, required)   Charge definitions (see below)

Each charge in the "charges" array:
  id            (string|number, required)  Unique charge id
  name          (string, required)  Charge title
  type          (string, required)  "F" felony, "M" misdemeanor, "I" infraction
  class         (object, required)  Class ("A", "B", "C") -> legal? (bool).
                                    A class missing from the map is illegal.
  offense       (object, required)  Offense count ("1".."5") -> legal? (bool)
  minTime       (duration|object, required)
  maxTime       (duration|object, required)
                                    Either one duration
                                      {{ "days": 0, "hours": 1, "min": 0 }}
                                    or a map keyed by offense count or drug
                                    category. maxTime below minTime is raised
                                    to minTime.
  points        (object, optional)  Class -> points (number)
  fine          (number|object, optional)
                                    Flat amount or map keyed like minTime
  impound       (number|object, optional)  Days, keyed by offense count
  suspension    (number|object, optional)  Days, keyed by offense count
  bail          (object, optional)
    auto        (bool|2|object)     true eligible, false not eligible,
                                    2 discretionary. A map is keyed by drug
                                    category.
    cost        (number|object)     Bail amount, flat or per drug category
  drugs         (array, optional)   Ordered drug category labels. When a
                                    row selects one, time and fine are
                                    looked up by category instead of
                                    offense count.
  extra         (string, optional)  Stipulation shown on the report.
                                    "N/A" or blank means none.

Example:
{{
  "name": "My legal code",
  "version": "1.0",
  "charges": [
    {{
      "id": "101",
      "name": "Assault",
      "type": "M",
      "class": {{ "A": true, "B": true, "C": true }},
      "offense": {{ "1": true, "2": true, "3": true }},
      "minTime": {{ "days": 0, "hours": 1, "min": 0 }},
      "maxTime": {{ "days": 0, "hours": 2, "min": 0 }},
      "points": {{ "A": 5, "B": 3, "C": 1 }},
      "fine": {{ "1": 500, "2": 1000, "3": 1500 }},
      "bail": {{ "auto": true, "cost": 1000 }},
      "extra": "N/A"
    }}
  ]
}}

Numbers in a legal code may be written as JSON numbers or strings.
Calculation output (`penal calculate -o json`) writes every amount,
point total and minute total as a decimal string (e.g. "1500") so no
precision is lost; parse them before adding them up.

Run `penal codes validate <FILE>` to check a file before use.
"#
    );
    Ok(())
}
