use penal_core::error::PenalError;
use std::path::Path;

pub fn list(path: Option<&Path>, parole_addition: &str) -> Result<(), PenalError> {
    let catalog = super::load_catalog(path)?;

    println!("Additions ({}):\n", catalog.len());
    let width = catalog
        .additions
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(10);

    println!(
        "  {:<width$}  {:>8}  {:>8}",
        "Name",
        "Sentence",
        "Points",
        width = width
    );
    println!("  {}", "-".repeat(width + 20));

    for addition in &catalog.additions {
        let marker = if addition.name.trim().eq_ignore_ascii_case(parole_addition.trim()) {
            "  (applied automatically to parole violators)"
        } else if addition.is_identity() {
            "  (no change)"
        } else {
            ""
        };
        println!(
            "  {:<width$}  {:>8}  {:>8}{}",
            addition.name,
            format!("x{}", addition.sentence_multiplier.normalize()),
            format!("x{}", addition.points_multiplier.normalize()),
            marker,
            width = width
        );
    }

    let selectable: Vec<&str> = catalog
        .selectable(parole_addition)
        .map(|a| a.name.as_str())
        .collect();
    println!("\nSelectable per charge: {}", selectable.join(", "));

    Ok(())
}
