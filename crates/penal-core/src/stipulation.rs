use crate::evaluate::outcome::{ChargeResult, Stipulation};
use crate::model::OffenseCount;

/// Collect stipulation notes for resolved charges, in report order.
///
/// Identical notes on different rows are all kept.
pub fn extract(results: &[ChargeResult]) -> Vec<Stipulation> {
    results
        .iter()
        .filter_map(|result| {
            let details = result.charge_details.as_ref()?;
            let extra = details.stipulation()?;
            Some(Stipulation {
                title: title(result),
                extra: extra.to_string(),
            })
        })
        .collect()
}

/// Display title: `"{type}{class} {id}. {name}"` plus a category or
/// repeat-offense suffix.
fn title(result: &ChargeResult) -> String {
    let Some(details) = result.charge_details.as_ref() else {
        return String::new();
    };

    let class = result
        .row
        .class()
        .map(|c| c.to_string())
        .unwrap_or_default();
    let mut title = format!(
        "{}{} {}. {}",
        details.charge_type.code(),
        class,
        details.id,
        details.name
    );

    if let Some(category) = &result.category {
        title.push_str(&format!(" (Category {category})"));
    } else if let Some(offense) = repeat_offense(result) {
        title.push_str(&format!(" (Offence #{offense})"));
    }

    title
}

/// The row's offense text when it is anything but a first offense, whether
/// or not the charge allows that count.
fn repeat_offense(result: &ChargeResult) -> Option<&str> {
    let raw = result
        .row
        .offense
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())?;
    match OffenseCount::from_str_loose(raw) {
        Some(n) if n.is_first() => None,
        Some(_) | None => Some(raw),
    }
}
