use crate::codes::schema::{BailFlag, ByKey, ChargeDefinition};
use crate::model::{days_to_minutes, ChargeClass, LookupKey, OffenseCount};
use rust_decimal::Decimal;

/// Statutory lookups a charge evaluation needs.
///
/// Every lookup returns a neutral value (zero, `None`) when the key has no
/// entry, so callers never branch on the table's shape.
pub trait SentenceLookup {
    /// Minimum and maximum time in minutes, with max raised to min if inverted.
    fn time_range(&self, key: &LookupKey) -> (Decimal, Decimal);

    fn fine(&self, key: &LookupKey) -> Decimal;

    fn points(&self, class: ChargeClass) -> Decimal;

    /// Impound in minutes. Always keyed by offense count.
    fn impound(&self, offense: OffenseCount) -> Decimal;

    /// Suspension in minutes. Always keyed by offense count.
    fn suspension(&self, offense: OffenseCount) -> Decimal;

    /// Bail flag and cost; per-category terms are indexed by `category`.
    fn bail(&self, category: Option<&str>) -> (Option<BailFlag>, Decimal);
}

impl SentenceLookup for ChargeDefinition {
    fn time_range(&self, key: &LookupKey) -> (Decimal, Decimal) {
        let table_key = key.as_table_key();
        let min = self
            .min_time
            .resolve(&table_key)
            .map(|t| t.to_minutes())
            .unwrap_or(Decimal::ZERO);
        let max = self
            .max_time
            .resolve(&table_key)
            .map(|t| t.to_minutes())
            .unwrap_or(Decimal::ZERO);
        (min, max.max(min))
    }

    fn fine(&self, key: &LookupKey) -> Decimal {
        resolve_amount(self.fine.as_ref(), &key.as_table_key())
    }

    fn points(&self, class: ChargeClass) -> Decimal {
        if !self.allows_class(class) {
            return Decimal::ZERO;
        }
        self.points.get(&class).copied().unwrap_or(Decimal::ZERO)
    }

    fn impound(&self, offense: OffenseCount) -> Decimal {
        days_to_minutes(resolve_amount(
            self.impound.as_ref(),
            &offense.to_string(),
        ))
    }

    fn suspension(&self, offense: OffenseCount) -> Decimal {
        days_to_minutes(resolve_amount(
            self.suspension.as_ref(),
            &offense.to_string(),
        ))
    }

    fn bail(&self, category: Option<&str>) -> (Option<BailFlag>, Decimal) {
        let category = category.filter(|_| self.has_drug_categories());
        let auto = match &self.bail.auto {
            None => None,
            Some(ByKey::Flat(flag)) => Some(*flag),
            Some(ByKey::Keyed(map)) => category.and_then(|c| map.get(c)).copied(),
        };
        let cost = match &self.bail.cost {
            None => Decimal::ZERO,
            Some(ByKey::Flat(cost)) => *cost,
            Some(ByKey::Keyed(map)) => category
                .and_then(|c| map.get(c))
                .copied()
                .unwrap_or(Decimal::ZERO),
        };
        (auto, cost)
    }
}

fn resolve_amount(spec: Option<&ByKey<Decimal>>, key: &str) -> Decimal {
    spec.and_then(|s| s.resolve(key))
        .copied()
        .unwrap_or(Decimal::ZERO)
}
