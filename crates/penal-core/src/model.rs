use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 1440;

/// Convert a (possibly fractional) number of days into minutes.
/// Saturates at `Decimal::MAX`, so an unbounded limit stays unbounded.
pub fn days_to_minutes(days: Decimal) -> Decimal {
    days.saturating_mul(Decimal::from(MINUTES_PER_DAY))
}

/// Sentencing class of a charge. Drives the points lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChargeClass {
    A,
    B,
    C,
}

impl fmt::Display for ChargeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeClass::A => write!(f, "A"),
            ChargeClass::B => write!(f, "B"),
            ChargeClass::C => write!(f, "C"),
        }
    }
}

impl ChargeClass {
    pub fn from_str_loose(s: &str) -> Option<ChargeClass> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(ChargeClass::A),
            "B" => Some(ChargeClass::B),
            "C" => Some(ChargeClass::C),
            _ => None,
        }
    }
}

/// Ordinal count (1st..5th) of a repeated offense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct OffenseCount(u8);

impl TryFrom<u8> for OffenseCount {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        OffenseCount::new(n).ok_or_else(|| {
            format!("offense count {n} out of range 1..={}", OffenseCount::MAX)
        })
    }
}

impl OffenseCount {
    pub const FIRST: OffenseCount = OffenseCount(1);
    pub const MAX: u8 = 5;

    pub fn new(n: u8) -> Option<OffenseCount> {
        (1..=Self::MAX).contains(&n).then_some(OffenseCount(n))
    }

    pub fn from_str_loose(s: &str) -> Option<OffenseCount> {
        s.trim().parse::<u8>().ok().and_then(OffenseCount::new)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_first(self) -> bool {
        self.0 == 1
    }
}

impl fmt::Display for OffenseCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key used for time and fine lookups, resolved once per charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Offense(OffenseCount),
    Category(String),
}

impl LookupKey {
    /// The key as it appears in keyed legal-code maps.
    pub fn as_table_key(&self) -> String {
        match self {
            LookupKey::Offense(n) => n.to_string(),
            LookupKey::Category(c) => c.clone(),
        }
    }
}

/// One charge row on an arrest report, as built by the report form.
///
/// Selections are kept as the raw strings the form produced; they are
/// interpreted (and degraded when illegal) during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCharge {
    #[serde(default, deserialize_with = "loose_id")]
    pub unique_id: Option<String>,
    #[serde(default, deserialize_with = "loose_id")]
    pub charge_id: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "loose_id")]
    pub offense: Option<String>,
    #[serde(default)]
    pub addition: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl SelectedCharge {
    pub fn new(charge_id: impl Into<String>) -> Self {
        Self {
            charge_id: Some(charge_id.into()),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn with_offense(mut self, offense: &str) -> Self {
        self.offense = Some(offense.to_string());
        self
    }

    pub fn with_addition(mut self, addition: &str) -> Self {
        self.addition = Some(addition.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Selected class, if set and recognizable.
    pub fn class(&self) -> Option<ChargeClass> {
        self.class.as_deref().and_then(ChargeClass::from_str_loose)
    }

    /// Selected offense count. Unset defaults to the first offense;
    /// an unparseable value yields `None`.
    pub fn offense(&self) -> Option<OffenseCount> {
        match non_blank(self.offense.as_deref()) {
            None => Some(OffenseCount::FIRST),
            Some(raw) => OffenseCount::from_str_loose(raw),
        }
    }

    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    pub fn addition(&self) -> Option<&str> {
        non_blank(self.addition.as_deref())
    }

    pub fn charge_id(&self) -> Option<&str> {
        non_blank(self.charge_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts identifiers written either as JSON strings or numbers.
fn loose_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

/// A duration as written in the legal code and shown on reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeSpan {
    pub days: u32,
    pub hours: u32,
    pub min: u32,
}

impl TimeSpan {
    pub fn to_minutes(&self) -> Decimal {
        Decimal::from(self.days) * Decimal::from(MINUTES_PER_DAY)
            + Decimal::from(self.hours) * Decimal::from(MINUTES_PER_HOUR)
            + Decimal::from(self.min)
    }

    /// Split minutes into days/hours/minutes after rounding to a whole minute.
    /// Negative input is treated as zero.
    pub fn from_minutes(minutes: Decimal) -> TimeSpan {
        let whole = minutes
            .max(Decimal::ZERO)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let total = whole.to_u64().unwrap_or(u64::MAX);
        let per_day = u64::from(MINUTES_PER_DAY);
        let per_hour = u64::from(MINUTES_PER_HOUR);
        TimeSpan {
            days: u32::try_from(total / per_day).unwrap_or(u32::MAX),
            hours: ((total % per_day) / per_hour) as u32,
            min: (total % per_hour) as u32,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.min == 0
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0m");
        }
        let mut parts = Vec::new();
        if self.days > 0 {
            parts.push(format!("{}d", self.days));
        }
        if self.hours > 0 {
            parts.push(format!("{}h", self.hours));
        }
        if self.min > 0 {
            parts.push(format!("{}m", self.min));
        }
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_time_span_minutes() {
        let span = TimeSpan {
            days: 1,
            hours: 2,
            min: 3,
        };
        assert_eq!(span.to_minutes(), dec!(1563));
        assert_eq!(TimeSpan::from_minutes(dec!(1563)), span);
    }

    #[test]
    fn test_time_span_rounds_half_away_from_zero() {
        assert_eq!(TimeSpan::from_minutes(dec!(90.5)).min, 31);
        assert_eq!(TimeSpan::from_minutes(dec!(90.4)).min, 30);
        assert!(TimeSpan::from_minutes(dec!(-5)).is_zero());
    }

    #[test]
    fn test_time_span_display() {
        assert_eq!(TimeSpan::from_minutes(dec!(1500)).to_string(), "1d 1h");
        assert_eq!(TimeSpan::default().to_string(), "0m");
    }

    #[test]
    fn test_offense_defaults_to_first_when_unset() {
        let row = SelectedCharge::new("101");
        assert_eq!(row.offense(), Some(OffenseCount::FIRST));

        let row = SelectedCharge::new("101").with_offense("7");
        assert_eq!(row.offense(), None);

        let row = SelectedCharge::new("101").with_offense(" 3 ");
        assert_eq!(row.offense().map(OffenseCount::get), Some(3));
    }

    #[test]
    fn test_class_from_str_loose() {
        assert_eq!(ChargeClass::from_str_loose("b"), Some(ChargeClass::B));
        assert_eq!(ChargeClass::from_str_loose("D"), None);
    }

    #[test]
    fn test_selected_charge_accepts_numeric_ids() {
        let json = r#"{ "uniqueId": 7, "chargeId": 101, "class": "A", "offense": 2 }"#;
        let row: SelectedCharge = serde_json::from_str(json).unwrap();
        assert_eq!(row.charge_id(), Some("101"));
        assert_eq!(row.unique_id.as_deref(), Some("7"));
        assert_eq!(row.offense().map(OffenseCount::get), Some(2));
    }

    #[test]
    fn test_selected_charge_null_charge_id() {
        let json = r#"{ "uniqueId": "r1", "chargeId": null }"#;
        let row: SelectedCharge = serde_json::from_str(json).unwrap();
        assert_eq!(row.charge_id(), None);
    }
}
