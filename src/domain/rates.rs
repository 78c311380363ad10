use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use super::ValidationError;
use super::interval::DateInterval;
use super::money::Money;
use super::month::{days_in_month, month_start};

/// Which price list applies: chargable projects bill the client rate,
/// everything else books the internal rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateKind {
    Chargable,
    Internal,
}

/// One billing period of an employee with both price lists attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSpan {
    pub interval: DateInterval,
    pub chargable: Money,
    pub internal: Money,
}

impl RateSpan {
    pub fn money(&self, kind: RateKind) -> &Money {
        match kind {
            RateKind::Chargable => &self.chargable,
            RateKind::Internal => &self.internal,
        }
    }
}

/// Per-day rate lookup for a report month, keyed by day of month. Days no
/// rate covers are simply absent from the table; a day covered by two rates
/// is an integrity violation and refused outright.
pub fn rate_table(
    spans: &[RateSpan],
    month: NaiveDate,
    kind: RateKind,
) -> Result<BTreeMap<u32, Money>, ValidationError> {
    let first = month_start(month);
    let mut table = BTreeMap::new();

    for d in 1..=days_in_month(first) {
        let date = match NaiveDate::from_ymd_opt(first.year(), first.month(), d) {
            Some(date) => date,
            None => continue,
        };
        let mut covering = spans.iter().filter(|s| s.interval.contains(date));
        if let Some(span) = covering.next() {
            if covering.next().is_some() {
                return Err(ValidationError::AmbiguousRate { day: date });
            }
            table.insert(d, span.money(kind).clone());
        }
    }

    Ok(table)
}
