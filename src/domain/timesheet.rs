use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use super::ValidationError;
use super::money::{Money, gross_of};
use super::month::{days_in_month, month_start};

/// One worked day inside a project line, with the rate frozen at the moment
/// of recording.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub day: NaiveDate,
    pub hours: i16,
    pub rate: Money,
}

/// Turns a day→hours grid row into priced entries. Days with no hours (null
/// or zero) are dropped; every remaining day must fit the month, fit the
/// 0..=24 range, have a covering rate, and agree on one currency.
pub fn day_entries(
    month: NaiveDate,
    hours_per_day: &BTreeMap<u32, Option<i16>>,
    rate_table: &BTreeMap<u32, Money>,
) -> Result<Vec<DayEntry>, ValidationError> {
    let first = month_start(month);
    let last_day = days_in_month(first);
    let mut entries: Vec<DayEntry> = Vec::new();

    for (&day, &hours) in hours_per_day {
        if day < 1 || day > last_day {
            return Err(ValidationError::DayOutsideMonth { day });
        }
        let hours = match hours {
            Some(h) => h,
            None => continue,
        };
        if !(0..=24).contains(&hours) {
            return Err(ValidationError::HoursOutOfRange { day, hours });
        }
        if hours == 0 {
            continue;
        }

        let date = match NaiveDate::from_ymd_opt(first.year(), first.month(), day) {
            Some(d) => d,
            None => return Err(ValidationError::DayOutsideMonth { day }),
        };
        let rate = rate_table
            .get(&day)
            .cloned()
            .ok_or(ValidationError::MissingRate { day: date })?;

        if let Some(previous) = entries.first() {
            if previous.rate.currency != rate.currency {
                return Err(ValidationError::MixedCurrencies {
                    first: previous.rate.currency.clone(),
                    second: rate.currency,
                });
            }
        }

        entries.push(DayEntry { day: date, hours, rate });
    }

    Ok(entries)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineTotals {
    pub total_hours: i32,
    pub net: BigDecimal,
    pub gross: BigDecimal,
    pub currency: String,
}

/// Sums a line: hours, net as Σ hours·rate, gross as net × the configured
/// multiplier. A line with no entries totals to zero in the fallback currency.
pub fn line_totals(
    entries: &[DayEntry],
    gross_multiplier: &BigDecimal,
    fallback_currency: &str,
) -> LineTotals {
    let mut total_hours: i32 = 0;
    let mut net = BigDecimal::from(0);

    for entry in entries {
        total_hours += entry.hours as i32;
        net += BigDecimal::from(entry.hours) * &entry.rate.amount;
    }

    let net = net.with_scale(2);
    let gross = gross_of(&net, gross_multiplier);
    let currency = entries
        .first()
        .map(|e| e.rate.currency.clone())
        .unwrap_or_else(|| fallback_currency.to_string());

    LineTotals {
        total_hours,
        net,
        gross,
        currency,
    }
}

/// A calendar day may hold at most 24 hours across every project of the
/// report. Checked over the whole grid after all lines are assembled.
pub fn validate_day_totals<'a, I>(entries: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a DayEntry>,
{
    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for entry in entries {
        *per_day.entry(entry.day).or_insert(0) += entry.hours as i64;
    }

    let days: Vec<NaiveDate> = per_day
        .into_iter()
        .filter(|(_, hours)| *hours > 24)
        .map(|(day, _)| day)
        .collect();

    if days.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::DayTotalExceeded { days })
    }
}
