use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::ValidationError;
use super::interval::DateInterval;
use super::month::months_touched;
use super::timesheet::LineTotals;

/// Month-starts the employee may still open a report for: every month one of
/// their contracts touches, minus the months already reported, ascending.
pub fn open_months(
    contracts: &[DateInterval],
    reported: &[NaiveDate],
    today: NaiveDate,
) -> Vec<NaiveDate> {
    let mut months = BTreeSet::new();
    for span in contracts {
        months.extend(months_touched(span, today));
    }
    months
        .into_iter()
        .filter(|month| !reported.contains(month))
        .collect()
}

pub fn ensure_month_open(month: NaiveDate, open: &[NaiveDate]) -> Result<(), ValidationError> {
    if open.contains(&month) {
        Ok(())
    } else {
        Err(ValidationError::MonthNotOpen { month })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTotals {
    pub total_hours: i32,
    pub net: BigDecimal,
    pub gross: BigDecimal,
    pub currency: String,
}

/// Report-level sums over the line totals. Lines that carry hours must agree
/// on one currency; a report with no worked hours falls back to the
/// configured default.
pub fn report_totals(
    lines: &[LineTotals],
    default_currency: &str,
) -> Result<ReportTotals, ValidationError> {
    let mut total_hours: i32 = 0;
    let mut net = BigDecimal::from(0);
    let mut gross = BigDecimal::from(0);
    let mut currency: Option<&str> = None;

    for line in lines {
        total_hours += line.total_hours;
        net += &line.net;
        gross += &line.gross;

        if line.total_hours > 0 {
            match currency {
                None => currency = Some(&line.currency),
                Some(seen) if seen != line.currency => {
                    return Err(ValidationError::MixedCurrencies {
                        first: seen.to_string(),
                        second: line.currency.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    Ok(ReportTotals {
        total_hours,
        net: net.with_scale(2),
        gross: gross.with_scale(2),
        currency: currency.unwrap_or(default_currency).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn line(hours: i32, net: &str, gross: &str, currency: &str) -> LineTotals {
        LineTotals {
            total_hours: hours,
            net: dec(net),
            gross: dec(gross),
            currency: currency.to_string(),
        }
    }

    #[test]
    fn contract_months_minus_reported_months() {
        // Contract runs 2024-01-15 through 2024-03-10, February is already
        // reported: January and March remain open.
        let contracts = vec![
            DateInterval::new(day(2024, 1, 15), Some(day(2024, 3, 10))).unwrap(),
        ];
        let reported = vec![day(2024, 2, 1)];

        assert_eq!(
            open_months(&contracts, &reported, day(2024, 2, 20)),
            vec![day(2024, 1, 1), day(2024, 3, 1)]
        );
    }

    #[test]
    fn overlapping_contract_months_are_deduplicated_and_sorted() {
        let contracts = vec![
            DateInterval::new(day(2024, 3, 1), Some(day(2024, 4, 30))).unwrap(),
            DateInterval::new(day(2024, 1, 1), Some(day(2024, 3, 31))).unwrap(),
        ];

        assert_eq!(
            open_months(&contracts, &[], day(2024, 6, 1)),
            vec![
                day(2024, 1, 1),
                day(2024, 2, 1),
                day(2024, 3, 1),
                day(2024, 4, 1)
            ]
        );
    }

    #[test]
    fn no_contracts_means_no_open_months() {
        assert_eq!(
            open_months(&[], &[day(2024, 1, 1)], day(2024, 6, 1)),
            Vec::<NaiveDate>::new()
        );
    }

    #[test]
    fn month_outside_the_open_set_is_refused() {
        let open = vec![day(2024, 1, 1), day(2024, 3, 1)];
        assert!(ensure_month_open(day(2024, 3, 1), &open).is_ok());
        assert_eq!(
            ensure_month_open(day(2024, 2, 1), &open),
            Err(ValidationError::MonthNotOpen {
                month: day(2024, 2, 1)
            })
        );
    }

    #[test]
    fn report_totals_sum_the_lines() {
        let lines = vec![
            line(12, "1200.00", "1476.00", "PLN"),
            line(8, "480.00", "590.40", "PLN"),
        ];
        let totals = report_totals(&lines, "PLN").unwrap();

        assert_eq!(totals.total_hours, 20);
        assert_eq!(totals.net, dec("1680.00"));
        assert_eq!(totals.gross, dec("2066.40"));
        assert_eq!(totals.currency, "PLN");
    }

    #[test]
    fn empty_report_totals_use_the_default_currency() {
        let totals = report_totals(&[], "PLN").unwrap();
        assert_eq!(totals.total_hours, 0);
        assert_eq!(totals.net, dec("0.00"));
        assert_eq!(totals.currency, "PLN");
    }

    #[test]
    fn zero_hour_lines_do_not_constrain_the_currency() {
        let lines = vec![
            line(0, "0.00", "0.00", "EUR"),
            line(8, "800.00", "984.00", "PLN"),
        ];
        let totals = report_totals(&lines, "USD").unwrap();
        assert_eq!(totals.currency, "PLN");
    }

    #[test]
    fn mixed_currencies_across_lines_are_refused() {
        let lines = vec![
            line(8, "800.00", "984.00", "PLN"),
            line(4, "120.00", "147.60", "EUR"),
        ];
        assert_eq!(
            report_totals(&lines, "PLN").unwrap_err(),
            ValidationError::MixedCurrencies {
                first: "PLN".to_string(),
                second: "EUR".to_string(),
            }
        );
    }
}
