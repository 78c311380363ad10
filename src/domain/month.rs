use chrono::{Datelike, NaiveDate, Weekday};

use super::ValidationError;
use super::interval::DateInterval;

pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

pub fn ensure_month_start(date: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if date.day() != 1 {
        return Err(ValidationError::NotMonthStart { date });
    }
    Ok(date)
}

pub fn next_month(month: NaiveDate) -> NaiveDate {
    let first = month_start(month);
    let candidate = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    candidate.unwrap_or(first)
}

pub fn days_in_month(month: NaiveDate) -> u32 {
    let first = month_start(month);
    next_month(first).signed_duration_since(first).num_days() as u32
}

/// The month as a bounded interval, first day through last day.
pub fn month_span(month: NaiveDate) -> DateInterval {
    let first = month_start(month);
    DateInterval {
        start: first,
        end: next_month(first).pred_opt(),
    }
}

/// Day numbers falling on Saturday or Sunday, for rendering the entry grid.
pub fn weekend_days(month: NaiveDate) -> Vec<u32> {
    let first = month_start(month);
    (1..=days_in_month(first))
        .filter(|d| {
            NaiveDate::from_ymd_opt(first.year(), first.month(), *d)
                .map(|date| matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
                .unwrap_or(false)
        })
        .collect()
}

/// Every month-start the span touches. A bounded span contributes its whole
/// run even when it lies in the future; an open span stops at the month
/// containing `today`.
pub fn months_touched(span: &DateInterval, today: NaiveDate) -> Vec<NaiveDate> {
    let last = match span.end {
        Some(end) => month_start(end),
        None => month_start(today),
    };

    let mut months = Vec::new();
    let mut cursor = month_start(span.start);
    while cursor <= last {
        months.push(cursor);
        cursor = next_month(cursor);
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_lengths_follow_the_calendar() {
        assert_eq!(days_in_month(day(2024, 2, 1)), 29);
        assert_eq!(days_in_month(day(2023, 2, 1)), 28);
        assert_eq!(days_in_month(day(2024, 12, 15)), 31);
        assert_eq!(days_in_month(day(2024, 4, 30)), 30);
    }

    #[test]
    fn next_month_rolls_over_the_year() {
        assert_eq!(next_month(day(2024, 12, 1)), day(2025, 1, 1));
        assert_eq!(next_month(day(2024, 5, 20)), day(2024, 6, 1));
    }

    #[test]
    fn month_span_is_first_through_last_day() {
        let span = month_span(day(2024, 2, 10));
        assert_eq!(span.start, day(2024, 2, 1));
        assert_eq!(span.end, Some(day(2024, 2, 29)));
    }

    #[test]
    fn weekends_of_january_2024() {
        assert_eq!(
            weekend_days(day(2024, 1, 1)),
            vec![6, 7, 13, 14, 20, 21, 27, 28]
        );
    }

    #[test]
    fn first_of_month_passes_the_month_start_check() {
        assert_eq!(ensure_month_start(day(2024, 3, 1)), Ok(day(2024, 3, 1)));
        assert_eq!(
            ensure_month_start(day(2024, 3, 2)),
            Err(ValidationError::NotMonthStart {
                date: day(2024, 3, 2)
            })
        );
    }

    #[test]
    fn bounded_span_contributes_every_month_it_touches() {
        let span = DateInterval {
            start: day(2024, 1, 15),
            end: Some(day(2024, 3, 10)),
        };
        assert_eq!(
            months_touched(&span, day(2024, 2, 1)),
            vec![day(2024, 1, 1), day(2024, 2, 1), day(2024, 3, 1)]
        );
    }

    #[test]
    fn open_span_stops_at_the_current_month() {
        let span = DateInterval {
            start: day(2024, 11, 20),
            end: None,
        };
        assert_eq!(
            months_touched(&span, day(2025, 1, 15)),
            vec![day(2024, 11, 1), day(2024, 12, 1), day(2025, 1, 1)]
        );
    }

    #[test]
    fn open_span_starting_in_the_future_contributes_nothing() {
        let span = DateInterval {
            start: day(2030, 1, 1),
            end: None,
        };
        assert_eq!(months_touched(&span, day(2024, 6, 1)), Vec::<NaiveDate>::new());
    }
}
