use chrono::NaiveDate;
use uuid::Uuid;

use super::ValidationError;

/// Inclusive span of calendar days. A missing end means the span is still
/// running and reaches arbitrarily far into the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, ValidationError> {
        if let Some(end) = end {
            if start > end {
                return Err(ValidationError::InvalidInterval { start, end });
            }
        }
        Ok(DateInterval { start, end })
    }

    fn end_or_max(&self) -> NaiveDate {
        self.end.unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end_or_max()
    }

    /// True when the two spans share at least one day. Open ends are treated
    /// as unbounded, so two open spans always collide.
    pub fn overlaps(&self, other: &DateInterval) -> bool {
        self.start <= other.end_or_max() && other.start <= self.end_or_max()
    }
}

/// A stored row that occupies a date interval, used for conflict scans.
pub trait Spanned {
    fn span_id(&self) -> Uuid;
    fn span(&self) -> DateInterval;
}

/// First row whose interval collides with the candidate. `exclude_id` skips
/// the row currently being edited so an update does not conflict with itself.
pub fn find_conflict<'a, T: Spanned>(
    candidate: &DateInterval,
    existing: &'a [T],
    exclude_id: Option<Uuid>,
) -> Option<&'a T> {
    existing
        .iter()
        .filter(|row| Some(row.span_id()) != exclude_id)
        .find(|row| candidate.overlaps(&row.span()))
}

pub fn validate_sign_date(sign_date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if sign_date > today {
        return Err(ValidationError::SignDateInFuture { sign_date });
    }
    Ok(())
}
