pub mod interval;
pub mod month;
pub mod money;
pub mod rates;
pub mod reporting;
pub mod status;
pub mod timesheet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::database::models::ReportStatus;

/// Input that can never be persisted, no matter the current state of the data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Start date {start} is after end date {end}")]
    InvalidInterval { start: NaiveDate, end: NaiveDate },

    #[error("Sign date {sign_date} is in the future")]
    SignDateInFuture { sign_date: NaiveDate },

    #[error("Dates overlap the existing contract \"{name}\"")]
    ContractOverlap { name: String },

    #[error("Dates overlap the rate effective from {start}")]
    RateOverlap { start: NaiveDate },

    #[error("More than one rate covers {day}")]
    AmbiguousRate { day: NaiveDate },

    #[error("Missing rate for day {day}")]
    MissingRate { day: NaiveDate },

    #[error("Hours for day {day} must be between 0 and 24, got {hours}")]
    HoursOutOfRange { day: u32, hours: i16 },

    #[error("Day {day} does not exist in the report month")]
    DayOutsideMonth { day: u32 },

    #[error("More than 24 hours recorded on {}", join_days(.days))]
    DayTotalExceeded { days: Vec<NaiveDate> },

    #[error("Mixed currencies are not supported: {first} and {second}")]
    MixedCurrencies { first: String, second: String },

    #[error("A project appears more than once in the report")]
    DuplicateProject,

    #[error("Project \"{name}\" is not available for this report")]
    ProjectNotAvailable { name: String },

    #[error("Date {date} is not the first day of a month")]
    NotMonthStart { date: NaiveDate },

    #[error("Month {month} is not open for reporting")]
    MonthNotOpen { month: NaiveDate },
}

/// Operation that is valid in general but not in the data's current state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("Time report cannot be edited while {status}")]
    ReportNotEditable { status: ReportStatus },

    #[error("Project line cannot be changed while {status}")]
    LineLocked { status: ReportStatus },

    #[error("Only submitted lines can be approved or rejected, this one is {status}")]
    NotAwaitingDecision { status: ReportStatus },

    #[error("Employee is deactivated")]
    EmployeeInactive,
}

fn join_days(days: &[NaiveDate]) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
