use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use crate::domain::timesheet::DayEntry;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum ReportStatus {
        Draft => "draft",
        Submitted => "submitted",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// One employee's hours for one calendar month. `start_date` is always the
/// first of the month; totals mirror the sum of the project records.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimeReport {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_date: NaiveDate, // DATE, first of month
    pub status: ReportStatus,
    pub total_hours: i32,
    pub total_amount_net: BigDecimal,
    pub total_amount_gross: BigDecimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeReport {
    pub fn new(employee_id: Uuid, start_date: NaiveDate, currency: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employee_id,
            start_date,
            status: ReportStatus::Draft,
            total_hours: 0,
            total_amount_net: BigDecimal::from(0),
            total_amount_gross: BigDecimal::from(0),
            currency,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One project's line inside a report. Carries its own status so managers
/// can approve projects independently.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: Uuid,
    pub time_report_id: Uuid,
    pub project_id: Uuid,
    pub status: ReportStatus,
    pub comment: Option<String>,
    pub total_hours: i32,
    pub total_amount_net: BigDecimal,
    pub total_amount_gross: BigDecimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    pub fn new(time_report_id: Uuid, project_id: Uuid, currency: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            time_report_id,
            project_id,
            status: ReportStatus::Draft,
            comment: None,
            total_hours: 0,
            total_amount_net: BigDecimal::from(0),
            total_amount_gross: BigDecimal::from(0),
            currency,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Hours worked on one calendar day, with the rate frozen at recording time
/// so later rate changes cannot rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTime {
    pub id: Uuid,
    pub project_record_id: Uuid,
    pub entry_date: NaiveDate,
    pub hours: i16, // SMALLINT, 0..=24
    pub rate_amount: BigDecimal,
    pub rate_currency: String,
    pub created_at: DateTime<Utc>,
}

impl ProjectTime {
    pub fn new(project_record_id: Uuid, entry: &DayEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_record_id,
            entry_date: entry.day,
            hours: entry.hours,
            rate_amount: entry.rate.amount.clone(),
            rate_currency: entry.rate.currency.clone(),
            created_at: Utc::now(),
        }
    }
}

/// A project line as it appears in a manager's review queue, joined with its
/// report, project, and employee.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalItem {
    pub id: Uuid, // project_record id
    pub time_report_id: Uuid,
    pub project_id: Uuid,
    pub project_name: String,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub employee_slug: String,
    pub month: NaiveDate,
    pub status: ReportStatus,
    pub comment: Option<String>,
    pub total_hours: i32,
    pub total_amount_net: BigDecimal,
    pub total_amount_gross: BigDecimal,
    pub currency: String,
}
