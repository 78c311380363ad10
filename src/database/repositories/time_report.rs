use chrono::{NaiveDate, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{ApprovalItem, ProjectRecord, ProjectTime, ReportStatus, TimeReport},
    utils::sql,
};
use crate::domain::reporting::ReportTotals;
use crate::domain::timesheet::LineTotals;

pub async fn create(
    tx: &mut Transaction<'_, Postgres>,
    report: &TimeReport,
) -> Result<TimeReport, sqlx::Error> {
    let report = sqlx::query_as::<_, TimeReport>(&sql(r#"
        INSERT INTO
            time_reports (
                id,
                employee_id,
                start_date,
                status,
                total_hours,
                total_amount_net,
                total_amount_gross,
                currency,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            employee_id,
            start_date,
            status,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
    "#))
    .bind(report.id)
    .bind(report.employee_id)
    .bind(report.start_date)
    .bind(report.status)
    .bind(report.total_hours)
    .bind(&report.total_amount_net)
    .bind(&report.total_amount_gross)
    .bind(&report.currency)
    .bind(report.created_at)
    .bind(report.updated_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(report)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<TimeReport>, sqlx::Error> {
    let report = sqlx::query_as::<_, TimeReport>(&sql(r#"
        SELECT
            id,
            employee_id,
            start_date,
            status,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
        FROM
            time_reports
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(report)
}

/// Locks the report row for the rest of the transaction. Grid saves take
/// this lock first so concurrent saves serialize.
pub async fn lock_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<TimeReport>, sqlx::Error> {
    let report = sqlx::query_as::<_, TimeReport>(&sql(r#"
        SELECT
            id,
            employee_id,
            start_date,
            status,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
        FROM
            time_reports
        WHERE
            id = ?
        FOR UPDATE
    "#))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(report)
}

pub async fn list_for_employee(employee_id: Uuid) -> Result<Vec<TimeReport>, sqlx::Error> {
    let reports = sqlx::query_as::<_, TimeReport>(&sql(r#"
        SELECT
            id,
            employee_id,
            start_date,
            status,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
        FROM
            time_reports
        WHERE
            employee_id = ?
        ORDER BY
            start_date DESC
    "#))
    .bind(employee_id)
    .fetch_all(get_pool())
    .await?;

    Ok(reports)
}

pub async fn reported_months(employee_id: Uuid) -> Result<Vec<NaiveDate>, sqlx::Error> {
    let months = sqlx::query_scalar::<_, NaiveDate>(&sql(r#"
        SELECT
            start_date
        FROM
            time_reports
        WHERE
            employee_id = ?
        ORDER BY
            start_date
    "#))
    .bind(employee_id)
    .fetch_all(get_pool())
    .await?;

    Ok(months)
}

/// Same listing inside a transaction, for the open-month check taken under
/// the employee row lock.
pub async fn reported_months_tx(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
) -> Result<Vec<NaiveDate>, sqlx::Error> {
    let months = sqlx::query_scalar::<_, NaiveDate>(&sql(r#"
        SELECT
            start_date
        FROM
            time_reports
        WHERE
            employee_id = ?
        ORDER BY
            start_date
    "#))
    .bind(employee_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(months)
}

pub async fn update_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: ReportStatus,
) -> Result<TimeReport, sqlx::Error> {
    let report = sqlx::query_as::<_, TimeReport>(&sql(r#"
        UPDATE
            time_reports
        SET
            status = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            employee_id,
            start_date,
            status,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
    "#))
    .bind(status)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(report)
}

pub async fn update_totals(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    totals: &ReportTotals,
) -> Result<TimeReport, sqlx::Error> {
    let report = sqlx::query_as::<_, TimeReport>(&sql(r#"
        UPDATE
            time_reports
        SET
            total_hours = ?,
            total_amount_net = ?,
            total_amount_gross = ?,
            currency = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            employee_id,
            start_date,
            status,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
    "#))
    .bind(totals.total_hours)
    .bind(&totals.net)
    .bind(&totals.gross)
    .bind(&totals.currency)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(report)
}

pub async fn records_for_report(report_id: Uuid) -> Result<Vec<ProjectRecord>, sqlx::Error> {
    let records = sqlx::query_as::<_, ProjectRecord>(&sql(r#"
        SELECT
            id,
            time_report_id,
            project_id,
            status,
            comment,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
        FROM
            project_records
        WHERE
            time_report_id = ?
        ORDER BY
            created_at
    "#))
    .bind(report_id)
    .fetch_all(get_pool())
    .await?;

    Ok(records)
}

pub async fn records_for_report_tx(
    tx: &mut Transaction<'_, Postgres>,
    report_id: Uuid,
) -> Result<Vec<ProjectRecord>, sqlx::Error> {
    let records = sqlx::query_as::<_, ProjectRecord>(&sql(r#"
        SELECT
            id,
            time_report_id,
            project_id,
            status,
            comment,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
        FROM
            project_records
        WHERE
            time_report_id = ?
        ORDER BY
            created_at
    "#))
    .bind(report_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(records)
}

pub async fn find_record(id: Uuid) -> Result<Option<ProjectRecord>, sqlx::Error> {
    let record = sqlx::query_as::<_, ProjectRecord>(&sql(r#"
        SELECT
            id,
            time_report_id,
            project_id,
            status,
            comment,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
        FROM
            project_records
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(record)
}

/// Locks one line for a decision.
pub async fn lock_record(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<ProjectRecord>, sqlx::Error> {
    let record = sqlx::query_as::<_, ProjectRecord>(&sql(r#"
        SELECT
            id,
            time_report_id,
            project_id,
            status,
            comment,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
        FROM
            project_records
        WHERE
            id = ?
        FOR UPDATE
    "#))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(record)
}

pub async fn create_record(
    tx: &mut Transaction<'_, Postgres>,
    record: &ProjectRecord,
) -> Result<ProjectRecord, sqlx::Error> {
    let record = sqlx::query_as::<_, ProjectRecord>(&sql(r#"
        INSERT INTO
            project_records (
                id,
                time_report_id,
                project_id,
                status,
                comment,
                total_hours,
                total_amount_net,
                total_amount_gross,
                currency,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            time_report_id,
            project_id,
            status,
            comment,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
    "#))
    .bind(record.id)
    .bind(record.time_report_id)
    .bind(record.project_id)
    .bind(record.status)
    .bind(&record.comment)
    .bind(record.total_hours)
    .bind(&record.total_amount_net)
    .bind(&record.total_amount_gross)
    .bind(&record.currency)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(record)
}

pub async fn update_record_line(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    comment: Option<&str>,
    totals: &LineTotals,
) -> Result<ProjectRecord, sqlx::Error> {
    let record = sqlx::query_as::<_, ProjectRecord>(&sql(r#"
        UPDATE
            project_records
        SET
            comment = ?,
            total_hours = ?,
            total_amount_net = ?,
            total_amount_gross = ?,
            currency = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            time_report_id,
            project_id,
            status,
            comment,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
    "#))
    .bind(comment)
    .bind(totals.total_hours)
    .bind(&totals.net)
    .bind(&totals.gross)
    .bind(&totals.currency)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(record)
}

pub async fn update_record_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: ReportStatus,
) -> Result<ProjectRecord, sqlx::Error> {
    let record = sqlx::query_as::<_, ProjectRecord>(&sql(r#"
        UPDATE
            project_records
        SET
            status = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            time_report_id,
            project_id,
            status,
            comment,
            total_hours,
            total_amount_net,
            total_amount_gross,
            currency,
            created_at,
            updated_at
    "#))
    .bind(status)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(record)
}

pub async fn delete_record(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
        DELETE FROM
            project_records
        WHERE
            id = ?
    "#))
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

/// Day rows are never patched in place: recording replaces the whole set.
pub async fn replace_times(
    tx: &mut Transaction<'_, Postgres>,
    record_id: Uuid,
    times: &[ProjectTime],
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql(r#"
        DELETE FROM
            project_times
        WHERE
            project_record_id = ?
    "#))
    .bind(record_id)
    .execute(&mut **tx)
    .await?;

    for time in times {
        sqlx::query(&sql(r#"
            INSERT INTO
                project_times (
                    id,
                    project_record_id,
                    entry_date,
                    hours,
                    rate_amount,
                    rate_currency,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
        "#))
        .bind(time.id)
        .bind(time.project_record_id)
        .bind(time.entry_date)
        .bind(time.hours)
        .bind(&time.rate_amount)
        .bind(&time.rate_currency)
        .bind(time.created_at)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

pub async fn times_for_record(record_id: Uuid) -> Result<Vec<ProjectTime>, sqlx::Error> {
    let times = sqlx::query_as::<_, ProjectTime>(&sql(r#"
        SELECT
            id,
            project_record_id,
            entry_date,
            hours,
            rate_amount,
            rate_currency,
            created_at
        FROM
            project_times
        WHERE
            project_record_id = ?
        ORDER BY
            entry_date
    "#))
    .bind(record_id)
    .fetch_all(get_pool())
    .await?;

    Ok(times)
}

/// Every day row of the report across all its lines, for the per-day cap.
pub async fn times_for_report_tx(
    tx: &mut Transaction<'_, Postgres>,
    report_id: Uuid,
) -> Result<Vec<ProjectTime>, sqlx::Error> {
    let times = sqlx::query_as::<_, ProjectTime>(&sql(r#"
        SELECT
            t.id,
            t.project_record_id,
            t.entry_date,
            t.hours,
            t.rate_amount,
            t.rate_currency,
            t.created_at
        FROM
            project_times t
            JOIN project_records r ON r.id = t.project_record_id
        WHERE
            r.time_report_id = ?
        ORDER BY
            t.entry_date
    "#))
    .bind(report_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(times)
}

pub async fn record_statuses_tx(
    tx: &mut Transaction<'_, Postgres>,
    report_id: Uuid,
) -> Result<Vec<ReportStatus>, sqlx::Error> {
    let statuses = sqlx::query_scalar::<_, ReportStatus>(&sql(r#"
        SELECT
            status
        FROM
            project_records
        WHERE
            time_report_id = ?
    "#))
    .bind(report_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(statuses)
}

/// Submitted lines on the given projects, oldest report month first.
pub async fn approval_queue(project_ids: &[Uuid]) -> Result<Vec<ApprovalItem>, sqlx::Error> {
    let items = sqlx::query_as::<_, ApprovalItem>(&sql(r#"
        SELECT
            pr.id,
            pr.time_report_id,
            pr.project_id,
            p.name AS project_name,
            e.id AS employee_id,
            e.first_name || ' ' || e.last_name AS employee_name,
            e.slug AS employee_slug,
            tr.start_date AS month,
            pr.status,
            pr.comment,
            pr.total_hours,
            pr.total_amount_net,
            pr.total_amount_gross,
            pr.currency
        FROM
            project_records pr
            JOIN time_reports tr ON tr.id = pr.time_report_id
            JOIN projects p ON p.id = pr.project_id
            JOIN employees e ON e.id = tr.employee_id
        WHERE
            pr.status = 'submitted'
            AND pr.project_id = ANY(?)
        ORDER BY
            tr.start_date,
            e.last_name,
            e.first_name,
            p.name
    "#))
    .bind(project_ids)
    .fetch_all(get_pool())
    .await?;

    Ok(items)
}

pub async fn approval_item(record_id: Uuid) -> Result<Option<ApprovalItem>, sqlx::Error> {
    let item = sqlx::query_as::<_, ApprovalItem>(&sql(r#"
        SELECT
            pr.id,
            pr.time_report_id,
            pr.project_id,
            p.name AS project_name,
            e.id AS employee_id,
            e.first_name || ' ' || e.last_name AS employee_name,
            e.slug AS employee_slug,
            tr.start_date AS month,
            pr.status,
            pr.comment,
            pr.total_hours,
            pr.total_amount_net,
            pr.total_amount_gross,
            pr.currency
        FROM
            project_records pr
            JOIN time_reports tr ON tr.id = pr.time_report_id
            JOIN projects p ON p.id = pr.project_id
            JOIN employees e ON e.id = tr.employee_id
        WHERE
            pr.id = ?
    "#))
    .bind(record_id)
    .fetch_optional(get_pool())
    .await?;

    Ok(item)
}
