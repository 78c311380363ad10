use std::collections::{BTreeMap, BTreeSet};

use actix_web::{HttpRequest, HttpResponse, Result, web};
use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::Config,
    database::{
        models::{Employee, ProjectRecord, ProjectTime, Rate, ReportStatus, TimeReport},
        repositories::{
            contract as contract_repo, employee as employee_repo, project as project_repo,
            rate as rate_repo, time_report as time_report_repo,
        },
        transaction::DatabaseTransaction,
    },
    domain::{
        StateError, ValidationError,
        interval::{DateInterval, Spanned},
        money::Money,
        month::{days_in_month, ensure_month_start, weekend_days},
        rates::rate_table,
        reporting::{ensure_month_open, open_months, report_totals},
        status::{derive_report_status, ensure_editable, ensure_line_unlocked, submit_status},
        timesheet::{DayEntry, LineTotals, day_entries, line_totals, validate_day_totals},
    },
    error::AppError,
    handlers::shared::ApiResponse,
    services::user_context::{UserContext, extract_context},
};

#[derive(Debug, Deserialize)]
pub struct EmployeeFilterQuery {
    pub employee: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeReportInput {
    /// First day of the month to report.
    pub month: NaiveDate,
    /// Admins may open a report on someone else's behalf.
    pub employee: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    Save,
    Submit,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInput {
    pub project_id: Uuid,
    pub comment: Option<String>,
    /// Day of month to hours. Null and zero both mean "no work that day".
    #[serde(default)]
    pub days: BTreeMap<u32, Option<i16>>,
    #[serde(default)]
    pub delete: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEntriesInput {
    pub mode: SaveMode,
    pub lines: Vec<LineInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    pub id: Uuid,
    pub project_id: Uuid,
    pub project_name: String,
    pub project_slug: String,
    pub status: ReportStatus,
    pub comment: Option<String>,
    pub total_hours: i32,
    pub total_amount_net: BigDecimal,
    pub total_amount_gross: BigDecimal,
    pub currency: String,
    pub days: BTreeMap<u32, i16>,
}

/// Everything the monthly entry grid needs in one response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    #[serde(flatten)]
    pub report: TimeReport,
    pub days_in_month: u32,
    pub weekend_days: Vec<u32>,
    pub lines: Vec<ReportLine>,
}

pub async fn list_reports(
    req: HttpRequest,
    query: web::Query<EmployeeFilterQuery>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    let target = target_employee(&ctx, query.employee.as_deref()).await?;

    let reports = time_report_repo::list_for_employee(target.id)
        .await
        .map_err(|e| {
            log::error!("Failed to list time reports of {}: {}", target.id, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(reports))
}

pub async fn open_months_for_employee(
    req: HttpRequest,
    query: web::Query<EmployeeFilterQuery>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    let target = target_employee(&ctx, query.employee.as_deref()).await?;

    let contracts = contract_repo::list_for_employee(target.id)
        .await
        .map_err(|e| {
            log::error!("Failed to list contracts of {}: {}", target.id, e);
            AppError::DatabaseError(e)
        })?;
    let spans: Vec<DateInterval> = contracts.iter().map(Spanned::span).collect();

    let reported = time_report_repo::reported_months(target.id)
        .await
        .map_err(|e| {
            log::error!("Failed to list reported months of {}: {}", target.id, e);
            AppError::DatabaseError(e)
        })?;

    let months = open_months(&spans, &reported, Utc::now().date_naive());

    Ok(ApiResponse::success(months))
}

pub async fn create_report(
    req: HttpRequest,
    config: web::Data<Config>,
    input: web::Json<CreateTimeReportInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_active()?;

    let input = input.into_inner();
    let target = target_employee(&ctx, input.employee.as_deref()).await?;
    if !target.is_active {
        return Err(AppError::from(StateError::EmployeeInactive).into());
    }

    let month = ensure_month_start(input.month).map_err(AppError::from)?;
    let currency = config.default_currency.clone();

    let employee_id = target.id;
    let report = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            // The employee lock serializes the open-month check against
            // concurrent report creation and contract edits.
            employee_repo::lock_by_id(tx, employee_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

            let contracts = contract_repo::list_for_employee_tx(tx, employee_id).await?;
            let spans: Vec<DateInterval> = contracts.iter().map(Spanned::span).collect();
            let reported = time_report_repo::reported_months_tx(tx, employee_id).await?;

            let open = open_months(&spans, &reported, Utc::now().date_naive());
            ensure_month_open(month, &open)?;

            let report = TimeReport::new(employee_id, month, currency);
            Ok(time_report_repo::create(tx, &report).await?)
        })
    })
    .await?;

    Ok(ApiResponse::created(report))
}

pub async fn get_report(req: HttpRequest, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;

    let report = find_report(path.into_inner()).await?;
    ctx.can_act_for(report.employee_id)?;

    let view = report_view(report).await?;

    Ok(ApiResponse::success(view))
}

pub async fn save_entries(
    req: HttpRequest,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    input: web::Json<SaveEntriesInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_active()?;

    let input = input.into_inner();
    let report = find_report(path.into_inner()).await?;
    ctx.can_act_for(report.employee_id)?;

    let mut seen = BTreeSet::new();
    for line in &input.lines {
        if !seen.insert(line.project_id) {
            return Err(AppError::from(ValidationError::DuplicateProject).into());
        }
    }

    // Everything the grid math needs, fetched before the transaction. Rates
    // are frozen into the day rows anyway, so a rate changing underneath a
    // save does not need the employee lock.
    let rates = rate_repo::list_for_employee(report.employee_id)
        .await
        .map_err(|e| {
            log::error!("Failed to list rates of {}: {}", report.employee_id, e);
            AppError::DatabaseError(e)
        })?;
    let spans: Vec<_> = rates.iter().map(Rate::to_span).collect();

    let mut projects = BTreeMap::new();
    for line in &input.lines {
        let project = project_repo::find_by_id(line.project_id)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch project {}: {}", line.project_id, e);
                AppError::DatabaseError(e)
            })?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
        projects.insert(project.id, project);
    }

    let available: BTreeSet<Uuid> = project_repo::available_for(report.employee_id)
        .await
        .map_err(|e| {
            log::error!(
                "Failed to list projects available for {}: {}",
                report.employee_id,
                e
            );
            AppError::DatabaseError(e)
        })?
        .into_iter()
        .map(|p| p.id)
        .collect();

    let gross_multiplier = config.gross_tax_multiplier.clone();
    let default_currency = config.default_currency.clone();
    let month = report.start_date;
    let mode = input.mode;
    let lines = input.lines;
    let report_id = report.id;

    let report = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let report = time_report_repo::lock_by_id(tx, report_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Time report not found".to_string()))?;
            ensure_editable(report.status)?;

            let records = time_report_repo::records_for_report_tx(tx, report.id).await?;
            let by_project: BTreeMap<Uuid, ProjectRecord> =
                records.into_iter().map(|r| (r.project_id, r)).collect();

            for line in lines {
                let existing = by_project.get(&line.project_id);

                if line.delete {
                    if let Some(record) = existing {
                        ensure_line_unlocked(record.status)?;
                        time_report_repo::delete_record(tx, record.id).await?;
                    }
                    continue;
                }

                let project = projects
                    .get(&line.project_id)
                    .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

                // New lines only on projects the employee can report on;
                // existing lines stay editable even if the project has since
                // been closed or made private.
                if existing.is_none() && !available.contains(&project.id) {
                    return Err(AppError::from(ValidationError::ProjectNotAvailable {
                        name: project.name.clone(),
                    }));
                }

                let table = rate_table(&spans, month, project.rate_kind())?;
                let entries = day_entries(month, &line.days, &table)?;
                let totals = line_totals(&entries, &gross_multiplier, &default_currency);

                let record_id = match existing {
                    Some(record) => {
                        ensure_line_unlocked(record.status)?;
                        time_report_repo::update_record_line(
                            tx,
                            record.id,
                            line.comment.as_deref(),
                            &totals,
                        )
                        .await?;
                        record.id
                    }
                    None => {
                        let mut record =
                            ProjectRecord::new(report.id, project.id, totals.currency.clone());
                        record.comment = line.comment.clone();
                        record.total_hours = totals.total_hours;
                        record.total_amount_net = totals.net.clone();
                        record.total_amount_gross = totals.gross.clone();
                        let record = time_report_repo::create_record(tx, &record).await?;
                        record.id
                    }
                };

                let times: Vec<ProjectTime> = entries
                    .iter()
                    .map(|entry| ProjectTime::new(record_id, entry))
                    .collect();
                time_report_repo::replace_times(tx, record_id, &times).await?;
            }

            // The 24-hour day cap holds across every line, including the
            // ones this save did not touch.
            let all_times = time_report_repo::times_for_report_tx(tx, report.id).await?;
            let stored: Vec<DayEntry> = all_times
                .iter()
                .map(|t| DayEntry {
                    day: t.entry_date,
                    hours: t.hours,
                    rate: Money::new(t.rate_amount.clone(), t.rate_currency.clone()),
                })
                .collect();
            validate_day_totals(&stored)?;

            let records = time_report_repo::records_for_report_tx(tx, report.id).await?;
            let sums: Vec<LineTotals> = records
                .iter()
                .map(|r| LineTotals {
                    total_hours: r.total_hours,
                    net: r.total_amount_net.clone(),
                    gross: r.total_amount_gross.clone(),
                    currency: r.currency.clone(),
                })
                .collect();
            let totals = report_totals(&sums, &default_currency)?;
            let mut report = time_report_repo::update_totals(tx, report.id, &totals).await?;

            if mode == SaveMode::Submit {
                for record in &records {
                    let next = submit_status(record.status, record.total_hours);
                    if next != record.status {
                        time_report_repo::update_record_status(tx, record.id, next).await?;
                    }
                }

                let statuses = time_report_repo::record_statuses_tx(tx, report.id).await?;
                if let Some(next) = derive_report_status(&statuses) {
                    if next != report.status {
                        report = time_report_repo::update_status(tx, report.id, next).await?;
                    }
                }
            }

            Ok(report)
        })
    })
    .await?;

    Ok(ApiResponse::success(report))
}

/// Resolves the employee a request acts on: the caller, or the slug named in
/// the query for admins.
async fn target_employee(ctx: &UserContext, slug: Option<&str>) -> Result<Employee, AppError> {
    let employee = match slug {
        Some(slug) => employee_repo::find_by_slug(slug)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch employee {}: {}", slug, e);
                AppError::DatabaseError(e)
            })?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?,
        None => ctx.employee.clone(),
    };

    ctx.can_act_for(employee.id)?;

    Ok(employee)
}

async fn find_report(id: Uuid) -> Result<TimeReport, AppError> {
    time_report_repo::find_by_id(id)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch time report {}: {}", id, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Time report not found".to_string()))
}

async fn report_view(report: TimeReport) -> Result<ReportView, AppError> {
    let records = time_report_repo::records_for_report(report.id)
        .await
        .map_err(|e| {
            log::error!("Failed to list records of report {}: {}", report.id, e);
            AppError::DatabaseError(e)
        })?;

    let mut lines = Vec::with_capacity(records.len());
    for record in records {
        let project = project_repo::find_by_id(record.project_id)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch project {}: {}", record.project_id, e);
                AppError::DatabaseError(e)
            })?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        let times = time_report_repo::times_for_record(record.id)
            .await
            .map_err(|e| {
                log::error!("Failed to list day entries of record {}: {}", record.id, e);
                AppError::DatabaseError(e)
            })?;
        let days: BTreeMap<u32, i16> = times
            .iter()
            .map(|t| (t.entry_date.day(), t.hours))
            .collect();

        lines.push(ReportLine {
            id: record.id,
            project_id: project.id,
            project_name: project.name,
            project_slug: project.slug,
            status: record.status,
            comment: record.comment,
            total_hours: record.total_hours,
            total_amount_net: record.total_amount_net,
            total_amount_gross: record.total_amount_gross,
            currency: record.currency,
            days,
        });
    }

    Ok(ReportView {
        days_in_month: days_in_month(report.start_date),
        weekend_days: weekend_days(report.start_date),
        lines,
        report,
    })
}
