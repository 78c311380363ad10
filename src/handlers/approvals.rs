use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    database::{
        models::{ApprovalItem, ProjectTime},
        repositories::{project as project_repo, time_report as time_report_repo},
        transaction::DatabaseTransaction,
    },
    domain::status::{Decision, decide, derive_report_status},
    error::AppError,
    handlers::shared::ApiResponse,
    services::user_context::extract_context,
};

/// A queued line with its day-by-day entries, for the review detail view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalDetails {
    #[serde(flatten)]
    pub item: ApprovalItem,
    pub days: Vec<ProjectTime>,
}

pub async fn approval_queue(req: HttpRequest) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;

    let project_ids: Vec<Uuid> = if ctx.is_admin() {
        project_repo::list(true)
            .await
            .map_err(|e| {
                log::error!("Failed to list projects: {}", e);
                AppError::DatabaseError(e)
            })?
            .into_iter()
            .map(|p| p.id)
            .collect()
    } else {
        ctx.managed_projects.clone()
    };

    if project_ids.is_empty() {
        return Ok(ApiResponse::success(Vec::<ApprovalItem>::new()));
    }

    let items = time_report_repo::approval_queue(&project_ids)
        .await
        .map_err(|e| {
            log::error!("Failed to build approval queue: {}", e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(items))
}

pub async fn get_approval_item(req: HttpRequest, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;

    let record_id = path.into_inner();
    let item = time_report_repo::approval_item(record_id)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch approval item {}: {}", record_id, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Project record not found".to_string()))?;

    ctx.requires_manager_of(item.project_id)?;

    let days = time_report_repo::times_for_record(record_id)
        .await
        .map_err(|e| {
            log::error!("Failed to list day entries of record {}: {}", record_id, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(ApprovalDetails { item, days }))
}

pub async fn approve_record(req: HttpRequest, path: web::Path<Uuid>) -> Result<HttpResponse> {
    decide_record(req, path, Decision::Approve).await
}

pub async fn reject_record(req: HttpRequest, path: web::Path<Uuid>) -> Result<HttpResponse> {
    decide_record(req, path, Decision::Reject).await
}

async fn decide_record(
    req: HttpRequest,
    path: web::Path<Uuid>,
    decision: Decision,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_active()?;

    let record_id = path.into_inner();
    let record = time_report_repo::find_record(record_id)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch project record {}: {}", record_id, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Project record not found".to_string()))?;

    ctx.requires_manager_of(record.project_id)?;

    let report_id = record.time_report_id;
    let record = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            // Report lock before record lock, the same order as a grid save.
            time_report_repo::lock_by_id(tx, report_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Time report not found".to_string()))?;
            let record = time_report_repo::lock_record(tx, record_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Project record not found".to_string()))?;

            let next = decide(record.status, decision)?;
            let record = time_report_repo::update_record_status(tx, record.id, next).await?;

            let statuses = time_report_repo::record_statuses_tx(tx, report_id).await?;
            if let Some(status) = derive_report_status(&statuses) {
                time_report_repo::update_status(tx, report_id, status).await?;
            }

            Ok(record)
        })
    })
    .await?;

    Ok(ApiResponse::success(record))
}
