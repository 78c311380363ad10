use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::Deserialize;

use crate::{
    database::{
        models::{Project, ProjectDetails, ProjectInput},
        repositories::project as project_repo,
        slug::{slugify, unique_slug},
        transaction::DatabaseTransaction,
    },
    error::AppError,
    handlers::shared::ApiResponse,
    services::user_context::extract_context,
};

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub all: Option<bool>,
}

/// Admins see every project; everyone else sees what they can report on,
/// meaning active projects that are public or count them as a member.
pub async fn list_projects(
    req: HttpRequest,
    query: web::Query<ListProjectsQuery>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;

    let include_inactive = query.all.unwrap_or(false);
    if include_inactive {
        ctx.requires_admin()?;
    }

    let projects = if ctx.is_admin() {
        project_repo::list(include_inactive).await
    } else {
        project_repo::available_for(ctx.employee_id()).await
    }
    .map_err(|e| {
        log::error!("Failed to list projects: {}", e);
        AppError::DatabaseError(e)
    })?;

    Ok(ApiResponse::success(projects))
}

pub async fn create_project(
    req: HttpRequest,
    input: web::Json<ProjectInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let input = input.into_inner();

    let base = slugify(&input.name);
    let taken = project_repo::slugs_starting_with(&base).await.map_err(|e| {
        log::error!("Failed to check existing slugs: {}", e);
        AppError::DatabaseError(e)
    })?;
    let slug = unique_slug(&base, &taken);

    let managers = input.managers.clone().unwrap_or_default();
    let members = input.members.clone().unwrap_or_default();

    let project = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let project = project_repo::create(tx, &Project::new(&input, slug)).await?;
            project_repo::set_people(tx, project.id, &managers, &members).await?;

            Ok(project)
        })
    })
    .await?;

    let details = project_details(project).await?;

    Ok(ApiResponse::created(details))
}

pub async fn get_project(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    let _ctx = extract_context(&req).await?;

    let project = find_project(&path.into_inner()).await?;
    let details = project_details(project).await?;

    Ok(ApiResponse::success(details))
}

pub async fn update_project(
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<ProjectInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let project = find_project(&path.into_inner()).await?;
    let input = input.into_inner();

    // Lists given in the payload replace the stored ones; absent lists stay.
    let current_managers = project_repo::managers_of(project.id).await.map_err(|e| {
        log::error!("Failed to fetch managers of {}: {}", project.id, e);
        AppError::DatabaseError(e)
    })?;
    let current_members = project_repo::members_of(project.id).await.map_err(|e| {
        log::error!("Failed to fetch members of {}: {}", project.id, e);
        AppError::DatabaseError(e)
    })?;

    let managers = input.managers.clone().unwrap_or(current_managers);
    let members = input.members.clone().unwrap_or(current_members);

    let project_id = project.id;
    let project = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let project = project_repo::update(tx, project_id, &input).await?;
            project_repo::set_people(tx, project_id, &managers, &members).await?;

            Ok(project)
        })
    })
    .await?;

    let details = project_details(project).await?;

    Ok(ApiResponse::success(details))
}

pub async fn activate_project(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    set_project_active(req, path, true).await
}

pub async fn deactivate_project(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    set_project_active(req, path, false).await
}

async fn set_project_active(
    req: HttpRequest,
    path: web::Path<String>,
    active: bool,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let project = find_project(&path.into_inner()).await?;

    let project = project_repo::set_active(project.id, active)
        .await
        .map_err(|e| {
            log::error!("Failed to change active flag of {}: {}", project.id, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(project))
}

async fn find_project(slug: &str) -> Result<Project, AppError> {
    project_repo::find_by_slug(slug)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch project {}: {}", slug, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

async fn project_details(project: Project) -> Result<ProjectDetails, AppError> {
    let managers = project_repo::managers_of(project.id).await.map_err(|e| {
        log::error!("Failed to fetch managers of {}: {}", project.id, e);
        AppError::DatabaseError(e)
    })?;
    let members = project_repo::members_of(project.id).await.map_err(|e| {
        log::error!("Failed to fetch members of {}: {}", project.id, e);
        AppError::DatabaseError(e)
    })?;

    Ok(ProjectDetails {
        project,
        managers,
        members,
    })
}
