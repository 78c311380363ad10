use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::Deserialize;

use crate::{
    database::{
        models::{Client, ClientInput},
        repositories::client as client_repo,
        slug::{slugify, unique_slug},
    },
    error::AppError,
    handlers::shared::ApiResponse,
    services::user_context::extract_context,
};

#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    pub all: Option<bool>,
}

pub async fn list_clients(
    req: HttpRequest,
    query: web::Query<ListClientsQuery>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;

    let include_inactive = query.all.unwrap_or(false);
    if include_inactive {
        ctx.requires_admin()?;
    }

    let clients = client_repo::list(include_inactive).await.map_err(|e| {
        log::error!("Failed to list clients: {}", e);
        AppError::DatabaseError(e)
    })?;

    Ok(ApiResponse::success(clients))
}

pub async fn create_client(
    req: HttpRequest,
    input: web::Json<ClientInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let input = input.into_inner();

    let base = slugify(&input.name);
    let taken = client_repo::slugs_starting_with(&base).await.map_err(|e| {
        log::error!("Failed to check existing slugs: {}", e);
        AppError::DatabaseError(e)
    })?;
    let slug = unique_slug(&base, &taken);

    let client = client_repo::create(&Client::new(input.name, slug))
        .await
        .map_err(|e| {
            log::error!("Failed to create client: {}", e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::created(client))
}

pub async fn get_client(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    let _ctx = extract_context(&req).await?;

    let client = find_client(&path.into_inner()).await?;

    Ok(ApiResponse::success(client))
}

pub async fn update_client(
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<ClientInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let client = find_client(&path.into_inner()).await?;

    let client = client_repo::update_name(client.id, &input.name)
        .await
        .map_err(|e| {
            log::error!("Failed to update client {}: {}", client.id, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(client))
}

pub async fn activate_client(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    set_client_active(req, path, true).await
}

pub async fn deactivate_client(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    set_client_active(req, path, false).await
}

async fn set_client_active(
    req: HttpRequest,
    path: web::Path<String>,
    active: bool,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let client = find_client(&path.into_inner()).await?;

    let client = client_repo::set_active(client.id, active)
        .await
        .map_err(|e| {
            log::error!("Failed to change active flag of {}: {}", client.id, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(client))
}

async fn find_client(slug: &str) -> Result<Client, AppError> {
    client_repo::find_by_slug(slug)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch client {}: {}", slug, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))
}
