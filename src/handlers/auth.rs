use actix_web::{HttpRequest, HttpResponse, Result, web};

use crate::database::models::LoginRequest;
use crate::handlers::shared::ApiResponse;
use crate::services::{AuthService, user_context::extract_context};

pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let response = auth_service.login(request.into_inner()).await?;

    Ok(ApiResponse::success(response))
}

pub async fn me(req: HttpRequest) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;

    Ok(ApiResponse::success(ctx.employee))
}
