use actix_web::{HttpRequest, HttpResponse, Result, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    database::{
        models::{
            Contract, ContractInput, CreateEmployeeInput, Employee, Rate, RateInput,
            UpdateEmployeeInput,
        },
        repositories::{contract as contract_repo, employee as employee_repo, rate as rate_repo},
        slug::{slugify, unique_slug},
        transaction::DatabaseTransaction,
    },
    domain::{
        StateError, ValidationError,
        interval::{DateInterval, find_conflict, validate_sign_date},
    },
    error::AppError,
    handlers::shared::ApiResponse,
    services::{AuthService, auth::generate_initial_password, user_context::extract_context},
};

#[derive(Debug, Deserialize)]
pub struct ListEmployeesQuery {
    pub all: Option<bool>,
}

/// Served once, straight from the create response. The password is stored
/// only as a bcrypt hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEmployeeResponse {
    #[serde(flatten)]
    pub employee: Employee,
    pub initial_password: String,
}

pub async fn list_employees(
    req: HttpRequest,
    query: web::Query<ListEmployeesQuery>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;

    let include_inactive = query.all.unwrap_or(false);
    if include_inactive {
        ctx.requires_admin()?;
    }

    let employees = employee_repo::list(include_inactive).await.map_err(|e| {
        log::error!("Failed to list employees: {}", e);
        AppError::DatabaseError(e)
    })?;

    Ok(ApiResponse::success(employees))
}

pub async fn create_employee(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    input: web::Json<CreateEmployeeInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let input = input.into_inner();

    let base = slugify(&format!("{} {}", input.first_name, input.last_name));
    let taken = employee_repo::slugs_starting_with(&base).await.map_err(|e| {
        log::error!("Failed to check existing slugs: {}", e);
        AppError::DatabaseError(e)
    })?;
    let slug = unique_slug(&base, &taken);

    let initial_password = generate_initial_password();
    let password_hash = auth_service.hash_password(&initial_password)?;

    let employee = Employee::new(
        input.email,
        password_hash,
        input.first_name,
        input.last_name,
        slug,
        input.tax_id,
        input.is_admin.unwrap_or(false),
    );

    let employee = employee_repo::create(&employee).await.map_err(|e| {
        log::error!("Failed to create employee: {}", e);
        AppError::DatabaseError(e)
    })?;

    Ok(ApiResponse::created(CreatedEmployeeResponse {
        employee,
        initial_password,
    }))
}

pub async fn get_employee(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    let _ctx = extract_context(&req).await?;

    let slug = path.into_inner();
    let employee = find_employee(&slug).await?;

    Ok(ApiResponse::success(employee))
}

pub async fn update_employee(
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<UpdateEmployeeInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let employee = find_employee(&path.into_inner()).await?;

    let employee = employee_repo::update(employee.id, &input)
        .await
        .map_err(|e| {
            log::error!("Failed to update employee {}: {}", employee.id, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(employee))
}

pub async fn activate_employee(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    set_employee_active(req, path, true).await
}

pub async fn deactivate_employee(
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    set_employee_active(req, path, false).await
}

async fn set_employee_active(
    req: HttpRequest,
    path: web::Path<String>,
    active: bool,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let employee = find_employee(&path.into_inner()).await?;

    let employee = employee_repo::set_active(employee.id, active)
        .await
        .map_err(|e| {
            log::error!("Failed to change active flag of {}: {}", employee.id, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(employee))
}

// Contract handlers

pub async fn list_contracts(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;

    let employee = find_employee(&path.into_inner()).await?;

    let contracts = contract_repo::list_for_employee(employee.id)
        .await
        .map_err(|e| {
            log::error!("Failed to list contracts of {}: {}", employee.id, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(contracts))
}

pub async fn create_contract(
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<ContractInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let employee = find_employee(&path.into_inner()).await?;
    let input = input.into_inner();

    let candidate = DateInterval::new(input.start_date, input.end_date).map_err(AppError::from)?;
    validate_sign_date(input.sign_date, Utc::now().date_naive()).map_err(AppError::from)?;

    let employee_id = employee.id;
    let contract = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let employee = employee_repo::lock_by_id(tx, employee_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
            if !employee.is_active {
                return Err(AppError::from(StateError::EmployeeInactive));
            }

            let existing = contract_repo::list_for_employee_tx(tx, employee_id).await?;
            if let Some(conflict) = find_conflict(&candidate, &existing, None) {
                return Err(AppError::from(ValidationError::ContractOverlap {
                    name: conflict.name.clone(),
                }));
            }

            Ok(contract_repo::create(tx, &Contract::new(employee_id, input)).await?)
        })
    })
    .await?;

    Ok(ApiResponse::created(contract))
}

pub async fn get_contract(req: HttpRequest, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;

    let contract = find_contract(path.into_inner()).await?;

    Ok(ApiResponse::success(contract))
}

pub async fn update_contract(
    req: HttpRequest,
    path: web::Path<Uuid>,
    input: web::Json<ContractInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let contract = find_contract(path.into_inner()).await?;
    let input = input.into_inner();

    let candidate = DateInterval::new(input.start_date, input.end_date).map_err(AppError::from)?;
    validate_sign_date(input.sign_date, Utc::now().date_naive()).map_err(AppError::from)?;

    let contract_id = contract.id;
    let employee_id = contract.employee_id;
    let contract = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let employee = employee_repo::lock_by_id(tx, employee_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
            if !employee.is_active {
                return Err(AppError::from(StateError::EmployeeInactive));
            }

            let existing = contract_repo::list_for_employee_tx(tx, employee_id).await?;
            if let Some(conflict) = find_conflict(&candidate, &existing, Some(contract_id)) {
                return Err(AppError::from(ValidationError::ContractOverlap {
                    name: conflict.name.clone(),
                }));
            }

            Ok(contract_repo::update(tx, contract_id, &input).await?)
        })
    })
    .await?;

    Ok(ApiResponse::success(contract))
}

pub async fn delete_contract(req: HttpRequest, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let contract = find_contract(path.into_inner()).await?;

    let contract_id = contract.id;
    let employee_id = contract.employee_id;
    DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            employee_repo::lock_by_id(tx, employee_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

            let deleted = contract_repo::delete(tx, contract_id).await?;
            if deleted == 0 {
                return Err(AppError::NotFound("Contract not found".to_string()));
            }

            Ok(())
        })
    })
    .await?;

    Ok(ApiResponse::success_message("Contract deleted"))
}

// Rate handlers

pub async fn list_rates(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;

    let employee = find_employee(&path.into_inner()).await?;

    let rates = rate_repo::list_for_employee(employee.id).await.map_err(|e| {
        log::error!("Failed to list rates of {}: {}", employee.id, e);
        AppError::DatabaseError(e)
    })?;

    Ok(ApiResponse::success(rates))
}

pub async fn create_rate(
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<RateInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let employee = find_employee(&path.into_inner()).await?;
    let input = input.into_inner();

    let candidate = DateInterval::new(input.start_date, input.end_date).map_err(AppError::from)?;

    let employee_id = employee.id;
    let rate = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let employee = employee_repo::lock_by_id(tx, employee_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
            if !employee.is_active {
                return Err(AppError::from(StateError::EmployeeInactive));
            }

            let existing = rate_repo::list_for_employee_tx(tx, employee_id).await?;
            if let Some(conflict) = find_conflict(&candidate, &existing, None) {
                return Err(AppError::from(ValidationError::RateOverlap {
                    start: conflict.start_date,
                }));
            }

            Ok(rate_repo::create(tx, &Rate::new(employee_id, input)).await?)
        })
    })
    .await?;

    Ok(ApiResponse::created(rate))
}

pub async fn get_rate(req: HttpRequest, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;

    let rate = find_rate(path.into_inner()).await?;

    Ok(ApiResponse::success(rate))
}

pub async fn update_rate(
    req: HttpRequest,
    path: web::Path<Uuid>,
    input: web::Json<RateInput>,
) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let rate = find_rate(path.into_inner()).await?;
    let input = input.into_inner();

    let candidate = DateInterval::new(input.start_date, input.end_date).map_err(AppError::from)?;

    let rate_id = rate.id;
    let employee_id = rate.employee_id;
    let rate = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let employee = employee_repo::lock_by_id(tx, employee_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
            if !employee.is_active {
                return Err(AppError::from(StateError::EmployeeInactive));
            }

            let existing = rate_repo::list_for_employee_tx(tx, employee_id).await?;
            if let Some(conflict) = find_conflict(&candidate, &existing, Some(rate_id)) {
                return Err(AppError::from(ValidationError::RateOverlap {
                    start: conflict.start_date,
                }));
            }

            Ok(rate_repo::update(tx, rate_id, &input).await?)
        })
    })
    .await?;

    Ok(ApiResponse::success(rate))
}

pub async fn delete_rate(req: HttpRequest, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;
    ctx.requires_active()?;

    let rate = find_rate(path.into_inner()).await?;

    let rate_id = rate.id;
    let employee_id = rate.employee_id;
    DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            employee_repo::lock_by_id(tx, employee_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

            let deleted = rate_repo::delete(tx, rate_id).await?;
            if deleted == 0 {
                return Err(AppError::NotFound("Rate not found".to_string()));
            }

            Ok(())
        })
    })
    .await?;

    Ok(ApiResponse::success_message("Rate deleted"))
}

async fn find_employee(slug: &str) -> Result<Employee, AppError> {
    employee_repo::find_by_slug(slug)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch employee {}: {}", slug, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
}

async fn find_contract(id: Uuid) -> Result<Contract, AppError> {
    contract_repo::find_by_id(id)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch contract {}: {}", id, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))
}

async fn find_rate(id: Uuid) -> Result<Rate, AppError> {
    rate_repo::find_by_id(id)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch rate {}: {}", id, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Rate not found".to_string()))
}
