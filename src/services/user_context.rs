use actix_web::{FromRequest, HttpRequest, dev::Payload};
use uuid::Uuid;

use crate::database::models::Employee;
use crate::database::repositories::{employee as employee_repo, project as project_repo};
use crate::error::AppError;
use crate::services::auth::Claims;

/// Who is making the request and which projects they manage, resolved once
/// per request from the bearer token.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub employee: Employee,
    pub managed_projects: Vec<Uuid>,
}

impl UserContext {
    pub fn employee_id(&self) -> Uuid {
        self.employee.id
    }

    pub fn is_admin(&self) -> bool {
        self.employee.is_admin
    }

    pub fn manages(&self, project_id: Uuid) -> bool {
        self.is_admin() || self.managed_projects.contains(&project_id)
    }

    pub fn requires_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Administrator access required".to_string(),
            ))
        }
    }

    /// Deactivated accounts can still read their history but mutate nothing.
    pub fn requires_active(&self) -> Result<(), AppError> {
        if self.employee.is_active {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Account is deactivated".to_string(),
            ))
        }
    }

    pub fn requires_manager_of(&self, project_id: Uuid) -> Result<(), AppError> {
        if self.manages(project_id) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Only a manager of this project can do that".to_string(),
            ))
        }
    }

    /// Own resources, or anyone's for administrators.
    pub fn can_act_for(&self, employee_id: Uuid) -> Result<(), AppError> {
        if self.is_admin() || self.employee.id == employee_id {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "You can only access your own resources".to_string(),
            ))
        }
    }
}

/// Builds the authorization context for the request's bearer token.
pub async fn extract_context(req: &HttpRequest) -> Result<UserContext, AppError> {
    let claims = Claims::from_request(req, &mut Payload::None)
        .await
        .map_err(|_| AppError::Unauthorized)?;

    let employee = employee_repo::find_by_id(claims.sub)
        .await
        .map_err(AppError::DatabaseError)?
        .ok_or(AppError::Unauthorized)?;

    let managed_projects = project_repo::managed_project_ids(employee.id)
        .await
        .map_err(AppError::DatabaseError)?;

    Ok(UserContext {
        employee,
        managed_projects,
    })
}
