use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AuthResponse, Employee, LoginRequest};
use crate::database::repositories::employee as employee_repo;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // employee id
    pub email: String,
    pub exp: usize, // expiration time
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if auth_str.starts_with("Bearer ") {
                    let token = &auth_str[7..]; // Remove "Bearer " prefix

                    // Get the config from app data
                    if let Some(config) = req.app_data::<Data<Config>>() {
                        match decode::<Claims>(
                            token,
                            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                            &Validation::new(Algorithm::HS256),
                        ) {
                            Ok(token_data) => {
                                return ready(Ok(token_data.claims));
                            }
                            Err(_) => {
                                return ready(Err(ErrorUnauthorized("Invalid token")));
                            }
                        }
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

#[derive(Clone)]
pub struct AuthService {
    config: Config,
}

impl AuthService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let employee = employee_repo::find_by_email(&request.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // Deactivated accounts keep their history but cannot sign in.
        if !employee.is_active {
            return Err(AppError::Unauthorized);
        }

        let password_ok = verify(&request.password, &employee.password_hash)
            .map_err(|e| AppError::internal_server_error_message(format!("bcrypt: {}", e)))?;
        if !password_ok {
            return Err(AppError::Unauthorized);
        }

        let token = self.generate_token(&employee)?;

        Ok(AuthResponse { token, employee })
    }

    pub fn generate_token(&self, employee: &Employee) -> Result<String, AppError> {
        let expiration =
            (Utc::now() + Duration::days(self.config.jwt_expiration_days)).timestamp() as usize;

        let claims = Claims {
            sub: employee.id,
            email: employee.email.clone(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::internal_server_error_message(format!("token encoding: {}", e)))
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        hash(password, DEFAULT_COST)
            .map_err(|e| AppError::internal_server_error_message(format!("bcrypt: {}", e)))
    }
}

/// Random password handed out when an admin provisions an account. Returned
/// once in the create response and never stored in the clear.
pub fn generate_initial_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                abcdefghijklmnopqrstuvwxyz\
                                0123456789";
    const PASSWORD_LEN: usize = 16;
    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
