pub mod auth;
pub mod user_context;

pub use auth::AuthService;
pub use user_context::UserContext;
