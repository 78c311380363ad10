pub(crate) mod macros;

pub mod auth;
pub mod client;
pub mod contract;
pub mod employee;
pub mod project;
pub mod rate;
pub mod time_report;

// Re-export all models for easy importing
pub use auth::*;
pub use client::*;
pub use contract::*;
pub use employee::*;
pub use project::*;
pub use rate::*;
pub use time_report::*;
