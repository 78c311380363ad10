pub mod approvals;
pub mod auth;
pub mod clients;
pub mod employees;
pub mod projects;
pub mod shared;
pub mod time_reports;
