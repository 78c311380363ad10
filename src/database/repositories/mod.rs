pub mod client;
pub mod contract;
pub mod employee;
pub mod project;
pub mod rate;
pub mod time_report;
