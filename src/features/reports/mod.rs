//! Report ledger: one complaint per (submission, voter), rate limited per
//! voter, feeding `report_count` and the auto-flag soft hide.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReportService;
