//! Public submit action. New posts always start as `pending`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::SubmissionService;
