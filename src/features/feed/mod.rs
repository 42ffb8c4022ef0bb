//! Feed assembler: approved, unflagged submissions joined with their
//! reaction totals and comment counts.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::FeedService;
