//! Reaction ledger: one entry per (submission, voter) backing six counters.
//!
//! The legacy upvote is a `like` written without overwriting, so score and
//! reactions can never drift apart.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReactionService;
