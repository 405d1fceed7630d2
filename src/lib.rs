//! Career assistant backend: job search, skill gap analysis, career
//! planning, interview coaching, and bias auditing behind one JSON API.
//!
//! Every agent wraps a hosted model or search service and degrades to
//! hard-coded defaults when that service fails, so the API stays
//! non-blocking for the user.

pub mod agents;
pub mod core;
pub mod database;
pub mod environment;
pub mod utils;
pub mod web;

pub use crate::core::ConfigManager;
pub use crate::web::start_web_server;
