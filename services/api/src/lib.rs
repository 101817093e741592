//! Health assistant service
//!
//! Forwards health questions to a remote AI assistant after a local emergency
//! triage check, and keeps per-user chat history behind a minimal
//! username/password login.

pub mod accounts;
pub mod assistant;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod triage;
pub mod validation;

pub use state::AppState;
