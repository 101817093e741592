//! Health assistant models

pub mod chat;
pub mod user;

// Re-export for convenience
pub use chat::{ChatTurn, Role};
pub use user::{Credentials, NewUser, User};
