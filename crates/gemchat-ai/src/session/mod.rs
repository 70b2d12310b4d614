//! Conversation session management.
//!
//! A `Session` owns the append-only message log, the pending attachment,
//! the API key and the single in-flight flag, and mediates every exchange
//! with the remote model.

mod chat;
mod manager;
mod types;


pub use manager::Session;
pub use types::compose_user_turn;
