//! Tunefetch bot: Telegram front end, per-chat sessions and process wiring.
pub mod config;
pub mod liveness;
pub mod logging;
mod orchestrator;
pub mod platform;
mod sessions;
mod transport;

pub use orchestrator::Orchestrator;
pub use sessions::SessionStore;
pub use transport::{ChatKey, ChatTransport, MessageKey, TransportError};
