//! WebSocket transport for lock events.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler that feeds socket frames into the lock registry.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
