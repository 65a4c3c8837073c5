// WebSocket connection handling and wire messages

pub mod manager;
pub mod protocol;

pub use manager::ConnectionManager;
pub use protocol::{LiveDataMessage, LIVE_DATA};
