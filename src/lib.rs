// Configuration loading
pub mod config;

// Telemetry state store
pub mod state;

// Periodic snapshot fan-out
pub mod broadcast;

// HTTP and WebSocket APIs
pub mod api;

// WebSocket connection handling
pub mod subscription;
