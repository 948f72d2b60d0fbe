//! HTTP and WebSocket handlers.

pub mod documents;
pub mod flights;
pub mod health;
pub mod movements;
pub mod passengers;
pub mod websocket;
