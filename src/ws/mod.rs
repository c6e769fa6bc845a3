//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams fleet events to dashboards,
//! filtered per connection by vehicle-id subscriptions.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
