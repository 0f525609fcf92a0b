//! Request extractors shared by the HTTP and WebSocket surfaces.

pub mod auth;
