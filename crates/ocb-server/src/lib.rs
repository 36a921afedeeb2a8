//! HTTP and WebSocket server for the OpenClaw Board task tracker.
//!
//! The binary in `main.rs` wires a [`Board`](ocb_core::Board) into the
//! router built here; the library split exists so integration tests can
//! drive the router directly.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod ws;

pub use routes::create_router;
