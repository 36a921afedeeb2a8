//! Route handlers for the board API.

pub mod children;
pub mod tasks;
pub mod views;
