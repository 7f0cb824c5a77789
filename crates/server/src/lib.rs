//! Taboor server library.
//!
//! This crate provides the queue-management service as a library,
//! allowing the router to be mounted in integration tests and reused
//! by the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;
