//! QuickStart API: an axum service guarded by a shared-secret bearer scheme.
//!
//! The interesting part lives in [`services::auth`]; everything else is the HTTP
//! glue that feeds it the `Authorization` header and turns its verdict into a response.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
