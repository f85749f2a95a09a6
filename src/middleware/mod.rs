/*
 * Responsibility
 * - Public surface of the middleware layers (each exposes `apply(...)`)
 */
pub mod auth;
pub mod http;
pub mod security_headers;
