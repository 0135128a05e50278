//! redlink - a Redis-backed URL shortener.
//!
//! Short codes are random 8-character strings over `[a-zA-Z0-9]`, kept as
//! fields of a single Redis hash. The [`services::LinkStore`] owns the
//! mapping; everything else is configuration and an axum adapter around it.

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod kv;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
