//! Coffee shop drinks API.
//!
//! A small axum service exposing CRUD over drinks, with write and detail
//! routes gated by RS256 access tokens from an external identity provider.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
