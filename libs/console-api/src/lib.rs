//! Leasing console API client
//!
//! This crate provides the client contract the session core depends on:
//! - `ConsoleApi` trait (identity, scopes, permissions, approvals badge)
//! - Wire models (`MeResponse`, `AvailableScopesResponse`, ...)
//! - Error type (`ApiError`)
//! - `HttpConsoleApi`, the `reqwest` implementation backed by the session store
//!
//! ```ignore
//! let api = HttpConsoleApi::new(&config.api, store.clone())?;
//! let me = api.get_me().await?;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod models;

pub use api::ConsoleApi;
pub use config::ApiConfig;
pub use errors::ApiError;
pub use http::HttpConsoleApi;
pub use models::{AvailableScopesResponse, LoginResponse, MeResponse};
