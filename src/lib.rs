//! Character catalog client with a persisted favorites store.
//!
//! - [`favorites`]: reducer-driven favorites collection synchronized to
//!   durable storage
//! - [`catalog`]: pagination, filters and search over the remote API
//! - [`api`]: HTTP client for the catalog
//! - [`storage`]: async key-value backends
//! - [`telemetry`]: bounded in-memory event log

pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod favorites;
pub mod logging;
pub mod mvi;
pub mod storage;
pub mod telemetry;
