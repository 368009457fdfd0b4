//! regserve - HTTP lookup over semicolon-delimited vehicle registry extracts
//!
//! The service loads one or more registry extract files at startup, indexes
//! every row by its registration number (`N_REG_NEW`), and answers lookups
//! over HTTP with permissive CORS headers for the configured frontend.
//!
//! The interesting part lives in [`index`]: a small, synchronous,
//! HTTP-agnostic library that parses semicolon-delimited text, keys rows by
//! registration number, and merges multiple files into one aggregate index
//! (one record per source file per number). Everything else is a thin axum
//! facade around it.
//!
//! # Endpoints
//!
//! - `GET /` - service info
//! - `GET /health` - liveness probe with index stats
//! - `GET /admin/version` - crate version
//! - `GET /search?tname=<table>&snumber=<registration>` - record lookup
//!
//! # Quick start
//!
//! ```rust,no_run
//! use regserve::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     regserve::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use index::{AggregateIndex, IndexError, PerFileIndex, Record, REGISTRATION_FIELD};
pub use server::{build_router, start_server};
pub use state::ServerState;
