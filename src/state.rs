use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::index::{aggregate_files, AggregateIndex, Record};

/// Shared application state.
///
/// The aggregate index is built once at startup from the configured extract
/// files and never mutated afterwards, so requests share it without locking.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Registration number → one record per source file.
    index: Arc<AggregateIndex>,
}

impl ServerState {
    /// Create new server state, loading every configured extract.
    ///
    /// A failure in any extract is fatal; the server refuses to start on a
    /// partial index.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let index = aggregate_files(&config.data_files)?;

        tracing::info!(
            files = config.data_files.len(),
            registrations = index.len(),
            "registry index loaded"
        );

        Ok(Self {
            config: Arc::new(config),
            index: Arc::new(index),
        })
    }

    /// Records known for a registration number, in source-file order.
    pub fn lookup(&self, registration: &str) -> &[Record] {
        self.index
            .get(registration)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct registration numbers in the index.
    pub fn registrations(&self) -> usize {
        self.index.len()
    }
}
