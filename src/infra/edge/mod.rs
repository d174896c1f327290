//! Edge purge client boundary: the trait the dispatcher talks to and the
//! concrete adapter for the remote API.

mod sign;
mod teo;

pub use teo::TeoEdgeClient;

use async_trait::async_trait;

use crate::domain::error::PurgeError;
use crate::domain::purge::PurgeReceipt;

/// The three purge operations, abstracted from the concrete vendor API so
/// tests and degraded deployments can substitute another adapter.
#[async_trait]
pub trait EdgePurgeClient: Send + Sync {
    /// Purge individual URLs. Fails with [`PurgeError::EmptyTarget`] when no
    /// usable URL remains after filtering and deduplication.
    async fn purge_urls(&self, urls: Vec<String>) -> Result<PurgeReceipt, PurgeError>;

    /// Purge whole hostnames with the `invalidate` method.
    async fn purge_hosts(&self, hosts: Vec<String>) -> Result<PurgeReceipt, PurgeError>;

    /// Purge the entire zone with the `invalidate` method.
    async fn purge_all(&self) -> Result<PurgeReceipt, PurgeError>;
}

/// Stand-in used when no usable adapter could be built at startup; every
/// operation reports the reason instead of reaching for the network.
pub struct UnavailableClient {
    reason: String,
}

impl UnavailableClient {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl EdgePurgeClient for UnavailableClient {
    async fn purge_urls(&self, _urls: Vec<String>) -> Result<PurgeReceipt, PurgeError> {
        Err(PurgeError::unavailable(self.reason.clone()))
    }

    async fn purge_hosts(&self, _hosts: Vec<String>) -> Result<PurgeReceipt, PurgeError> {
        Err(PurgeError::unavailable(self.reason.clone()))
    }

    async fn purge_all(&self) -> Result<PurgeReceipt, PurgeError> {
        Err(PurgeError::unavailable(self.reason.clone()))
    }
}
