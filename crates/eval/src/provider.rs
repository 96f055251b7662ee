//! The inbound listing boundary for batch work.
//!
//! The engine never reads persistence; batch callers hand it a provider
//! that resolves listing ids to already-loaded snapshots. A provider
//! failure for one id fails that id alone, never the batch.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use appraise_core::ListingSnapshot;

/// Resolves listing ids to evaluable snapshots.
///
/// ## Snapshot Semantics
///
/// `fetch` returns a point-in-time snapshot. Implementations backed by live
/// storage decide their own read-consistency; the engine only requires that
/// one returned snapshot is internally consistent.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync`; a batch run may call `fetch`
/// from its driver task while evaluations run on blocking threads.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    async fn fetch(&self, id: i64) -> Result<ListingSnapshot, ProviderError>;
}

/// Why a provider could not produce a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    NotFound { listing_id: i64 },
    Backend { message: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::NotFound { listing_id } => {
                write!(f, "listing {} not found", listing_id)
            }
            ProviderError::Backend { message } => {
                write!(f, "listing provider backend error: {}", message)
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// An in-memory provider over a fixed set of snapshots. The reference
/// implementation used by tests.
#[derive(Debug, Default)]
pub struct StaticListingProvider {
    listings: BTreeMap<i64, ListingSnapshot>,
}

impl StaticListingProvider {
    pub fn new(listings: Vec<ListingSnapshot>) -> Self {
        StaticListingProvider {
            listings: listings.into_iter().map(|l| (l.id, l)).collect(),
        }
    }
}

#[async_trait]
impl ListingProvider for StaticListingProvider {
    async fn fetch(&self, id: i64) -> Result<ListingSnapshot, ProviderError> {
        self.listings
            .get(&id)
            .cloned()
            .ok_or(ProviderError::NotFound { listing_id: id })
    }
}
