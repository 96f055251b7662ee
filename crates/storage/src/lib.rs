//! Persistence boundary for valuation breakdowns.
//!
//! The engine computes; this crate defines how its output is kept. A
//! breakdown is stored as a point-in-time snapshot record that is
//! superseded by later evaluations, never mutated. Records carry a
//! SHA-256 digest of the breakdown's canonical JSON so backends and
//! collaborators can detect an unchanged re-evaluation without comparing
//! whole documents.
//!
//! No backend lives here beyond the in-memory reference implementation;
//! real backends implement [`BreakdownStore`] and verify themselves with
//! the [`conformance`] suite.

pub mod canonical;
pub mod conformance;
mod error;
mod memory;
mod record;
mod traits;

pub use canonical::{canonical_json, digest_hex};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{now_rfc3339, BatchRunRecord, BreakdownRecord};
pub use traits::BreakdownStore;
