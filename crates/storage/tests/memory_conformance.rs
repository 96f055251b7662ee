//! Runs the backend conformance suite against the in-memory store.

use appraise_storage::conformance::run_conformance_suite;
use appraise_storage::MemoryStore;

#[tokio::test]
async fn memory_store_passes_the_conformance_suite() {
    let report = run_conformance_suite(|| async { MemoryStore::new() }).await;
    assert!(report.is_clean(), "{report}");
    assert!(report.total() > 0, "suite ran no tests");
    assert_eq!(report.passed(), report.total());
}
