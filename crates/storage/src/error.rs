/// All errors a `BreakdownStore` implementation can return.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The breakdown could not be canonicalized for storage or digesting.
    #[error("breakdown serialization failed: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// A backend-specific storage error (connection, IO, constraint).
    #[error("storage backend error: {message}")]
    Backend { message: String },
}
