use crate::runtime;
use mongodb::bson::Document;
use std::error::Error;

/// Synchronous destination for the documents built by
/// [`Hooker`](crate::hooker::Hooker).
///
/// The production implementation is a MongoDB collection handle; other
/// implementations exist for load testing and for tests that need to
/// observe or fail inserts.
pub trait DocumentSink: Send + Sync {
    /// Insert a single document.
    ///
    /// **Parameters**
    /// - `document`: the fully-built document for one log entry.
    ///
    /// **Returns**
    /// - `Ok(())` once the backend acknowledged the insert.
    /// - `Err(..)` if the backend failed (network error, write error,
    ///   server selection timeout, etc.). Nothing is retried.
    ///
    /// This call blocks until the round-trip completes.
    fn insert(&self, document: Document) -> Result<(), Box<dyn Error + Send + Sync>>;
}

impl DocumentSink for mongodb::Collection<Document> {
    fn insert(&self, document: Document) -> Result<(), Box<dyn Error + Send + Sync>> {
        let collection = self.clone();
        runtime::block_on(async move { collection.insert_one(document).await })??;
        Ok(())
    }
}
