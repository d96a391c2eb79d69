use crate::sink::DocumentSink;
use mongodb::bson::Document;
use std::error::Error;

/// A sink that simply drops all documents.
///
/// Useful for measuring the overhead of the hook and dispatch layer
/// without any network I/O.
#[derive(Clone, Default)]
pub struct NoopSink;

impl DocumentSink for NoopSink {
    fn insert(&self, _document: Document) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
