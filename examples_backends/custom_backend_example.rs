use std::error::Error;

use mongodb::bson::Document;
use tracing::{error, info};
use tracing_mongo_hook::{hooker::Hooker, init::init_tracing, sink::DocumentSink};

/// Example of routing the documents somewhere other than MongoDB by
/// implementing the `DocumentSink` trait directly. Here we just print
/// each document as relaxed extended JSON.
struct StdoutSink;

impl DocumentSink for StdoutSink {
    fn insert(&self, document: Document) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("[stdout-sink] {}", document);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing(Hooker::with_sink(StdoutSink))?;

    info!("custom backend example started");
    error!(db = "stdout", "simulated error sent via custom backend");
    Ok(())
}
