use tracing::{error, info, warn};

use tracing_mongo_hook::env::MongoConfig;
use tracing_mongo_hook::init::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) Point LOG_SINK_MONGODB_URL / _DB / _COLLECTION at your instance,
    //    or rely on the defaults (mongodb://127.0.0.1:27017, logs.entries).
    let config = MongoConfig::from_env();

    // 2) Connect and install the hook as the global subscriber.
    let hooker = config.connect()?;
    init_tracing(hooker)?;

    // 3) Every event from debug up is inserted before the macro returns,
    //    even from inside this async runtime.
    info!("service started");
    warn!(queue_depth = 812, "queue is filling up");

    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
    error!(error = &err as &(dyn std::error::Error + 'static), order_id = 123, "order failed");

    Ok(())
}
