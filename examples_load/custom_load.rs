use std::time::Instant;
use tracing::error;

use tracing_mongo_hook::hooker::Hooker;
use tracing_mongo_hook::init::{init_tracing_with_config, LayerConfig};
use tracing_mongo_hook::noop_sink::NoopSink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Without the stdout layer only the hook itself is measured.
    let layer_config = LayerConfig { enable_stdout: false };

    init_tracing_with_config(Hooker::with_sink(NoopSink), layer_config)?;

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "custom load test error");
    }

    let elapsed = start.elapsed();
    println!("custom config: fired {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
