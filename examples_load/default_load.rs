use std::time::Instant;
use tracing::error;

use tracing_mongo_hook::hooker::Hooker;
use tracing_mongo_hook::init::init_tracing;
use tracing_mongo_hook::noop_sink::NoopSink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(Hooker::with_sink(NoopSink))?;

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "default load test error");
    }

    let elapsed = start.elapsed();
    println!("default config: fired {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
