//! Blocking bridge between the synchronous hook contract and the async
//! MongoDB driver.
//!
//! Driver futures always run on a small private runtime owned by this
//! crate, so `fire` can be called from plain threads as well as from
//! inside a caller's Tokio runtime of either flavor.

use std::future::Future;
use std::io;
use std::sync::{mpsc, OnceLock};
use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

static RUNTIME: OnceLock<io::Result<Runtime>> = OnceLock::new();

/// The process-wide runtime driver futures and client background tasks
/// live on. Built on first use.
pub(crate) fn runtime() -> io::Result<&'static Runtime> {
    let built = RUNTIME.get_or_init(|| {
        Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("mongo-hook")
            .enable_all()
            .build()
    });

    match built {
        Ok(runtime) => Ok(runtime),
        Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
    }
}

/// Run `future` to completion on the private runtime and block the calling
/// thread until it finishes.
///
/// Inside a multi-thread runtime the wait goes through `block_in_place`
/// so the caller's other tasks keep running. A current-thread runtime is
/// simply parked for the duration of the call.
pub(crate) fn block_on<F>(future: F) -> io::Result<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let runtime = runtime()?;

    let caller = match Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => return Ok(runtime.block_on(future)),
    };

    // `Runtime::block_on` panics inside another runtime's context, so hand
    // the future over and wait on a std channel instead.
    let (tx, rx) = mpsc::sync_channel(1);
    runtime.spawn(async move {
        let _ = tx.send(future.await);
    });

    let wait = move || {
        rx.recv().map_err(|_| {
            io::Error::new(io::ErrorKind::Other, "mongodb task ended without a result")
        })
    };

    if caller.runtime_flavor() == RuntimeFlavor::MultiThread {
        tokio::task::block_in_place(wait)
    } else {
        wait()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_outside_any_runtime() {
        assert_eq!(block_on(async { 40 + 2 }).unwrap(), 42);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn runs_inside_a_current_thread_runtime() {
        assert_eq!(block_on(async { "ok" }).unwrap(), "ok");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn runs_inside_a_multi_thread_runtime() {
        let value = block_on(async {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            7
        })
        .unwrap();
        assert_eq!(value, 7);
    }
}
