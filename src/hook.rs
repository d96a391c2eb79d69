use crate::record::{Entry, Level};
use std::error::Error;

/// Receiver of log [`Entry`]s registered with the logging host.
///
/// The host asks [`levels`](Hook::levels) which severities the hook wants
/// and calls [`fire`](Hook::fire) synchronously, on the emitting thread,
/// for every matching entry. Errors are returned to the host; what happens
/// to them is the host's decision.
pub trait Hook: Send + Sync {
    /// Severities this hook wants to receive.
    fn levels(&self) -> &[Level];

    /// Handle a single entry.
    fn fire(&self, entry: &Entry) -> Result<(), Box<dyn Error + Send + Sync>>;
}
