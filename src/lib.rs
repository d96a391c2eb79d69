pub mod record;
pub mod hook;
pub mod sink;
pub mod hooker;
pub mod layer;
mod runtime;

pub mod env;
pub mod init;
pub mod noop_sink;

pub use hook::Hook;
pub use hooker::{HookError, Hooker};
pub use record::{Entry, Level, Value, ERROR_KEY};
