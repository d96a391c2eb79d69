//! Environment variable names for configuring a [`Hooker`] from a
//! service's environment.
//!
//! These are purely helpers; [`Hooker`] itself never reads the
//! environment.

use crate::hooker::{HookError, Hooker};

/// MongoDB connection string, e.g. `mongodb://127.0.0.1:27017`.
pub const LOG_SINK_MONGODB_URL_ENV: &str = "LOG_SINK_MONGODB_URL";

/// Target database name.
pub const LOG_SINK_MONGODB_DB_ENV: &str = "LOG_SINK_MONGODB_DB";

/// Target collection name.
pub const LOG_SINK_MONGODB_COLLECTION_ENV: &str = "LOG_SINK_MONGODB_COLLECTION";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Arguments for [`Hooker::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoConfig {
    pub url: String,
    pub database: String,
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://127.0.0.1:27017".to_string(),
            database: "logs".to_string(),
            collection: "entries".to_string(),
        }
    }
}

impl MongoConfig {
    /// Read the `LOG_SINK_MONGODB_*` variables, using [`Default`] values
    /// for any that are unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or(LOG_SINK_MONGODB_URL_ENV, &defaults.url),
            database: env_or(LOG_SINK_MONGODB_DB_ENV, &defaults.database),
            collection: env_or(LOG_SINK_MONGODB_COLLECTION_ENV, &defaults.collection),
        }
    }

    /// Connect with [`Hooker::new`].
    pub fn connect(&self) -> Result<Hooker, HookError> {
        Hooker::new(&self.url, &self.database, &self.collection)
    }
}
