use crate::hook::Hook;
use crate::record::{Entry, Level, ERROR_KEY};
use crate::runtime;
use crate::sink::DocumentSink;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::options::{ClientOptions, Tls};
use mongodb::{Client, Collection};
use std::error::Error;

/// Severities the [`Hooker`] asks the host for. `Trace` is left out.
pub const SUPPORTED_LEVELS: [Level; 6] = [
    Level::Panic,
    Level::Fatal,
    Level::Error,
    Level::Warn,
    Level::Info,
    Level::Debug,
];

/// Error type returned by [`Hooker`] construction and delivery.
#[derive(thiserror::Error, Debug)]
pub enum HookError {
    /// The initial connection could not be established.
    #[error(transparent)]
    Connection(#[from] mongodb::error::Error),

    /// The private runtime that drives the client could not be started.
    #[error("failed to start the mongodb runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// The insert for one entry failed. The hook stays usable.
    #[error("failed to send log entry to mongodb: {0}")]
    Delivery(#[source] Box<dyn Error + Send + Sync>),
}

/// [`Hook`] that inserts every entry it receives as one document into a
/// MongoDB collection.
///
/// The collection handle is set once at construction and only read
/// afterwards, so a `Hooker` can be fired from many threads at once.
/// Calls block the current thread but are safe from inside a Tokio
/// runtime: the driver itself runs on a private runtime.
pub struct Hooker<S = Collection<Document>> {
    sink: S,
}

impl Hooker {
    /// Connect to `url` without authentication or TLS and target
    /// `database.collection`.
    ///
    /// Credentials and TLS settings present in `url` are ignored. The
    /// server is pinged before returning, so an unreachable address fails
    /// here with [`HookError::Connection`] rather than on the first insert.
    /// Blocks until the handshake completes or server selection times out.
    pub fn new(url: &str, database: &str, collection: &str) -> Result<Self, HookError> {
        let url = url.to_string();
        let mut options = runtime::block_on(async move { ClientOptions::parse(url).await })??;
        options.credential = None;
        options.tls = Some(Tls::Disabled);
        Self::with_options(options, database, collection)
    }

    /// Same as [`Hooker::new`], but the caller keeps full control of the
    /// client options (credentials, TLS, timeouts, pool sizes).
    pub fn with_options(
        options: ClientOptions,
        database: &str,
        collection: &str,
    ) -> Result<Self, HookError> {
        // Background monitors are spawned on whichever runtime is current.
        let client = {
            let _guard = runtime::runtime()?.enter();
            Client::with_options(options)?
        };

        let admin = client.database("admin");
        runtime::block_on(async move { admin.run_command(doc! { "ping": 1 }).await })??;
        Ok(Self::from_client(&client, database, collection))
    }

    /// Build a hook on top of a client owned elsewhere.
    ///
    /// The handle is cloned, so dropping or reusing the original `client`
    /// does not affect the hook. The driver connects lazily; any
    /// connection problem shows up as a delivery error on `fire`.
    ///
    /// The client's background tasks stay on the runtime it was created
    /// on. If that is a current-thread runtime, `fire` from its own thread
    /// parks those tasks and the insert can only time out; prefer
    /// [`Hooker::new`] there.
    pub fn from_client(client: &Client, database: &str, collection: &str) -> Self {
        let collection = client
            .clone()
            .database(database)
            .collection::<Document>(collection);
        Hooker { sink: collection }
    }
}

impl<S> Hooker<S> {
    /// Wrap any [`DocumentSink`] instead of a MongoDB collection.
    pub fn with_sink(sink: S) -> Self {
        Hooker { sink }
    }

    /// Access the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Translate an entry into the document that gets stored.
    ///
    /// All fields are copied first; `Level`, `Time` and `Message` are then
    /// written from the entry itself and override same-named fields. An
    /// error value under [`ERROR_KEY`] is replaced by its description.
    ///
    /// `Level` is stored as the level's name (`"error"`, `"warning"`, ...),
    /// not as a numeric ordinal, so these documents do not match queries
    /// written against stores that keep the level as a number.
    pub fn document(entry: &Entry) -> Document {
        let mut document = Document::new();

        for (key, value) in &entry.fields {
            let bson = match value.as_error() {
                Some(err) if key == ERROR_KEY => Bson::String(err.to_string()),
                _ => value.to_bson(),
            };
            document.insert(key.clone(), bson);
        }

        document.insert("Level", entry.level.as_str());
        document.insert(
            "Time",
            bson::DateTime::from_millis(entry.time.timestamp_millis()),
        );
        document.insert("Message", entry.message.as_str());
        document
    }

    /// Severities this hook handles, most severe first.
    pub fn levels(&self) -> &'static [Level] {
        &SUPPORTED_LEVELS
    }
}

impl<S: DocumentSink> Hooker<S> {
    /// Insert `entry` as one document.
    ///
    /// **Returns**
    /// - `Ok(())` once the store acknowledged the insert.
    /// - `Err(HookError::Delivery(..))` wrapping the store's error.
    ///
    /// Blocks for the whole round-trip. Nothing is retried or logged.
    pub fn fire(&self, entry: &Entry) -> Result<(), HookError> {
        self.sink
            .insert(Self::document(entry))
            .map_err(HookError::Delivery)
    }
}

impl<S: DocumentSink> Hook for Hooker<S> {
    fn levels(&self) -> &[Level] {
        &SUPPORTED_LEVELS
    }

    fn fire(&self, entry: &Entry) -> Result<(), Box<dyn Error + Send + Sync>> {
        Hooker::fire(self, entry).map_err(Into::into)
    }
}
