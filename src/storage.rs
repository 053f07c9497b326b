//! Document store access.
//!
//! The probe talks to the store through [`DocumentStore`]. A connected store
//! is held by a [`Session`], which guarantees the store is disconnected
//! exactly once, on every exit path:
//!
//! ```text
//! connect ──▶ Session ──▶ insert / find_one / count ──▶ close (or drop)
//! ```

#[cfg(test)]
pub mod memory;
mod mongo;

use mongodb::bson::Document;

use crate::error::{ProbeError, Result};

pub use mongo::MongoStore;

/// A connected document store.
pub trait DocumentStore {
    /// Writes one document. Returns the identifier the store generated.
    fn insert(&mut self, collection: &str, document: Document) -> Result<String>;

    /// Returns at most one document matching `filter`.
    ///
    /// Which document wins when several match is up to the store.
    fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>>;

    /// Counts documents matching `filter`. An empty filter counts everything.
    fn count(&self, collection: &str, filter: Document) -> Result<u64>;

    /// Releases the connection.
    fn disconnect(self);
}

/// Scoped ownership of a connected store.
pub struct Session<S: DocumentStore> {
    store: Option<S>,
}

impl<S: DocumentStore> Session<S> {
    /// Takes ownership of a connected store.
    pub fn new(store: S) -> Self {
        Self { store: Some(store) }
    }

    /// Returns the held store, or a connection error once closed.
    pub fn store(&mut self) -> Result<&mut S> {
        self.store
            .as_mut()
            .ok_or_else(|| ProbeError::Connection("session is closed".into()))
    }

    /// Disconnects the held store. Returns whether a store was released.
    ///
    /// Calling this again, or on an empty session, does nothing.
    pub fn close(&mut self) -> bool {
        match self.store.take() {
            Some(store) => {
                tracing::debug!("disconnecting");
                store.disconnect();
                true
            }
            None => false,
        }
    }
}

impl<S: DocumentStore> Drop for Session<S> {
    fn drop(&mut self) {
        self.close();
    }
}
