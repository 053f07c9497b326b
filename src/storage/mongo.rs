//! MongoDB-backed store using the driver's blocking API.

use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{Error, ErrorKind};
use mongodb::sync::{Client, Database};

use crate::error::{ProbeError, Result};
use crate::target::Target;

use super::DocumentStore;

/// A live connection to one MongoDB database.
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connects to the target database.
    ///
    /// The driver connects lazily, so a `ping` is issued to surface an
    /// unreachable endpoint or rejected credentials here rather than on the
    /// first write.
    pub fn connect(target: &Target) -> Result<Self> {
        tracing::debug!(
            uri = %target.redacted_uri(),
            database = %target.database,
            "connecting"
        );

        let client = Client::with_uri_str(&target.uri)
            .map_err(|e| ProbeError::Connection(e.to_string()))?;
        let database = client.database(&target.database);

        database
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| ProbeError::Connection(e.to_string()))?;

        tracing::info!(database = %target.database, "connected");
        Ok(Self { client, database })
    }
}

impl DocumentStore for MongoStore {
    fn insert(&mut self, collection: &str, document: Document) -> Result<String> {
        tracing::debug!(collection, "inserting document");
        let result = self
            .database
            .collection::<Document>(collection)
            .insert_one(document)
            .run()
            .map_err(|e| classify(&e, ProbeError::Write))?;
        Ok(render_id(&result.inserted_id))
    }

    fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>> {
        tracing::debug!(collection, %filter, "finding document");
        self.database
            .collection::<Document>(collection)
            .find_one(filter)
            .run()
            .map_err(|e| classify(&e, ProbeError::Query))
    }

    fn count(&self, collection: &str, filter: Document) -> Result<u64> {
        tracing::debug!(collection, %filter, "counting documents");
        self.database
            .collection::<Document>(collection)
            .count_documents(filter)
            .run()
            .map_err(|e| classify(&e, ProbeError::Query))
    }

    fn disconnect(self) {
        // Shutdown waits for outstanding handles, so the database goes first.
        drop(self.database);
        self.client.shutdown().run();
        tracing::info!("disconnected");
    }
}

/// Maps a driver error to the kind of the step it occurred in, except for
/// failures that have nothing to do with the transport.
fn classify(err: &Error, step: fn(String) -> ProbeError) -> ProbeError {
    match err.kind.as_ref() {
        ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
            ProbeError::Other(err.to_string())
        }
        _ => step(err.to_string()),
    }
}

/// Renders a generated identifier: hex for ObjectIds, display form otherwise.
fn render_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
