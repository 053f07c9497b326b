//! In-process document store for tests.
//!
//! Keeps documents per collection in insertion order, matches filters by
//! top-level field equality, and can be told to fail a given step.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use mongodb::bson::{Document, oid::ObjectId};

use crate::error::{ProbeError, Result};

use super::DocumentStore;

/// Which step an injected failure hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Insert,
    /// Acknowledges the insert without storing the document.
    LoseWrite,
    Find,
    Count,
}

#[derive(Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
    fail: Option<FailPoint>,
    /// Number of calls that reached `count` before the injected failure fires.
    fail_after: usize,
    count_calls: Cell<usize>,
    disconnects: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the given step with the kind the real store would report.
    pub fn failing(point: FailPoint) -> Self {
        Self {
            fail: Some(point),
            ..Self::default()
        }
    }

    /// Fails the `n`th count call onward (zero-based).
    pub fn failing_count_after(n: usize) -> Self {
        Self {
            fail: Some(FailPoint::Count),
            fail_after: n,
            ..Self::default()
        }
    }

    /// Shared counter of `disconnect` calls, readable after the store moves.
    pub fn disconnects(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.disconnects)
    }

    /// Seeds a collection without going through `insert`.
    pub fn with_documents(mut self, collection: &str, documents: Vec<Document>) -> Self {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        self
    }

    fn documents(&self, collection: &str) -> &[Document] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

impl DocumentStore for MemoryStore {
    fn insert(&mut self, collection: &str, mut document: Document) -> Result<String> {
        if self.fail == Some(FailPoint::Insert) {
            return Err(ProbeError::Write("connection reset mid-write".into()));
        }
        let id = ObjectId::new();
        if self.fail == Some(FailPoint::LoseWrite) {
            return Ok(id.to_hex());
        }
        document.insert("_id", id);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id.to_hex())
    }

    fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>> {
        if self.fail == Some(FailPoint::Find) {
            return Err(ProbeError::Query("connection reset during find".into()));
        }
        Ok(self
            .documents(collection)
            .iter()
            .find(|d| matches(d, &filter))
            .cloned())
    }

    fn count(&self, collection: &str, filter: Document) -> Result<u64> {
        let call = self.count_calls.get();
        self.count_calls.set(call + 1);
        if self.fail == Some(FailPoint::Count) && call >= self.fail_after {
            return Err(ProbeError::Query("connection reset during count".into()));
        }
        let n = self
            .documents(collection)
            .iter()
            .filter(|d| matches(d, &filter))
            .count();
        Ok(n as u64)
    }

    fn disconnect(self) {
        self.disconnects.set(self.disconnects.get() + 1);
    }
}
