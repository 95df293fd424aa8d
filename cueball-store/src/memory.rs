//! In-memory document store
//!
//! Holds every match as a JSON document, the way the remote store does, so
//! the record layer is exercised end to end without a backend.
//! Thread-safe using RwLock for concurrent access.

use std::sync::RwLock;

use async_trait::async_trait;
use cueball_codec::{turn_key, MatchRecord, TurnRecord};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::repository::{MatchField, MatchFilter, MatchStore};

const TURNS_FIELD: &str = "turns";

/// Stored document with its id
struct Document {
    id: String,
    body: Value,
}

/// In-memory store for testing and local runs
pub struct MemoryStore {
    /// Documents in insertion order
    documents: RwLock<Vec<Document>>,
    /// Whether to simulate a connection failure
    fail_next: RwLock<bool>,
}

impl MemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            fail_next: RwLock::new(false),
        }
    }

    /// Get the number of stored matches
    pub fn match_count(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    /// Raw document of a match, as stored
    pub fn document(&self, id: &str) -> Option<Value> {
        let documents = self.documents.read().unwrap();
        documents.iter().find(|d| d.id == id).map(|d| d.body.clone())
    }

    /// Store a raw document as-is (e.g. data written by an older client).
    pub fn insert_document(&self, id: impl Into<String>, body: Value) {
        self.documents.write().unwrap().push(Document { id: id.into(), body });
    }

    /// Clear all data (useful for test setup)
    pub fn clear(&self) {
        self.documents.write().unwrap().clear();
    }

    /// Configure the next operation to fail with a connection error.
    pub fn set_fail_next(&self, fail: bool) {
        *self.fail_next.write().unwrap() = fail;
    }

    /// Check if we should fail the next operation.
    fn check_available(&self) -> StoreResult<()> {
        let mut fail_next = self.fail_next.write().unwrap();
        let fail = *fail_next;
        *fail_next = false; // Reset after check
        if fail {
            return Err(StoreError::Connection("simulated connection failure".to_string()));
        }
        Ok(())
    }

    /// Run `f` on the mutable body of a match.
    fn with_document<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Map<String, Value>) -> StoreResult<R>,
    ) -> StoreResult<R> {
        let mut documents = self.documents.write().unwrap();
        let document = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found("match", id))?;
        let body = document
            .body
            .as_object_mut()
            .ok_or_else(|| StoreError::Deserialization(format!("match {} is not an object", id)))?;
        f(body)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(id: &str, body: &Value) -> StoreResult<MatchRecord> {
    serde_json::from_value(body.clone())
        .map_err(|e| StoreError::Deserialization(format!("match {}: {}", id, e)))
}

fn turns_of<'a>(id: &str, body: &'a mut Map<String, Value>) -> StoreResult<&'a mut Map<String, Value>> {
    body.entry(TURNS_FIELD)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| StoreError::Deserialization(format!("turns of match {} are not a map", id)))
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn fetch_one(&self, id: &str) -> StoreResult<MatchRecord> {
        self.check_available()?;
        let documents = self.documents.read().unwrap();
        let document = documents
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found("match", id))?;
        debug!(match_id = %id, "Match fetched");
        decode(id, &document.body)
    }

    async fn fetch_many(&self, filter: &MatchFilter) -> StoreResult<Vec<MatchRecord>> {
        self.check_available()?;
        let documents = self.documents.read().unwrap();
        let mut records = Vec::new();
        for document in documents.iter() {
            let record = decode(&document.id, &document.body)?;
            if filter.matches(&record) {
                records.push(record);
            }
        }
        debug!(count = records.len(), "Matches fetched");
        Ok(records)
    }

    async fn insert(&self, record: &MatchRecord) -> StoreResult<()> {
        self.check_available()?;
        let body = serde_json::to_value(record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut documents = self.documents.write().unwrap();
        if documents.iter().any(|d| d.id == record.match_id) {
            return Err(StoreError::duplicate("match", &record.match_id));
        }
        documents.push(Document {
            id: record.match_id.clone(),
            body,
        });

        info!(match_id = %record.match_id, turns = record.turns.len(), "Match inserted");
        Ok(())
    }

    async fn append_turn(&self, match_id: &str, turn: &TurnRecord) -> StoreResult<String> {
        self.check_available()?;
        let value = serde_json::to_value(turn).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let key = self.with_document(match_id, |body| {
            let turns = turns_of(match_id, body)?;
            let mut index = turns.len();
            while turns.contains_key(&turn_key(index)) {
                index += 1;
            }
            let key = turn_key(index);
            turns.insert(key.clone(), value);
            Ok(key)
        })?;

        info!(match_id = %match_id, key = %key, "Turn appended");
        Ok(key)
    }

    async fn remove_last_turn(&self, match_id: &str) -> StoreResult<()> {
        self.check_available()?;
        let removed = self.with_document(match_id, |body| {
            let turns = turns_of(match_id, body)?;
            let last = turns.keys().last().cloned();
            if let Some(key) = &last {
                turns.remove(key);
            }
            Ok(last)
        })?;

        match removed {
            Some(key) => info!(match_id = %match_id, key = %key, "Last turn removed"),
            None => debug!(match_id = %match_id, "No turn to remove"),
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        self.check_available()?;
        let mut documents = self.documents.write().unwrap();
        let index = documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found("match", id))?;
        documents.remove(index);

        info!(match_id = %id, "Match removed");
        Ok(())
    }

    async fn update_field(&self, id: &str, field: MatchField, value: &str) -> StoreResult<()> {
        self.check_available()?;
        self.with_document(id, |body| {
            body.insert(field.as_str().to_string(), Value::String(value.to_string()));
            Ok(())
        })?;

        info!(match_id = %id, field = %field, "Match field updated");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
