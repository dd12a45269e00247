//! In-memory reference store.
//!
//! Keeps one table of plain rows per record type behind an async `RwLock`.
//! Clones share the same tables, so a store can be handed to an adapter and
//! inspected from tests at the same time. There is no query language:
//! criteria match by per-key equality, and raw queries are unsupported.

use crate::error::{StoreError, StoreResult};
use crate::store::{ModelMapper, QueryOptions, QueryOutput, RecordHandle, StoreConnection};
use async_trait::async_trait;
use sievedb_model::{ModelSchema, PropertyMap};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared in-memory store, clonable across tasks.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, Vec<PropertyMap>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a mapper bound to `schema`, sharing this store's tables.
    pub fn mapper(&self, schema: ModelSchema) -> MemoryMapper {
        MemoryMapper {
            store: self.clone(),
            schema,
        }
    }

    /// Returns a snapshot of the rows stored for `record_type`.
    pub async fn rows(&self, record_type: &str) -> Vec<PropertyMap> {
        self.tables
            .read()
            .await
            .get(record_type)
            .cloned()
            .unwrap_or_default()
    }
}

/// A record matches when every criteria pair equals its value for that key.
fn matches(record: &PropertyMap, criteria: &PropertyMap) -> bool {
    criteria.iter().all(|(key, value)| record.get(key) == Some(value))
}

#[async_trait]
impl StoreConnection for MemoryStore {
    async fn raw_query(
        &self,
        query: &str,
        _schema: &ModelSchema,
        _options: QueryOptions,
        _params: &PropertyMap,
    ) -> StoreResult<QueryOutput> {
        Err(StoreError::Unsupported(format!(
            "memory store has no query language: {query}"
        )))
    }
}

/// Mapper over one record type in a [`MemoryStore`].
pub struct MemoryMapper {
    store: MemoryStore,
    schema: ModelSchema,
}

/// A row handed back by [`MemoryMapper`].
pub struct MemoryRecord {
    data: PropertyMap,
}

impl RecordHandle for MemoryRecord {
    fn data_values(&self) -> &PropertyMap {
        &self.data
    }

    fn into_data_values(self) -> PropertyMap {
        self.data
    }
}

#[async_trait]
impl ModelMapper for MemoryMapper {
    type Handle = MemoryRecord;

    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    async fn find_all(&self, criteria: &PropertyMap) -> StoreResult<Vec<MemoryRecord>> {
        let tables = self.store.tables.read().await;
        let rows = tables.get(&self.schema.record_type);
        Ok(rows
            .into_iter()
            .flatten()
            .filter(|row| matches(row, criteria))
            .map(|row| MemoryRecord { data: row.clone() })
            .collect())
    }

    async fn destroy(&self, criteria: &PropertyMap) -> StoreResult<()> {
        let mut tables = self.store.tables.write().await;
        if let Some(rows) = tables.get_mut(&self.schema.record_type) {
            rows.retain(|row| !matches(row, criteria));
        }
        Ok(())
    }

    async fn persist(&self, attributes: &PropertyMap) -> StoreResult<MemoryRecord> {
        let mut tables = self.store.tables.write().await;
        tables
            .entry(self.schema.record_type.clone())
            .or_default()
            .push(attributes.clone());
        Ok(MemoryRecord {
            data: attributes.clone(),
        })
    }

    async fn update(&self, attributes: &PropertyMap, criteria: &PropertyMap) -> StoreResult<()> {
        let mut tables = self.store.tables.write().await;
        if let Some(rows) = tables.get_mut(&self.schema.record_type) {
            for row in rows.iter_mut() {
                if !matches(row, criteria) {
                    continue;
                }
                for (key, value) in attributes {
                    row.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }
}
