//! Store collaborator contracts.
//!
//! The adapter treats its store as two opaque collaborators: a
//! [`StoreConnection`] that can execute raw queries, and a [`ModelMapper`]
//! bound to one model that handles find/destroy/persist/update. Rows come
//! back as [`RecordHandle`]s exposing their committed plain-data projection.
//! Any backend implementing these traits can sit behind the adapter.

use crate::error::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sievedb_model::{ModelSchema, PropertyMap};

/// Execution options for a raw query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Return plain rows instead of mapped record handles.
    pub raw: bool,
}

impl QueryOptions {
    /// Options requesting plain row output.
    pub fn raw() -> Self {
        Self { raw: true }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { raw: false }
    }
}

/// What a raw query produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// Row results.
    Rows(Vec<Value>),
    /// A single non-row value.
    Scalar(Value),
    /// The statement produced nothing.
    Empty,
}

impl QueryOutput {
    /// Returns the row results, or `None` for scalar or empty output.
    pub fn rows(self) -> Option<Vec<Value>> {
        match self {
            QueryOutput::Rows(rows) => Some(rows),
            QueryOutput::Scalar(_) | QueryOutput::Empty => None,
        }
    }
}

/// Raw query execution against a backing store.
#[async_trait]
pub trait StoreConnection: Send + Sync {
    /// Executes `query` against the store, bound to `schema`.
    ///
    /// `params` carries named parameters for the backend's placeholder
    /// syntax; names the query does not reference are ignored.
    async fn raw_query(
        &self,
        query: &str,
        schema: &ModelSchema,
        options: QueryOptions,
        params: &PropertyMap,
    ) -> StoreResult<QueryOutput>;
}

/// One persisted row handed back by a mapper.
pub trait RecordHandle: Send {
    /// The committed column values, excluding mapper bookkeeping state.
    fn data_values(&self) -> &PropertyMap;

    /// Consumes the handle, returning the committed column values.
    fn into_data_values(self) -> PropertyMap;
}

/// Mapper operations bound to one model.
#[async_trait]
pub trait ModelMapper: Send + Sync {
    /// The record handle type this mapper returns.
    type Handle: RecordHandle;

    /// The schema this mapper is bound to.
    fn schema(&self) -> &ModelSchema;

    /// Returns all records matching `criteria`.
    ///
    /// An empty criteria map matches every record.
    async fn find_all(&self, criteria: &PropertyMap) -> StoreResult<Vec<Self::Handle>>;

    /// Deletes every record matching `criteria`.
    async fn destroy(&self, criteria: &PropertyMap) -> StoreResult<()>;

    /// Builds and saves a new record from `attributes`.
    async fn persist(&self, attributes: &PropertyMap) -> StoreResult<Self::Handle>;

    /// Sets `attributes` on every record matching `criteria`.
    async fn update(&self, attributes: &PropertyMap, criteria: &PropertyMap) -> StoreResult<()>;
}
