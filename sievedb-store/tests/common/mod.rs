//! Shared test helpers for store tests.

#![allow(dead_code)]

use async_trait::async_trait;
use sievedb_model::{Attribute, ModelSchema, PropertyMap};
use sievedb_store::{
    ModelMapper, QueryOptions, QueryOutput, RecordHandle, StoreConnection, StoreError, StoreResult,
};
use std::sync::Mutex;

/// Schema declaring `{id, name}`, the shape most tests filter against.
pub fn person_schema() -> ModelSchema {
    ModelSchema::new(
        "person",
        vec![Attribute::integer("id"), Attribute::text("name")],
    )
}

/// Unwraps a `json!` literal into a `PropertyMap`.
pub fn props(value: serde_json::Value) -> PropertyMap {
    value
        .as_object()
        .cloned()
        .expect("fixture must be a JSON object")
}

/// Installs a test subscriber reading `RUST_LOG`, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A record handle wrapping a plain data map.
pub struct TestRecord {
    data: PropertyMap,
}

impl TestRecord {
    pub fn new(data: PropertyMap) -> Self {
        Self { data }
    }
}

impl RecordHandle for TestRecord {
    fn data_values(&self) -> &PropertyMap {
        &self.data
    }

    fn into_data_values(self) -> PropertyMap {
        self.data
    }
}

/// One delegated mapper call as the adapter issued it.
#[derive(Debug, Clone, PartialEq)]
pub enum MapperCall {
    FindAll(PropertyMap),
    Destroy(PropertyMap),
    Persist(PropertyMap),
    Update {
        attributes: PropertyMap,
        criteria: PropertyMap,
    },
}

/// Mapper double that records every call and serves configured rows,
/// or fails every operation with a fixed message.
pub struct RecordingMapper {
    schema: ModelSchema,
    rows: Vec<PropertyMap>,
    fail_with: Option<String>,
    calls: Mutex<Vec<MapperCall>>,
}

impl RecordingMapper {
    pub fn new(schema: ModelSchema) -> Self {
        Self::with_rows(schema, Vec::new())
    }

    pub fn with_rows(schema: ModelSchema, rows: Vec<PropertyMap>) -> Self {
        Self {
            schema,
            rows,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(schema: ModelSchema, message: &str) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            fail_with: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<MapperCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MapperCall) -> StoreResult<()> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(message) => Err(StoreError::Query(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ModelMapper for RecordingMapper {
    type Handle = TestRecord;

    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    async fn find_all(&self, criteria: &PropertyMap) -> StoreResult<Vec<TestRecord>> {
        self.record(MapperCall::FindAll(criteria.clone()))?;
        Ok(self.rows.iter().cloned().map(TestRecord::new).collect())
    }

    async fn destroy(&self, criteria: &PropertyMap) -> StoreResult<()> {
        self.record(MapperCall::Destroy(criteria.clone()))
    }

    async fn persist(&self, attributes: &PropertyMap) -> StoreResult<TestRecord> {
        self.record(MapperCall::Persist(attributes.clone()))?;
        Ok(TestRecord::new(attributes.clone()))
    }

    async fn update(&self, attributes: &PropertyMap, criteria: &PropertyMap) -> StoreResult<()> {
        self.record(MapperCall::Update {
            attributes: attributes.clone(),
            criteria: criteria.clone(),
        })
    }
}

/// One raw query call as the adapter issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionCall {
    pub query: String,
    pub record_type: String,
    pub raw: bool,
    pub params: PropertyMap,
}

/// Connection double that records every raw query and returns a fixed
/// output, or fails with a fixed message.
pub struct RecordingConnection {
    output: QueryOutput,
    fail_with: Option<String>,
    calls: Mutex<Vec<ConnectionCall>>,
}

impl RecordingConnection {
    pub fn new(output: QueryOutput) -> Self {
        Self {
            output,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(QueryOutput::Empty)
    }

    pub fn failing(message: &str) -> Self {
        Self {
            output: QueryOutput::Empty,
            fail_with: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ConnectionCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoreConnection for RecordingConnection {
    async fn raw_query(
        &self,
        query: &str,
        schema: &ModelSchema,
        options: QueryOptions,
        params: &PropertyMap,
    ) -> StoreResult<QueryOutput> {
        self.calls.lock().unwrap().push(ConnectionCall {
            query: query.to_string(),
            record_type: schema.record_type.clone(),
            raw: options.raw,
            params: params.clone(),
        });
        match &self.fail_with {
            Some(message) => Err(StoreError::Query(message.clone())),
            None => Ok(self.output.clone()),
        }
    }
}
