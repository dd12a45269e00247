//! SQLite reference store backed by rusqlite.
//!
//! One connection shared behind a mutex; every rusqlite call runs inside
//! `tokio::task::spawn_blocking` so the async runtime never blocks on disk.
//! The mapper treats the schema's record type as the table name and the
//! declared attribute list as its SELECT projection. Table creation and
//! migration are the caller's job via [`SqliteStore::execute_batch`].

use crate::error::{StoreError, StoreResult};
use crate::store::{ModelMapper, QueryOptions, QueryOutput, RecordHandle, StoreConnection};
use async_trait::async_trait;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use sievedb_model::{AttributeKind, ModelSchema, PropertyMap};
use std::sync::{Arc, Mutex};

/// SQLite-backed store sharing one connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &str) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Connection(format!("failed to open sqlite store: {e}")))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StoreError::Connection(format!("failed to open in-memory sqlite store: {e}"))
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs a batch of setup SQL (table creation, indexes).
    pub async fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        let sql = sql.to_string();
        self.run_blocking(move |conn| {
            conn.execute_batch(&sql)
                .map_err(|e| StoreError::Query(format!("failed to run setup batch: {e}")))
        })
        .await
    }

    /// Hands out a mapper bound to `schema`, sharing this store's connection.
    pub fn mapper(&self, schema: ModelSchema) -> SqliteMapper {
        SqliteMapper {
            store: self.clone(),
            schema,
        }
    }

    async fn run_blocking<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Connection(format!("sqlite worker task failed: {e}")))?
    }
}

#[async_trait]
impl StoreConnection for SqliteStore {
    /// Prepares `query`, binds `params` as named `:key` parameters (names the
    /// query does not reference are skipped), and returns `Rows` for
    /// statements producing columns or `Empty` otherwise.
    async fn raw_query(
        &self,
        query: &str,
        _schema: &ModelSchema,
        _options: QueryOptions,
        params: &PropertyMap,
    ) -> StoreResult<QueryOutput> {
        let query = query.to_string();
        let params = params.clone();
        self.run_blocking(move |conn| {
            let mut stmt = conn
                .prepare(&query)
                .map_err(|e| StoreError::Query(format!("failed to prepare query: {e}")))?;

            for (key, value) in &params {
                let name = format!(":{key}");
                let index = stmt
                    .parameter_index(&name)
                    .map_err(|e| StoreError::Query(format!("failed to resolve {name}: {e}")))?;
                if let Some(index) = index {
                    stmt.raw_bind_parameter(index, encode_value(value)?)
                        .map_err(|e| StoreError::Query(format!("failed to bind {name}: {e}")))?;
                }
            }

            if stmt.column_count() == 0 {
                stmt.raw_execute()
                    .map_err(|e| StoreError::Query(format!("failed to execute query: {e}")))?;
                return Ok(QueryOutput::Empty);
            }

            let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
            let mut rows = stmt.raw_query();
            let mut result = Vec::new();
            while let Some(row) = rows
                .next()
                .map_err(|e| StoreError::Query(format!("failed to read row: {e}")))?
            {
                let mut object = PropertyMap::new();
                for (i, name) in names.iter().enumerate() {
                    let cell = row.get_ref(i).map_err(|e| {
                        StoreError::Query(format!("failed to read column {name}: {e}"))
                    })?;
                    object.insert(name.clone(), decode_ref(cell));
                }
                result.push(Value::Object(object));
            }
            Ok(QueryOutput::Rows(result))
        })
        .await
    }
}

/// Mapper over one table in a [`SqliteStore`].
pub struct SqliteMapper {
    store: SqliteStore,
    schema: ModelSchema,
}

/// A row handed back by [`SqliteMapper`].
pub struct SqliteRecord {
    data: PropertyMap,
}

impl RecordHandle for SqliteRecord {
    fn data_values(&self) -> &PropertyMap {
        &self.data
    }

    fn into_data_values(self) -> PropertyMap {
        self.data
    }
}

#[async_trait]
impl ModelMapper for SqliteMapper {
    type Handle = SqliteRecord;

    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    async fn find_all(&self, criteria: &PropertyMap) -> StoreResult<Vec<SqliteRecord>> {
        let schema = self.schema.clone();
        let criteria = criteria.clone();
        self.store
            .run_blocking(move |conn| {
                let (where_sql, params) = where_clause(&criteria)?;
                let sql = format!(
                    "SELECT {} FROM \"{}\"{where_sql}",
                    projection(&schema),
                    schema.record_type
                );
                let mut stmt = conn
                    .prepare(&sql)
                    .map_err(|e| StoreError::Query(format!("failed to prepare select: {e}")))?;
                let mut rows = stmt
                    .query(params_from_iter(params))
                    .map_err(|e| StoreError::Query(format!("failed to run select: {e}")))?;
                let mut result = Vec::new();
                while let Some(row) = rows
                    .next()
                    .map_err(|e| StoreError::Query(format!("failed to read row: {e}")))?
                {
                    result.push(SqliteRecord {
                        data: decode_row(&schema, row)?,
                    });
                }
                Ok(result)
            })
            .await
    }

    async fn destroy(&self, criteria: &PropertyMap) -> StoreResult<()> {
        let schema = self.schema.clone();
        let criteria = criteria.clone();
        self.store
            .run_blocking(move |conn| {
                let (where_sql, params) = where_clause(&criteria)?;
                let sql = format!("DELETE FROM \"{}\"{where_sql}", schema.record_type);
                conn.execute(&sql, params_from_iter(params)).map_err(|e| {
                    StoreError::Query(format!(
                        "failed to delete from {}: {e}",
                        schema.record_type
                    ))
                })?;
                Ok(())
            })
            .await
    }

    async fn persist(&self, attributes: &PropertyMap) -> StoreResult<SqliteRecord> {
        let schema = self.schema.clone();
        let attributes = attributes.clone();
        self.store
            .run_blocking(move |conn| {
                let table = schema.record_type.clone();
                if attributes.is_empty() {
                    conn.execute(&format!("INSERT INTO \"{table}\" DEFAULT VALUES"), [])
                        .map_err(|e| {
                            StoreError::Validation(format!("failed to insert into {table}: {e}"))
                        })?;
                } else {
                    let columns: Vec<String> =
                        attributes.keys().map(|k| format!("\"{k}\"")).collect();
                    let placeholders = vec!["?"; attributes.len()].join(", ");
                    let mut values = Vec::with_capacity(attributes.len());
                    for value in attributes.values() {
                        values.push(encode_value(value)?);
                    }
                    let sql = format!(
                        "INSERT INTO \"{table}\" ({}) VALUES ({placeholders})",
                        columns.join(", ")
                    );
                    conn.execute(&sql, params_from_iter(values)).map_err(|e| {
                        StoreError::Validation(format!("failed to insert into {table}: {e}"))
                    })?;
                }

                // Read the committed row back so defaults appear in the projection.
                let rowid = conn.last_insert_rowid();
                let sql = format!(
                    "SELECT {} FROM \"{table}\" WHERE rowid = ?",
                    projection(&schema)
                );
                let mut stmt = conn
                    .prepare(&sql)
                    .map_err(|e| StoreError::Query(format!("failed to prepare readback: {e}")))?;
                let mut rows = stmt
                    .query([rowid])
                    .map_err(|e| StoreError::Query(format!("failed to read back insert: {e}")))?;
                let row = rows
                    .next()
                    .map_err(|e| StoreError::Query(format!("failed to read back insert: {e}")))?
                    .ok_or_else(|| {
                        StoreError::Query(format!("inserted row not found in {table}"))
                    })?;
                Ok(SqliteRecord {
                    data: decode_row(&schema, row)?,
                })
            })
            .await
    }

    async fn update(&self, attributes: &PropertyMap, criteria: &PropertyMap) -> StoreResult<()> {
        if attributes.is_empty() {
            return Ok(());
        }
        let schema = self.schema.clone();
        let attributes = attributes.clone();
        let criteria = criteria.clone();
        self.store
            .run_blocking(move |conn| {
                let assignments: Vec<String> =
                    attributes.keys().map(|k| format!("\"{k}\" = ?")).collect();
                let (where_sql, where_params) = where_clause(&criteria)?;
                let mut params = Vec::with_capacity(attributes.len() + where_params.len());
                for value in attributes.values() {
                    params.push(encode_value(value)?);
                }
                params.extend(where_params);
                let sql = format!(
                    "UPDATE \"{}\" SET {}{where_sql}",
                    schema.record_type,
                    assignments.join(", ")
                );
                conn.execute(&sql, params_from_iter(params)).map_err(|e| {
                    StoreError::Query(format!("failed to update {}: {e}", schema.record_type))
                })?;
                Ok(())
            })
            .await
    }
}

fn projection(schema: &ModelSchema) -> String {
    schema
        .attributes
        .iter()
        .map(|a| format!("\"{}\"", a.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compiles criteria to `AND`-joined `IS` comparisons, so `null` criteria
/// values match SQL NULLs. Empty criteria compile to no clause at all.
fn where_clause(criteria: &PropertyMap) -> StoreResult<(String, Vec<SqlValue>)> {
    if criteria.is_empty() {
        return Ok((String::new(), Vec::new()));
    }
    let mut clauses = Vec::with_capacity(criteria.len());
    let mut params = Vec::with_capacity(criteria.len());
    for (key, value) in criteria {
        clauses.push(format!("\"{key}\" IS ?"));
        params.push(encode_value(value)?);
    }
    Ok((format!(" WHERE {}", clauses.join(" AND ")), params))
}

/// JSON value to SQLite parameter: booleans as 0/1, arrays and objects as
/// serialized JSON text.
fn encode_value(value: &Value) -> StoreResult<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                SqlValue::Real(f)
            } else {
                SqlValue::Text(n.to_string())
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(serde_json::to_string(value)?),
    })
}

/// SQLite cell to JSON value with no declared kind to guide it. Blob
/// columns decode as lossy UTF-8 text.
fn decode_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}

/// Kind-aware cell decoding: booleans come back from their 0/1 encoding and
/// JSON attributes are parsed from their text form.
fn decode_column(kind: AttributeKind, value: ValueRef<'_>) -> Value {
    match (kind, value) {
        (_, ValueRef::Null) => Value::Null,
        (AttributeKind::Boolean, ValueRef::Integer(i)) => Value::Bool(i != 0),
        (AttributeKind::Json, ValueRef::Text(t)) => serde_json::from_slice(t)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(t).into_owned())),
        _ => decode_ref(value),
    }
}

fn decode_row(schema: &ModelSchema, row: &rusqlite::Row<'_>) -> StoreResult<PropertyMap> {
    let mut data = PropertyMap::new();
    for (i, attribute) in schema.attributes.iter().enumerate() {
        let cell = row.get_ref(i).map_err(|e| {
            StoreError::Query(format!("failed to read column {}: {e}", attribute.name))
        })?;
        data.insert(attribute.name.clone(), decode_column(attribute.kind, cell));
    }
    Ok(data)
}
