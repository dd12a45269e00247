//! Store abstraction and attribute-filtered CRUD adapter for SieveDB.
//!
//! Callers hand the adapter arbitrary JSON objects; the adapter intersects
//! them with the model's declared attributes and delegates the filtered
//! property sets to a backing store. Query execution, pooling, transactions,
//! and migrations all belong to the store behind the trait seams.
//!
//! # Components
//!
//! - **Store contract**: [`StoreConnection`], [`ModelMapper`], and
//!   [`RecordHandle`] — the opaque collaborators any backend implements
//! - **Adapter**: [`ModelAdapter`] — read / query / delete / create / update,
//!   each a filter-then-delegate single-shot call
//! - **Memory backend**: [`MemoryStore`] — shared in-memory tables with
//!   per-key equality matching, no query language
//! - **SQLite backend**: [`SqliteStore`] — rusqlite behind
//!   `spawn_blocking`, criteria compiled to `IS` comparisons
//!
//! # Example
//!
//! ```
//! use sievedb_model::{Attribute, ModelSchema};
//! use sievedb_store::{MemoryStore, ModelAdapter};
//!
//! let schema = ModelSchema::new(
//!     "person",
//!     vec![Attribute::integer("id"), Attribute::text("name")],
//! );
//!
//! let store = MemoryStore::new();
//! let adapter = ModelAdapter::new(store.clone(), store.mapper(schema));
//!
//! tokio_test::block_on(async {
//!     let object = serde_json::json!({"id": 1, "name": "ada", "extra": true});
//!     let created = adapter.create(object.as_object().unwrap()).await.unwrap();
//!     assert!(!created.contains_key("extra"));
//! });
//! ```

mod adapter;
mod error;
pub mod memory;
pub mod sqlite;
mod store;

pub use adapter::ModelAdapter;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryMapper, MemoryRecord, MemoryStore};
pub use sqlite::{SqliteMapper, SqliteRecord, SqliteStore};
pub use store::{ModelMapper, QueryOptions, QueryOutput, RecordHandle, StoreConnection};
