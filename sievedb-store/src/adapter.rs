//! The attribute-filtered CRUD adapter.

use crate::error::StoreResult;
use crate::store::{ModelMapper, QueryOptions, RecordHandle, StoreConnection};
use serde_json::Value;
use sievedb_model::PropertyMap;
use tracing::debug;

/// CRUD adapter over a store connection and a model mapper.
///
/// Every operation reduces caller-supplied objects to the model's declared
/// attributes before delegating, so the store never sees a property the
/// model does not know about. The adapter holds no locks, caches, or
/// mutable state of its own; concurrent calls are independent, and any
/// ordering or isolation guarantees come from the backing store.
pub struct ModelAdapter<C, M> {
    connection: C,
    mapper: M,
}

impl<C, M> ModelAdapter<C, M>
where
    C: StoreConnection,
    M: ModelMapper,
{
    /// Creates an adapter over the given connection and mapper.
    pub fn new(connection: C, mapper: M) -> Self {
        Self { connection, mapper }
    }

    /// The mapper this adapter delegates to.
    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// The connection this adapter runs raw queries on.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Returns the plain-data projections of all records matching `filter`.
    ///
    /// The filter is reduced to declared attributes first; an absent filter
    /// matches every record.
    pub async fn read(&self, filter: Option<&PropertyMap>) -> StoreResult<Vec<PropertyMap>> {
        let criteria = self.mapper.schema().filter_properties(filter);
        debug!(
            "read on {}: {} criteria",
            self.mapper.schema().record_type,
            criteria.len()
        );
        let items = self.mapper.find_all(&criteria).await?;
        Ok(items.into_iter().map(|item| item.into_data_values()).collect())
    }

    /// Runs a raw query against the bound model.
    ///
    /// Resolves `Some(rows)` when the store produced row results and `None`
    /// when it produced a scalar or nothing; callers must not assume a value
    /// is present.
    pub async fn query(
        &self,
        query: &str,
        params: Option<&PropertyMap>,
    ) -> StoreResult<Option<Vec<Value>>> {
        debug!("raw query on {}", self.mapper.schema().record_type);
        let params = params.cloned().unwrap_or_default();
        let output = self
            .connection
            .raw_query(query, self.mapper.schema(), QueryOptions::raw(), &params)
            .await?;
        Ok(output.rows())
    }

    /// Deletes all records matching `filter`, resolving with the projections
    /// read back just before the destroy.
    ///
    /// The read and the destroy are two separate store operations with the
    /// same criteria. A record inserted in between that also matches may be
    /// destroyed without appearing in the resolved result.
    // TODO: have the mapper's destroy report the removed rows so this cannot
    // delete different records than it returns.
    pub async fn delete(&self, filter: Option<&PropertyMap>) -> StoreResult<Vec<PropertyMap>> {
        let criteria = self.mapper.schema().filter_properties(filter);
        let items = self.mapper.find_all(&criteria).await?;
        let result: Vec<PropertyMap> =
            items.into_iter().map(|item| item.into_data_values()).collect();
        debug!(
            "delete on {}: {} matched",
            self.mapper.schema().record_type,
            result.len()
        );
        self.mapper.destroy(&criteria).await?;
        Ok(result)
    }

    /// Persists `object`'s declared attributes as a new record, resolving
    /// with the persisted record's plain-data projection.
    pub async fn create(&self, object: &PropertyMap) -> StoreResult<PropertyMap> {
        let attributes = self.mapper.schema().filter_properties(Some(object));
        debug!(
            "create on {}: {} attributes",
            self.mapper.schema().record_type,
            attributes.len()
        );
        let item = self.mapper.persist(&attributes).await?;
        Ok(item.into_data_values())
    }

    /// Sets `object`'s declared attributes on every record matching
    /// `filter`, resolving with an empty map on success.
    ///
    /// Neither the affected-row count nor the rows' new state is reported.
    pub async fn update(
        &self,
        object: &PropertyMap,
        filter: Option<&PropertyMap>,
    ) -> StoreResult<PropertyMap> {
        let attributes = self.mapper.schema().filter_properties(Some(object));
        let criteria = self.mapper.schema().filter_properties(filter);
        debug!(
            "update on {}: {} attributes, {} criteria",
            self.mapper.schema().record_type,
            attributes.len(),
            criteria.len()
        );
        self.mapper.update(&attributes, &criteria).await?;
        Ok(PropertyMap::new())
    }
}
