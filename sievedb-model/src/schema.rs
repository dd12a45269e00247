use crate::attribute::Attribute;
use crate::PropertyMap;
use serde::{Deserialize, Serialize};

/// Declares a record type's attributes for filtering and store mapping.
///
/// The schema is the source of truth for which property names are valid on
/// a model. Store backends use the declared attribute list as their column
/// projection; the adapter uses it to strip unknown properties from caller
/// input before anything reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Record type name; doubles as the table name in SQL backends.
    pub record_type: String,
    pub attributes: Vec<Attribute>,
}

impl ModelSchema {
    /// Creates a schema for `record_type` with the given declared attributes.
    pub fn new(record_type: &str, attributes: Vec<Attribute>) -> Self {
        Self {
            record_type: record_type.into(),
            attributes,
        }
    }

    /// Returns whether `name` is a declared attribute.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Looks up a declared attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Iterates the declared attribute names in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Reduces `object` to the properties that are declared attributes.
    ///
    /// Returns a fresh map holding exactly the key-value pairs of `object`
    /// whose key this schema declares, with values passed through
    /// unmodified. An absent object yields an empty map, which store
    /// backends treat as "match everything" when used as criteria.
    pub fn filter_properties(&self, object: Option<&PropertyMap>) -> PropertyMap {
        let mut filtered = PropertyMap::new();
        let Some(object) = object else {
            return filtered;
        };
        for attribute in &self.attributes {
            if let Some(value) = object.get(&attribute.name) {
                filtered.insert(attribute.name.clone(), value.clone());
            }
        }
        filtered
    }
}
