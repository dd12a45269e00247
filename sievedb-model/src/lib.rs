//! Model schema types for SieveDB.
//!
//! Defines the types every SieveDB store backend and adapter depends on:
//! - [`ModelSchema`] declares which attributes a record type carries
//! - [`Attribute`] and [`AttributeKind`] describe one declared attribute
//! - [`PropertyMap`] is the universal JSON-object shape for caller input,
//!   filter criteria, and plain-data projections
//!
//! The central operation is [`ModelSchema::filter_properties`]: intersect an
//! arbitrary caller-supplied object with the declared attribute names, so
//! nothing downstream ever sees a property the model does not know about.

mod attribute;
mod schema;

pub use attribute::{Attribute, AttributeKind};
pub use schema::ModelSchema;

/// A JSON object keyed by attribute name.
///
/// Used for caller-supplied objects, filter criteria, and the plain-data
/// projections handed back by store backends.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;
