//! Column oriented field storage.
//!
//! Geo points are accessed per document, through the [`GeoPointValues`] trait.
//! A segment exposes one such reader per geo field, through [`GeoFieldReaders`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use self::alive_bitset::AliveBitSet;
pub use self::geo_column::{Cardinality, GeoPointColumn, GeoPointColumnWriter, GeoPointValues};
use crate::GeoFilterError;

mod alive_bitset;
mod geo_column;

/// Provides access to the geo point readers of a segment, by field name.
#[derive(Clone, Default)]
pub struct GeoFieldReaders {
    fields: HashMap<String, Arc<dyn GeoPointValues>>,
}

impl fmt::Debug for GeoFieldReaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut field_names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        field_names.sort_unstable();
        f.debug_struct("GeoFieldReaders")
            .field("fields", &field_names)
            .finish()
    }
}

impl GeoFieldReaders {
    /// Registers the geo point reader of a field, replacing any previous one.
    pub fn add_field(&mut self, field_name: impl Into<String>, values: Arc<dyn GeoPointValues>) {
        self.fields.insert(field_name.into(), values);
    }

    /// Returns the geo point reader of the field.
    ///
    /// Returns [`GeoFilterError::FieldNotFound`] if no reader was registered for this field.
    pub fn geo_points(&self, field_name: &str) -> crate::Result<Arc<dyn GeoPointValues>> {
        self.fields
            .get(field_name)
            .cloned()
            .ok_or_else(|| GeoFilterError::FieldNotFound(field_name.to_string()))
    }

    /// Returns true if a reader is registered for this field.
    pub fn contains(&self, field_name: &str) -> bool {
        self.fields.contains_key(field_name)
    }
}
