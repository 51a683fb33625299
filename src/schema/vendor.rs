//! Vendor extension (`x-*`) support.
//!
//! Objects that allow vendor extensions carry a [`VendorExtensions`] field marked
//! `#[serde(flatten)]`. On deserialization only keys starting with `x-` are kept;
//! on serialization the entries are emitted alongside the object's own fields.

use crate::schema::Any;
use indexmap::IndexMap;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const VENDOR_PREFIX: &str = "x-";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VendorExtensions(IndexMap<String, Any>);

impl VendorExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Any> {
        self.0.get(key)
    }

    /// Inserts an extension. Keys without the `x-` prefix get it prepended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Any>) {
        let key = key.into();
        let key = if key.starts_with(VENDOR_PREFIX) {
            key
        } else {
            format!("{}{}", VENDOR_PREFIX, key)
        };
        self.0.insert(key, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Any)> {
        self.0.iter()
    }
}

impl Serialize for VendorExtensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for VendorExtensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VendorVisitor;

        impl<'de> Visitor<'de> for VendorVisitor {
            type Value = VendorExtensions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of vendor extensions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut extensions = IndexMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    if key.starts_with(VENDOR_PREFIX) {
                        let value = access.next_value::<Any>()?;
                        extensions.insert(key, value);
                    } else {
                        access.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(VendorExtensions(extensions))
            }
        }

        deserializer.deserialize_map(VendorVisitor)
    }
}
