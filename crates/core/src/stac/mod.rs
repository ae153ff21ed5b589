//! Typed STAC documents.
//!
//! This module **is**:
//!
//! - Just enough of [STAC](https://stacspec.org) to read and write catalogs
//!   and item collections of Unity data
//!
//! This module **is not**:
//!
//! - A validator
//! - A general purpose STAC library
//!
//! Fields that aren't modeled are kept in each structure's
//! `additional_fields`, so reading and writing a document doesn't drop them.

mod asset;
mod catalog;
mod item;
mod item_collection;
mod link;

pub use {
    asset::Asset, catalog::Catalog, item::Item, item_collection::ItemCollection, link::Link,
};

use crate::{Error, Result};
use serde_json::Value;

/// The STAC version written by this crate.
pub const STAC_VERSION: &str = "1.0.0";

/// The `type` field of a catalog.
pub const CATALOG_TYPE: &str = "Catalog";

/// The `type` field of a collection.
pub const COLLECTION_TYPE: &str = "Collection";

/// The `type` field of an item.
pub const ITEM_TYPE: &str = "Feature";

/// The `type` field of an item collection.
pub const ITEM_COLLECTION_TYPE: &str = "FeatureCollection";

/// Returns the `type` field of a JSON object, if there is one.
pub fn type_of(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

/// Returns an error if the `type` field of this value isn't one of `expected`.
pub(crate) fn check_type(value: &Value, expected: &[&str]) -> Result<()> {
    let actual = type_of(value).unwrap_or_default();
    if expected.contains(&actual) {
        Ok(())
    } else {
        Err(Error::IncorrectType {
            actual: actual.to_string(),
            expected: expected.join(" or "),
        })
    }
}

pub(crate) fn default_stac_version() -> String {
    STAC_VERSION.to_string()
}
