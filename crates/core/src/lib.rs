//! Collections, datasets, and data files for the Unity science data system.
//!
//! A [Collection] holds [Datasets](Dataset), and each dataset holds the
//! [DataFiles](DataFile) that make it up. Collections can be read from and
//! written to [STAC](https://stacspec.org), which is how data is handed from
//! one processing step to the next.
//!
//! # Reading
//!
//! [Collection::from_stac] reads either a STAC catalog (following its item and
//! child links) or a GeoJSON FeatureCollection of items:
//!
//! ```
//! use unity_sds::Collection;
//!
//! let collection = Collection::from_stac("data/cmr_granules.json").unwrap();
//! let data = collection.data_locations(&["data"]);
//! assert_eq!(data.len(), 2);
//! ```
//!
//! # Writing
//!
//! [Collection::to_stac] writes a self-contained catalog, with one item per
//! dataset, that can be read back with [Collection::from_stac]:
//!
//! ```
//! use unity_sds::Collection;
//!
//! let collection = Collection::from_stac("data/cmr_granules.json").unwrap();
//! let dir = tempfile::tempdir().unwrap();
//! collection.to_stac(dir.path()).unwrap();
//! let round_trip = Collection::from_stac(dir.path().join("catalog.json")).unwrap();
//! assert_eq!(round_trip.datasets().len(), 2);
//! ```
//!
//! # Features
//!
//! - `reqwest`: follow `http` and `https` links when reading catalogs

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(unused_crate_dependencies)]
#![warn(missing_docs)]

mod collection;
mod data_file;
mod dataset;
mod error;
pub mod href;
mod json;
mod read;
mod realized_href;
pub mod stac;
mod write;

pub use {
    collection::Collection,
    data_file::{DataFile, ROLE_KEYS, default_roles},
    dataset::{Dataset, RESERVED_PROPERTIES},
    error::Error,
    json::{FromJson, ToJson},
    realized_href::RealizedHref,
    write::CATALOG_FILE_NAME,
};

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
use {assert_json_diff as _, tempfile as _};
