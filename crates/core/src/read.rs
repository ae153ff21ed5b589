//! Reading STAC into a [Collection].

use crate::{
    Collection, DataFile, Dataset, Error, Result, default_roles,
    href::{self, HrefKind},
    realized_href::RealizedHref,
    stac::{
        self, Asset, CATALOG_TYPE, COLLECTION_TYPE, Catalog, ITEM_COLLECTION_TYPE, ITEM_TYPE,
        Item, ItemCollection,
    },
};
use serde_json::Value;
use std::{collections::HashSet, fmt::Display, path::Path};

const UNKNOWN_MESSAGE: &str = "an unknown error occurred creating collection from stac";

impl Collection {
    /// Reads a collection from a STAC file.
    ///
    /// The file can either be a STAC catalog, in which case every item
    /// reachable through its `item` and `child` links is read, or a GeoJSON
    /// FeatureCollection of items. Relative asset hrefs are resolved against
    /// the directory that holds `path`.
    ///
    /// Any failure is returned as [Error::CollectionParse].
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::Collection;
    ///
    /// let collection = Collection::from_stac("data/catalog_01.json").unwrap();
    /// assert_eq!(collection.datasets().len(), 1);
    /// ```
    pub fn from_stac(path: impl AsRef<Path>) -> Result<Collection> {
        let path = path.as_ref();
        read_collection(path).map_err(|failure| {
            tracing::warn!(
                "could not read collection from {} ({}): {}",
                path.display(),
                failure.kind(),
                failure
            );
            Error::CollectionParse(failure.message())
        })
    }
}

/// Why a STAC file couldn't be read.
///
/// Only used to build the message of [Error::CollectionParse].
#[derive(Debug)]
enum ParseFailure {
    NotFound { href: String, message: String },
    MalformedJson(serde_json::Error),
    InvalidDocument(Error),
    Unknown(String),
}

/// The outcome of trying to read a document as a catalog.
enum CatalogAttempt {
    Catalog(Catalog),
    WrongShape(Value),
}

impl ParseFailure {
    fn kind(&self) -> &'static str {
        match self {
            ParseFailure::NotFound { .. } => "not found",
            ParseFailure::MalformedJson(_) => "malformed json",
            ParseFailure::InvalidDocument(_) => "invalid document",
            ParseFailure::Unknown(_) => "unknown",
        }
    }

    fn message(&self) -> String {
        match self {
            ParseFailure::Unknown(_) => UNKNOWN_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseFailure::NotFound { href, message } => write!(f, "{message}: {href}"),
            ParseFailure::MalformedJson(err) => write!(f, "{err}"),
            ParseFailure::InvalidDocument(err) => write!(f, "{err}"),
            ParseFailure::Unknown(message) => write!(f, "{message}"),
        }
    }
}

impl From<Error> for ParseFailure {
    fn from(err: Error) -> Self {
        ParseFailure::InvalidDocument(err)
    }
}

fn read_collection(path: &Path) -> std::result::Result<Collection, ParseFailure> {
    let path = std::path::absolute(path).map_err(|err| ParseFailure::Unknown(err.to_string()))?;
    let stac_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let root_href = path.to_string_lossy().into_owned();
    let value = read_value(&root_href)?;

    let (collection_id, items) = match attempt_catalog(value)? {
        CatalogAttempt::Catalog(catalog) => {
            let mut items = Vec::new();
            let mut visited = HashSet::from([root_href.clone()]);
            collect_items(&catalog, &root_href, &mut items, &mut visited)?;
            tracing::debug!(
                "read catalog {} with {} item(s) from {}",
                catalog.id,
                items.len(),
                root_href
            );
            (catalog.id, items)
        }
        CatalogAttempt::WrongShape(value) => {
            let item_collection = item_collection_from_value(value)?;
            let collection_id = item_collection
                .first_collection_id()
                .or(item_collection.id.as_deref())
                .map(String::from)
                .unwrap_or_else(|| file_stem(&path));
            tracing::debug!(
                "read item collection with {} item(s) from {}",
                item_collection.items.len(),
                root_href
            );
            (collection_id, item_collection.items)
        }
    };

    let mut collection = Collection::new(collection_id);
    for item in items {
        let dataset = dataset_from_item(item, &collection.collection_id, &stac_dir)?;
        collection.add_dataset(dataset);
    }
    Ok(collection)
}

fn attempt_catalog(value: Value) -> std::result::Result<CatalogAttempt, ParseFailure> {
    let is_catalog = matches!(
        stac::type_of(&value),
        Some(CATALOG_TYPE) | Some(COLLECTION_TYPE)
    );
    if is_catalog {
        serde_json::from_value(value)
            .map(CatalogAttempt::Catalog)
            .map_err(|err| ParseFailure::InvalidDocument(err.into()))
    } else {
        Ok(CatalogAttempt::WrongShape(value))
    }
}

fn item_collection_from_value(value: Value) -> std::result::Result<ItemCollection, ParseFailure> {
    stac::check_type(&value, &[ITEM_COLLECTION_TYPE])?;
    let item_collection: ItemCollection =
        serde_json::from_value(value).map_err(|err| ParseFailure::InvalidDocument(err.into()))?;
    for item in &item_collection.items {
        check_item_type(item)?;
    }
    Ok(item_collection)
}

fn collect_items(
    catalog: &Catalog,
    href: &str,
    items: &mut Vec<Item>,
    visited: &mut HashSet<String>,
) -> std::result::Result<(), ParseFailure> {
    for link in catalog.item_links() {
        let item_href = href::make_absolute(&link.href, href)?;
        let value = read_value(&item_href)?;
        stac::check_type(&value, &[ITEM_TYPE])?;
        let item: Item = serde_json::from_value(value)
            .map_err(|err| ParseFailure::InvalidDocument(err.into()))?;
        items.push(item);
    }
    for link in catalog.child_links() {
        let child_href = href::make_absolute(&link.href, href)?.into_owned();
        if !visited.insert(child_href.clone()) {
            continue;
        }
        let value = read_value(&child_href)?;
        stac::check_type(&value, &[CATALOG_TYPE, COLLECTION_TYPE])?;
        let child: Catalog = serde_json::from_value(value)
            .map_err(|err| ParseFailure::InvalidDocument(err.into()))?;
        collect_items(&child, &child_href, items, visited)?;
    }
    Ok(())
}

fn read_value(href: &str) -> std::result::Result<Value, ParseFailure> {
    let bytes = match RealizedHref::from(href) {
        RealizedHref::PathBuf(path) => read_path(&path)?,
        RealizedHref::Url(url) => read_url(url)?,
    };
    serde_json::from_slice(&bytes).map_err(ParseFailure::MalformedJson)
}

fn read_path(path: &Path) -> std::result::Result<Vec<u8>, ParseFailure> {
    std::fs::read(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ParseFailure::NotFound {
                href: path.to_string_lossy().into_owned(),
                message: err.to_string(),
            }
        } else {
            ParseFailure::Unknown(err.to_string())
        }
    })
}

#[cfg(feature = "reqwest")]
fn read_url(url: url::Url) -> std::result::Result<Vec<u8>, ParseFailure> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::UnsupportedHref(url.to_string()).into());
    }
    let href = url.to_string();
    reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map(|bytes| bytes.to_vec())
        .map_err(|err| ParseFailure::NotFound {
            href,
            message: err.to_string(),
        })
}

#[cfg(not(feature = "reqwest"))]
fn read_url(url: url::Url) -> std::result::Result<Vec<u8>, ParseFailure> {
    if matches!(url.scheme(), "http" | "https") {
        Err(Error::FeatureNotEnabled("reqwest").into())
    } else {
        Err(Error::UnsupportedHref(url.to_string()).into())
    }
}

fn check_item_type(item: &Item) -> Result<()> {
    if item.r#type == ITEM_TYPE {
        Ok(())
    } else {
        Err(Error::IncorrectType {
            actual: item.r#type.clone(),
            expected: ITEM_TYPE.to_string(),
        })
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn dataset_from_item(item: Item, collection_id: &str, stac_dir: &Path) -> Result<Dataset> {
    if item.id.is_empty() {
        return Err(Error::MissingField("id"));
    }
    // Items that declare their own collection win over the catalog.
    let dataset_collection_id = match item.collection.as_deref() {
        Some(item_collection_id) if item_collection_id != collection_id => item_collection_id,
        _ => collection_id,
    };
    let mut dataset = Dataset::new(
        &item.id,
        dataset_collection_id,
        item.property_str("start_datetime"),
        item.property_str("end_datetime"),
        item.property_str("created"),
    );
    for (key, asset) in &item.assets {
        dataset.add_data_file(data_file_from_asset(key, asset, stac_dir)?);
    }
    dataset.bbox = item.bbox;
    dataset.geometry = item.geometry;
    Ok(dataset.with_all_properties_copied(item.properties))
}

fn data_file_from_asset(key: &str, asset: &Asset, stac_dir: &Path) -> Result<DataFile> {
    if asset.href.is_empty() {
        return Err(Error::MissingField("href"));
    }
    Ok(DataFile::new(
        asset.media_type_or_default(),
        resolve_location(&asset.href, stac_dir),
    )
    .with_roles(default_roles(key, asset.roles_or_default().to_vec()))
    .with_title(asset.title_or_default())
    .with_description(asset.description_or_default()))
}

fn resolve_location(href: &str, stac_dir: &Path) -> String {
    match HrefKind::classify(href) {
        HrefKind::Uri | HrefKind::AbsolutePath => href.to_string(),
        HrefKind::RelativePath => href::normalize_path(&stac_dir.join(href))
            .to_string_lossy()
            .into_owned(),
    }
}
