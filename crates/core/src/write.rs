//! Writing a [Collection] as a self-contained STAC catalog.

use crate::{
    Collection, DataFile, Dataset, Error, Result, ToJson,
    href::HrefKind,
    stac::{Asset, Catalog, Item, Link},
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;
use std::path::Path;

/// The file name of the root catalog.
pub const CATALOG_FILE_NAME: &str = "catalog.json";

const CATALOG_DESCRIPTION: &str = "STAC Catalog";

impl Collection {
    /// Writes this collection to a self-contained STAC catalog in `dir`.
    ///
    /// The catalog is written to `dir/catalog.json` and each dataset becomes
    /// an item at `dir/<dataset id>.json`. Data files under `dir` are
    /// referenced relative to it, and URIs and paths elsewhere are left as
    /// they are.
    ///
    /// Every dataset needs an id and a parseable `data_begin_time`, and every
    /// data file needs a location. Nothing is written if any of these are
    /// missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::{Collection, DataFile, Dataset};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let mut dataset = Dataset::new(
    ///     "granule-1",
    ///     "a-collection",
    ///     Some("2023-01-01T00:00:00Z"),
    ///     Some("2023-01-01T01:00:00Z"),
    ///     None::<String>,
    /// );
    /// dataset.add_data_file(
    ///     DataFile::new("application/x-netcdf", dir.path().join("granule-1.nc").to_string_lossy())
    ///         .with_roles(["data"]),
    /// );
    /// let mut collection = Collection::new("a-collection");
    /// collection.add_dataset(dataset);
    /// collection.to_stac(dir.path()).unwrap();
    /// assert!(dir.path().join("catalog.json").exists());
    /// assert!(dir.path().join("granule-1.json").exists());
    /// ```
    pub fn to_stac(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref().to_string_lossy();
        let dir = match dir.trim_end_matches('/') {
            "" if dir.starts_with('/') => "/",
            trimmed => trimmed,
        };
        let updated = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let mut catalog = Catalog::new(&self.collection_id, CATALOG_DESCRIPTION);
        catalog.links.push(Link::root(format!("./{CATALOG_FILE_NAME}")));
        let mut items = Vec::with_capacity(self.datasets().len());
        for dataset in self.datasets() {
            let item = item_from_dataset(dataset, dir, &updated)?;
            catalog
                .links
                .push(Link::item(format!("./{}", item_file_name(&item.id))));
            items.push(item);
        }

        let dir = Path::new(dir);
        std::fs::create_dir_all(dir)?;
        for item in &items {
            item.to_json_path(dir.join(item_file_name(&item.id)), true)?;
        }
        catalog.to_json_path(dir.join(CATALOG_FILE_NAME), true)?;
        tracing::debug!(
            "wrote catalog {} with {} item(s) to {}",
            catalog.id,
            items.len(),
            dir.display()
        );
        Ok(())
    }
}

fn item_file_name(id: &str) -> String {
    format!("{id}.json")
}

fn item_from_dataset(dataset: &Dataset, dir: &str, updated: &str) -> Result<Item> {
    if dataset.id.is_empty() {
        return Err(Error::MissingField("id"));
    }
    if dataset
        .datafiles()
        .iter()
        .any(|data_file| data_file.location().is_empty())
    {
        return Err(Error::MissingField("location"));
    }
    let begin_time = dataset
        .data_begin_time
        .as_deref()
        .ok_or(Error::MissingField("data_begin_time"))?;
    let datetime = parse_datetime(begin_time)?
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::AutoSi, true);

    let mut item = Item::new(&dataset.id);
    item.geometry = dataset.geometry.clone();
    item.bbox = dataset.bbox.clone();
    item.collection = Some(dataset.collection_id.clone());
    let _ = item.properties.insert("datetime".into(), datetime.into());
    let _ = item
        .properties
        .insert("start_datetime".into(), optional(&dataset.data_begin_time));
    let _ = item
        .properties
        .insert("end_datetime".into(), optional(&dataset.data_end_time));
    let _ = item.properties.insert(
        "created".into(),
        dataset
            .data_create_time
            .as_deref()
            .unwrap_or(updated)
            .into(),
    );
    let _ = item.properties.insert("updated".into(), updated.into());
    item.properties.extend(dataset.properties.clone());

    item.links.push(Link::root(format!("./{CATALOG_FILE_NAME}")));
    item.links.push(Link::parent(format!("./{CATALOG_FILE_NAME}")));

    for data_file in dataset.datafiles() {
        let href = asset_href(data_file.location(), dir);
        let key = asset_key(&href);
        if item.assets.contains_key(&key) {
            tracing::warn!(
                "asset key {} is used more than once in dataset {}, keeping the last one",
                key,
                dataset.id
            );
        }
        let _ = item.assets.insert(key, asset(data_file, href));
    }
    Ok(item)
}

fn asset(data_file: &DataFile, href: String) -> Asset {
    let mut asset = Asset::new(href);
    asset.title = Some(format!("{} file", data_file.r#type()));
    asset.description = Some(String::new());
    asset.roles = Some(data_file.roles().to_vec());
    if !data_file.r#type().is_empty() {
        asset.r#type = Some(data_file.r#type().to_string());
    }
    asset
}

fn optional(value: &Option<String>) -> Value {
    value.clone().map(Value::from).unwrap_or(Value::Null)
}

/// Rewrites a location under `dir` to be relative to it.
///
/// URIs and locations outside of `dir` are returned unchanged.
fn asset_href(location: &str, dir: &str) -> String {
    if HrefKind::classify(location) == HrefKind::Uri {
        return location.to_string();
    }
    match location.strip_prefix(dir) {
        Some(rest) if rest.starts_with('/') => format!(".{rest}"),
        Some(rest) if dir.ends_with('/') => format!("./{rest}"),
        _ => location.to_string(),
    }
}

/// Relative hrefs are keyed by their file name, everything else by the href itself.
fn asset_key(href: &str) -> String {
    if href.starts_with("./") {
        Path::new(href)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| href.to_string())
    } else {
        href.to_string()
    }
}

/// Parses an ISO 8601 datetime, assuming UTC when there's no offset.
fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = s.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&datetime).fixed_offset());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(datetime) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(Utc.from_utc_datetime(&datetime).fixed_offset());
    }
    Err(Error::InvalidDatetime(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{asset_href, asset_key, parse_datetime};
    use crate::{Collection, DataFile, Dataset, Error};
    use rstest::rstest;

    #[rstest]
    #[case("/out/granule.nc", "/out", "./granule.nc")]
    #[case("/out/sub/granule.nc", "/out", "./sub/granule.nc")]
    #[case("/output/granule.nc", "/out", "/output/granule.nc")]
    #[case("/elsewhere/granule.nc", "/out", "/elsewhere/granule.nc")]
    #[case("s3://bucket/out/granule.nc", "/out", "s3://bucket/out/granule.nc")]
    #[case("/granule.nc", "/", "./granule.nc")]
    fn href(#[case] location: &str, #[case] dir: &str, #[case] expected: &str) {
        assert_eq!(asset_href(location, dir), expected);
    }

    #[rstest]
    #[case("./granule.nc", "granule.nc")]
    #[case("./sub/granule.nc", "granule.nc")]
    #[case("/elsewhere/granule.nc", "/elsewhere/granule.nc")]
    #[case("https://unity.test/granule.nc", "https://unity.test/granule.nc")]
    fn key(#[case] href: &str, #[case] expected: &str) {
        assert_eq!(asset_key(href), expected);
    }

    #[rstest]
    #[case("2016-08-22T00:05:22.000Z", "2016-08-22T00:05:22+00:00")]
    #[case("2016-08-22T00:05:22", "2016-08-22T00:05:22+00:00")]
    #[case("2016-08-22T00:05:22.5-07:00", "2016-08-22T00:05:22.500-07:00")]
    #[case("2016-08-22", "2016-08-22T00:00:00+00:00")]
    fn datetime(#[case] s: &str, #[case] expected: &str) {
        assert_eq!(
            parse_datetime(s)
                .unwrap()
                .to_rfc3339_opts(chrono::SecondsFormat::AutoSi, false),
            expected
        );
    }

    #[test]
    fn bad_datetime() {
        assert!(matches!(
            parse_datetime("yesterday").unwrap_err(),
            Error::InvalidDatetime(_)
        ));
    }

    #[test]
    fn missing_begin_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = Collection::new("a-collection");
        collection.add_dataset(Dataset::new(
            "granule-1",
            "a-collection",
            None::<String>,
            None::<String>,
            None::<String>,
        ));
        assert!(matches!(
            collection.to_stac(dir.path()).unwrap_err(),
            Error::MissingField("data_begin_time")
        ));
        assert!(!dir.path().join("catalog.json").exists());
    }

    #[test]
    fn empty_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = Collection::new("a-collection");
        collection.add_dataset(Dataset::new(
            "",
            "a-collection",
            Some("2023-01-01T00:00:00Z"),
            None::<String>,
            None::<String>,
        ));
        assert!(matches!(
            collection.to_stac(dir.path()).unwrap_err(),
            Error::MissingField("id")
        ));
        assert!(!dir.path().join("catalog.json").exists());
        assert!(!dir.path().join(".json").exists());
    }

    #[test]
    fn empty_location() {
        let dir = tempfile::tempdir().unwrap();
        let mut dataset = Dataset::new(
            "granule-1",
            "a-collection",
            Some("2023-01-01T00:00:00Z"),
            None::<String>,
            None::<String>,
        );
        dataset.add_data_file(DataFile::new("", ""));
        let mut collection = Collection::new("a-collection");
        collection.add_dataset(dataset);
        assert!(matches!(
            collection.to_stac(dir.path()).unwrap_err(),
            Error::MissingField("location")
        ));
        assert!(!dir.path().join("catalog.json").exists());
        assert!(!dir.path().join("granule-1.json").exists());
    }

    #[test]
    fn key_collision_keeps_last() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_string_lossy().into_owned();
        let mut dataset = Dataset::new(
            "granule-1",
            "a-collection",
            Some("2023-01-01T00:00:00Z"),
            None::<String>,
            None::<String>,
        );
        dataset.add_data_file(
            DataFile::new("data", format!("{out}/a/granule.nc")).with_roles(["data"]),
        );
        dataset.add_data_file(
            DataFile::new("browse", format!("{out}/b/granule.nc")).with_roles(["browse"]),
        );
        let mut collection = Collection::new("a-collection");
        collection.add_dataset(dataset);
        collection.to_stac(&out).unwrap();

        let item: serde_json::Value = serde_json::from_slice(
            &std::fs::read(dir.path().join("granule-1.json")).unwrap(),
        )
        .unwrap();
        let assets = item["assets"].as_object().unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets["granule.nc"]["href"], "./b/granule.nc");
        assert_eq!(assets["granule.nc"]["roles"][0], "browse");
    }
}
