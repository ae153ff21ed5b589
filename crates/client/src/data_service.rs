//! The data service, for collections and the datasets in them.

use crate::{Error, Result, Session};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use unity_sds::{
    Collection, DataFile, Dataset, default_roles,
    stac::{Asset, Item, ItemCollection, STAC_VERSION},
};
use url::Url;

const DATA_SERVICE_PATH: &str = "am-uds-dapa/";

/// Asset keys that hold metadata even when they don't say so.
const METADATA_ASSET_KEYS: [&str; 2] = ["metadata__cmr", "metadata__data"];

/// A client for the data service.
///
/// # Examples
///
/// ```no_run
/// use unity_sds_client::{Environment, Settings, Unity};
///
/// let settings = Settings::new(Some("environments.ini")).unwrap();
/// let unity = Unity::new(Environment::Dev, settings).unwrap();
/// let data_service = unity.data_service().unwrap();
/// for collection in data_service.collections(10).unwrap() {
///     println!("{collection}");
/// }
/// ```
#[derive(Debug)]
pub struct DataService<'a> {
    session: &'a Session,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct Features {
    features: Vec<Identified>,
}

#[derive(Debug, Deserialize)]
struct Identified {
    id: String,
}

impl<'a> DataService<'a> {
    /// Creates a data service at `<unity_href>am-uds-dapa/`.
    pub fn new(session: &'a Session) -> Result<DataService<'a>> {
        let endpoint = session.unity_href().join(DATA_SERVICE_PATH)?;
        Ok(DataService::with_endpoint(session, endpoint))
    }

    /// Creates a data service at a custom endpoint.
    pub fn with_endpoint(session: &'a Session, endpoint: Url) -> DataService<'a> {
        DataService { session, endpoint }
    }

    /// Returns this service's endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns up to `limit` collections.
    pub fn collections(&self, limit: u64) -> Result<Vec<Collection>> {
        let features: Features = serde_json::from_value(self.collections_stac(limit)?)?;
        Ok(features
            .features
            .into_iter()
            .map(|feature| Collection::new(feature.id))
            .collect())
    }

    /// Returns up to `limit` collections as the service's STAC response.
    pub fn collections_stac(&self, limit: u64) -> Result<Value> {
        let url = self.endpoint.join("collections")?;
        let request = self
            .session
            .get(url)?
            .query(&[("limit", limit.to_string())]);
        Ok(self.session.send(request)?.json()?)
    }

    /// Returns up to `limit` datasets in a collection.
    ///
    /// `filter` is passed along to the service as is.
    pub fn collection_data(
        &self,
        collection: &Collection,
        limit: u64,
        filter: Option<&str>,
    ) -> Result<Vec<Dataset>> {
        let item_collection: ItemCollection =
            serde_json::from_value(self.collection_data_stac(collection, limit, filter)?)?;
        Ok(item_collection
            .items
            .into_iter()
            .map(|item| dataset_from_item(item, &collection.collection_id))
            .collect())
    }

    /// Returns up to `limit` datasets in a collection as the service's STAC
    /// response.
    pub fn collection_data_stac(
        &self,
        collection: &Collection,
        limit: u64,
        filter: Option<&str>,
    ) -> Result<Value> {
        let url = self
            .endpoint
            .join(&format!("collections/{}/items", collection.collection_id))?;
        let mut query = vec![("limit", limit.to_string())];
        if let Some(filter) = filter {
            query.push(("filter", filter.to_string()));
        }
        let request = self.session.get(url)?.query(&query);
        Ok(self.session.send(request)?.json()?)
    }

    /// Creates a collection.
    ///
    /// The session's project and venue must be set, and the collection id
    /// must start with `urn:nasa:unity:<project>:<venue>`. Returns the STAC
    /// collection that was (or, with `dry_run`, would have been) sent.
    pub fn create_collection(&self, collection: &Collection, dry_run: bool) -> Result<Value> {
        let (project, venue) = self.session.project_and_venue()?;
        let prefix = format!("urn:nasa:unity:{project}:{venue}");
        if !collection.collection_id.starts_with(&prefix) {
            return Err(Error::InvalidCollectionId {
                collection_id: collection.collection_id.clone(),
                prefix,
            });
        }
        let body = stac_collection(&collection.collection_id);
        if dry_run {
            tracing::debug!("not creating {} (dry run)", collection.collection_id);
        } else {
            let url = self.endpoint.join("collections")?;
            let request = self.session.post(url)?.json(&body);
            let _ = self.session.send_expecting(request, StatusCode::ACCEPTED)?;
        }
        Ok(body)
    }

    /// Defines custom metadata fields for the session's project and venue.
    pub fn define_custom_metadata(&self, metadata: &Value) -> Result<()> {
        let (project, venue) = self.session.project_and_venue()?;
        let url = self
            .endpoint
            .join(&format!("admin/custom_metadata/{project}"))?;
        let request = self
            .session
            .put(url)?
            .query(&[("venue", venue)])
            .json(metadata);
        let _ = self.session.send_expecting(request, StatusCode::OK)?;
        Ok(())
    }
}

fn dataset_from_item(item: Item, collection_id: &str) -> Dataset {
    let mut dataset = Dataset::new(
        &item.id,
        collection_id,
        item.property_str("start_datetime"),
        item.property_str("end_datetime"),
        item.property_str("created"),
    );
    for (key, asset) in &item.assets {
        dataset.add_data_file(
            DataFile::new(asset.media_type_or_default(), &asset.href)
                .with_roles(asset_roles(key, asset))
                .with_title(asset.title_or_default())
                .with_description(asset.description_or_default()),
        );
    }
    dataset.bbox = item.bbox;
    dataset.geometry = item.geometry;
    dataset.with_reserved_properties_filtered(item.properties)
}

fn asset_roles(key: &str, asset: &Asset) -> Vec<String> {
    if let Some(roles) = asset.roles.as_ref() {
        return roles.clone();
    }
    let roles = default_roles(key, Vec::new());
    if !roles.is_empty() {
        roles
    } else if METADATA_ASSET_KEYS.contains(&key) {
        vec!["metadata".to_string()]
    } else {
        vec![key.to_string()]
    }
}

fn stac_collection(id: &str) -> Value {
    json!({
        "type": "Collection",
        "stac_version": STAC_VERSION,
        "stac_extensions": [],
        "id": id,
        "title": format!("Collection {id}"),
        "description": format!("Collection {id}"),
        "providers": [{"name": "unity"}],
        "links": [{
            "rel": "root",
            "href": "./collection.json",
            "type": "application/json",
        }],
        "extent": {
            "spatial": {"bbox": [[-180.0, -90.0, 180.0, 90.0]]},
            "temporal": {"interval": [[null, null]]},
        },
        "license": "proprietary",
        "summaries": {
            "granuleId": ["^.*$"],
            "process": ["stac"],
        },
    })
}
