use super::{Asset, ITEM_TYPE, Link, default_stac_version};
use geojson::Geometry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An item is a GeoJSON Feature augmented with foreign members relevant to a
/// STAC object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Type of the GeoJSON Object. MUST be set to `Feature`.
    #[serde(rename = "type", default = "default_type")]
    pub r#type: String,

    /// The STAC version the item implements.
    #[serde(default = "default_stac_version")]
    pub stac_version: String,

    /// A list of extensions the item implements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stac_extensions: Vec<String>,

    /// Provider identifier.
    pub id: String,

    /// Defines the full footprint of the asset represented by this item.
    #[serde(default)]
    pub geometry: Option<Geometry>,

    /// Bounding box of the asset represented by this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    /// A dictionary of additional metadata for the item.
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// List of link objects to resources and related URLs.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Dictionary of asset objects that can be downloaded, each with a unique key.
    #[serde(default)]
    pub assets: IndexMap<String, Asset>,

    /// The `id` of the STAC collection this item references to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    /// Additional fields not part of the item specification.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Item {
    /// Creates a new item with the given id.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::stac::Item;
    ///
    /// let item = Item::new("an-id");
    /// assert_eq!(item.id, "an-id");
    /// ```
    pub fn new(id: impl ToString) -> Item {
        Item {
            r#type: default_type(),
            stac_version: default_stac_version(),
            stac_extensions: Vec::new(),
            id: id.to_string(),
            geometry: None,
            bbox: None,
            properties: Map::new(),
            links: Vec::new(),
            assets: IndexMap::new(),
            collection: None,
            additional_fields: Map::new(),
        }
    }

    /// Returns a string property, or `None` if it's missing or not a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::stac::Item;
    ///
    /// let mut item = Item::new("an-id");
    /// let _ = item.properties.insert("created".into(), "2023-01-01T00:00:00Z".into());
    /// assert_eq!(item.property_str("created"), Some("2023-01-01T00:00:00Z"));
    /// assert_eq!(item.property_str("updated"), None);
    /// ```
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

fn default_type() -> String {
    ITEM_TYPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::Item;
    use serde_json::json;

    #[test]
    fn minimal() {
        let item: Item = serde_json::from_value(json!({
            "type": "Feature",
            "id": "granule-1",
            "geometry": null,
            "properties": {}
        }))
        .unwrap();
        assert!(item.geometry.is_none());
        assert!(item.assets.is_empty());
        assert!(item.collection.is_none());
    }

    #[test]
    fn asset_order() {
        let item: Item = serde_json::from_value(json!({
            "type": "Feature",
            "id": "granule-1",
            "properties": {},
            "assets": {
                "metadata": {"href": "./b.json"},
                "data": {"href": "./a.nc"}
            }
        }))
        .unwrap();
        let keys: Vec<_> = item.assets.keys().collect();
        assert_eq!(keys, ["metadata", "data"]);
    }

    #[test]
    fn requires_id() {
        let _ = serde_json::from_value::<Item>(json!({"type": "Feature"})).unwrap_err();
    }
}
