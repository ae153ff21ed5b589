use super::{ITEM_COLLECTION_TYPE, Item, Link};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON FeatureCollection of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCollection {
    /// Always `FeatureCollection`.
    #[serde(rename = "type", default = "default_type")]
    pub r#type: String,

    /// An optional identifier, which some services put on their responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The list of items.
    #[serde(rename = "features")]
    pub items: Vec<Item>,

    /// List of link objects to resources and related URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    /// Additional fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl ItemCollection {
    /// Returns the `collection` of the first item, if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::stac::{Item, ItemCollection};
    ///
    /// let mut item = Item::new("an-id");
    /// item.collection = Some("a-collection".to_string());
    /// let item_collection = ItemCollection::from(vec![item]);
    /// assert_eq!(item_collection.first_collection_id(), Some("a-collection"));
    /// ```
    pub fn first_collection_id(&self) -> Option<&str> {
        self.items.first().and_then(|item| item.collection.as_deref())
    }
}

impl From<Vec<Item>> for ItemCollection {
    fn from(items: Vec<Item>) -> Self {
        ItemCollection {
            r#type: default_type(),
            id: None,
            items,
            links: Vec::new(),
            additional_fields: Map::new(),
        }
    }
}

fn default_type() -> String {
    ITEM_COLLECTION_TYPE.to_string()
}
