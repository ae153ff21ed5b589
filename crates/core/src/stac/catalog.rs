use super::{CATALOG_TYPE, Link, default_stac_version};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A STAC catalog is a top-level object that logically groups other catalog,
/// collection, and item objects.
///
/// Collections are read into this structure too, with their extent, license,
/// and other fields kept in `additional_fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Set to `Catalog` if this catalog only implements the catalog spec.
    #[serde(rename = "type", default = "default_type")]
    pub r#type: String,

    /// The STAC version the catalog implements.
    #[serde(default = "default_stac_version")]
    pub stac_version: String,

    /// A list of extension identifiers the catalog implements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stac_extensions: Vec<String>,

    /// Identifier for the catalog.
    pub id: String,

    /// A short descriptive one-line title for the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Detailed multi-line description to fully explain the catalog.
    #[serde(default)]
    pub description: String,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Additional fields not part of the catalog specification.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Catalog {
    /// Creates a new catalog with the provided id and description.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::stac::Catalog;
    ///
    /// let catalog = Catalog::new("an-id", "a description");
    /// assert_eq!(catalog.id, "an-id");
    /// ```
    pub fn new(id: impl ToString, description: impl ToString) -> Catalog {
        Catalog {
            r#type: default_type(),
            stac_version: default_stac_version(),
            stac_extensions: Vec::new(),
            id: id.to_string(),
            title: None,
            description: description.to_string(),
            links: Vec::new(),
            additional_fields: Map::new(),
        }
    }

    /// Returns an iterator over this catalog's item links.
    pub fn item_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.is_item())
    }

    /// Returns an iterator over this catalog's child links.
    pub fn child_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.is_child())
    }
}

fn default_type() -> String {
    CATALOG_TYPE.to_string()
}
