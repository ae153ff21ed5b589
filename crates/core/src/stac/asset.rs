use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An asset is an object that contains a URI to data associated with an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// URI to the asset object.
    ///
    /// Relative and absolute URIs are both allowed.
    pub href: String,

    /// The displayed title for clients and users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// A description of the asset providing additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Media type of the asset.
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub r#type: Option<String>,

    /// The semantic roles of the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Additional fields on the asset.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Asset {
    /// Creates a new asset with the provided href.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::stac::Asset;
    ///
    /// let asset = Asset::new("/data/granule.nc");
    /// assert_eq!(asset.href, "/data/granule.nc");
    /// ```
    pub fn new(href: impl ToString) -> Asset {
        Asset {
            href: href.to_string(),
            title: None,
            description: None,
            r#type: None,
            roles: None,
            additional_fields: Map::new(),
        }
    }

    /// Returns the media type, or an empty string.
    pub fn media_type_or_default(&self) -> &str {
        self.r#type.as_deref().unwrap_or_default()
    }

    /// Returns the title, or an empty string.
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Returns the description, or an empty string.
    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Returns the roles, or an empty slice.
    pub fn roles_or_default(&self) -> &[String] {
        self.roles.as_deref().unwrap_or_default()
    }
}
