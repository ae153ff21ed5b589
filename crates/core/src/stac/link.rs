use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A link from one STAC object to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The actual link in the format of an URL.
    pub href: String,

    /// Relationship between the current document and the linked document.
    pub rel: String,

    /// Media type of the referenced entity.
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub r#type: Option<String>,

    /// A human readable title to be used in rendered displays of the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Additional fields on the link.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Link {
    /// Creates a new link with the provided href and rel type.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::stac::Link;
    ///
    /// let link = Link::new("./catalog.json", "root");
    /// assert_eq!(link.rel, "root");
    /// ```
    pub fn new(href: impl ToString, rel: impl ToString) -> Link {
        Link {
            href: href.to_string(),
            rel: rel.to_string(),
            r#type: None,
            title: None,
            additional_fields: Map::new(),
        }
    }

    /// Sets this link's media type to JSON.
    pub fn json(mut self) -> Link {
        self.r#type = Some("application/json".to_string());
        self
    }

    /// Creates a new root link.
    pub fn root(href: impl ToString) -> Link {
        Link::new(href, "root").json()
    }

    /// Creates a new parent link.
    pub fn parent(href: impl ToString) -> Link {
        Link::new(href, "parent").json()
    }

    /// Creates a new item link.
    pub fn item(href: impl ToString) -> Link {
        Link::new(href, "item").json()
    }

    /// Returns true if this is an item link.
    pub fn is_item(&self) -> bool {
        self.rel == "item"
    }

    /// Returns true if this is a child link.
    pub fn is_child(&self) -> bool {
        self.rel == "child"
    }
}
