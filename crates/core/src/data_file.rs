use serde::{Deserialize, Serialize};

/// Asset keys that imply a role of the same name when an asset has no roles.
pub const ROLE_KEYS: [&str; 2] = ["data", "metadata"];

/// A single file (or remote object) belonging to a [Dataset](crate::Dataset).
///
/// Data files are built once and then only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFile {
    #[serde(rename = "type")]
    r#type: String,
    location: String,
    roles: Vec<String>,
    title: String,
    description: String,
}

impl DataFile {
    /// Creates a new data file with no roles, title, or description.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::DataFile;
    ///
    /// let data_file = DataFile::new("application/x-netcdf", "/data/granule.nc")
    ///     .with_roles(["data"])
    ///     .with_title("granule");
    /// assert_eq!(data_file.location(), "/data/granule.nc");
    /// assert_eq!(data_file.roles(), ["data"]);
    /// ```
    pub fn new(r#type: impl ToString, location: impl ToString) -> DataFile {
        DataFile {
            r#type: r#type.to_string(),
            location: location.to_string(),
            roles: Vec::new(),
            title: String::new(),
            description: String::new(),
        }
    }

    /// Sets the roles of this data file.
    pub fn with_roles<I, S>(mut self, roles: I) -> DataFile
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.roles = roles.into_iter().map(|role| role.to_string()).collect();
        self
    }

    /// Sets the title of this data file.
    pub fn with_title(mut self, title: impl ToString) -> DataFile {
        self.title = title.to_string();
        self
    }

    /// Sets the description of this data file.
    pub fn with_description(mut self, description: impl ToString) -> DataFile {
        self.description = description.to_string();
        self
    }

    /// The media type, possibly empty.
    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    /// An absolute path or a URI.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The roles of this data file.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// The display title, possibly empty.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The description, possibly empty.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if any of this file's roles is in `roles`.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::DataFile;
    ///
    /// let data_file = DataFile::new("", "/data/granule.nc").with_roles(["data", "opendap"]);
    /// assert!(data_file.has_any_role(&["opendap", "metadata"]));
    /// assert!(!data_file.has_any_role(&["metadata"]));
    /// ```
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles
            .iter()
            .any(|role| self.roles.iter().any(|r| r == role.as_ref()))
    }
}

/// Fills in roles for an asset that doesn't declare any.
///
/// Assets keyed exactly `data` or `metadata` get that key as their only role.
/// Anything else is returned as is.
///
/// # Examples
///
/// ```
/// use unity_sds::default_roles;
///
/// assert_eq!(default_roles("data", Vec::new()), ["data"]);
/// assert_eq!(default_roles("metadata", Vec::new()), ["metadata"]);
/// assert!(default_roles("opendap", Vec::new()).is_empty());
/// assert_eq!(default_roles("data", vec!["browse".to_string()]), ["browse"]);
/// ```
pub fn default_roles(key: &str, roles: Vec<String>) -> Vec<String> {
    if roles.is_empty() && ROLE_KEYS.contains(&key) {
        vec![key.to_string()]
    } else {
        roles
    }
}
