use crate::DataFile;
use geojson::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property keys that are modeled as fields on [Dataset] and are dropped by
/// [Dataset::with_reserved_properties_filtered].
pub const RESERVED_PROPERTIES: [&str; 3] = ["start_datetime", "end_datetime", "created"];

/// One granule of data in a [Collection](crate::Collection).
///
/// A dataset is made up of one or more [DataFiles](DataFile): the data
/// itself, plus metadata, browse imagery, checksums, and the like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// The dataset (granule) id.
    pub id: String,

    /// The id of the collection this dataset belongs to.
    pub collection_id: String,

    /// Start of the data coverage, ISO 8601.
    pub data_begin_time: Option<String>,

    /// End of the data coverage, ISO 8601.
    pub data_end_time: Option<String>,

    /// When the dataset was created, ISO 8601.
    pub data_create_time: Option<String>,

    /// Free-form metadata.
    pub properties: Map<String, Value>,

    /// The footprint of the data.
    pub geometry: Option<Geometry>,

    /// The bounding box of the data.
    pub bbox: Option<Vec<f64>>,

    datafiles: Vec<DataFile>,
}

impl Dataset {
    /// Creates a new dataset with no data files or properties.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::Dataset;
    ///
    /// let dataset = Dataset::new(
    ///     "granule-1",
    ///     "urn:nasa:unity:project:venue:collection",
    ///     Some("2023-01-01T00:00:00Z"),
    ///     Some("2023-01-01T01:00:00Z"),
    ///     None::<String>,
    /// );
    /// assert!(dataset.datafiles().is_empty());
    /// ```
    pub fn new(
        id: impl ToString,
        collection_id: impl ToString,
        start_time: Option<impl ToString>,
        end_time: Option<impl ToString>,
        creation_time: Option<impl ToString>,
    ) -> Dataset {
        Dataset {
            id: id.to_string(),
            collection_id: collection_id.to_string(),
            data_begin_time: start_time.map(|s| s.to_string()),
            data_end_time: end_time.map(|s| s.to_string()),
            data_create_time: creation_time.map(|s| s.to_string()),
            properties: Map::new(),
            geometry: None,
            bbox: None,
            datafiles: Vec::new(),
        }
    }

    /// Adds properties, skipping the [RESERVED_PROPERTIES].
    ///
    /// Those values are already held by the time fields, and this is how
    /// datasets are built from data service responses.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use unity_sds::Dataset;
    ///
    /// let properties = json!({"created": "2023-01-01T00:00:00Z", "platform": "aqua"});
    /// let dataset = Dataset::new("a", "b", None::<String>, None::<String>, None::<String>)
    ///     .with_reserved_properties_filtered(properties.as_object().unwrap().clone());
    /// assert!(dataset.properties.get("created").is_none());
    /// assert_eq!(dataset.properties["platform"], "aqua");
    /// ```
    pub fn with_reserved_properties_filtered(mut self, properties: Map<String, Value>) -> Dataset {
        for (key, value) in properties {
            if !RESERVED_PROPERTIES.contains(&key.as_str()) {
                let _ = self.properties.insert(key, value);
            }
        }
        self
    }

    /// Adds every property, including the [RESERVED_PROPERTIES].
    ///
    /// This is how datasets are built from STAC items, so the reserved keys
    /// can end up both here and in the time fields. When they disagree, the
    /// time fields are the ones to trust.
    pub fn with_all_properties_copied(mut self, properties: Map<String, Value>) -> Dataset {
        self.properties.extend(properties);
        self
    }

    /// Appends a data file.
    ///
    /// Files are never de-duplicated.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::{DataFile, Dataset};
    ///
    /// let mut dataset = Dataset::new("a", "b", None::<String>, None::<String>, None::<String>);
    /// dataset.add_data_file(DataFile::new("data", "/data/a.nc"));
    /// dataset.add_data_file(DataFile::new("data", "/data/a.nc"));
    /// assert_eq!(dataset.datafiles().len(), 2);
    /// ```
    pub fn add_data_file(&mut self, data_file: DataFile) {
        self.datafiles.push(data_file);
    }

    /// Sets a custom metadata property, replacing any previous value.
    pub fn add_property(&mut self, key: impl ToString, value: impl Into<Value>) {
        let _ = self.properties.insert(key.to_string(), value.into());
    }

    /// This dataset's data files, in the order they were added.
    pub fn datafiles(&self) -> &[DataFile] {
        &self.datafiles
    }
}
