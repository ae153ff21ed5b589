use crate::{DataFile, Dataset};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A named group of [Datasets](Dataset).
///
/// Collections are built empty with [Collection::new], read from STAC with
/// [Collection::from_stac], or fetched from the data service. They are
/// written back out with [Collection::to_stac].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// The collection identifier, e.g. `urn:nasa:unity:<project>:<venue>:<name>`.
    pub collection_id: String,

    datasets: Vec<Dataset>,
}

impl Collection {
    /// Creates a new, empty collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::Collection;
    ///
    /// let collection = Collection::new("urn:nasa:unity:project:venue:collection");
    /// assert!(collection.datasets().is_empty());
    /// ```
    pub fn new(id: impl ToString) -> Collection {
        Collection {
            collection_id: id.to_string(),
            datasets: Vec::new(),
        }
    }

    /// Appends a dataset.
    pub fn add_dataset(&mut self, dataset: Dataset) {
        self.datasets.push(dataset);
    }

    /// This collection's datasets, in the order they were added.
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Returns every data file in this collection.
    ///
    /// Files are ordered by dataset and then by their position within the
    /// dataset. If `roles` is not empty, only files with at least one of
    /// those roles are returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::{Collection, DataFile, Dataset};
    ///
    /// let mut dataset = Dataset::new("a", "b", None::<String>, None::<String>, None::<String>);
    /// dataset.add_data_file(DataFile::new("", "/data/a.nc").with_roles(["data"]));
    /// dataset.add_data_file(DataFile::new("", "/data/a.xml").with_roles(["metadata"]));
    /// let mut collection = Collection::new("b");
    /// collection.add_dataset(dataset);
    ///
    /// assert_eq!(collection.data_files::<&str>(&[]).len(), 2);
    /// assert_eq!(collection.data_files(&["data"]).len(), 1);
    /// ```
    pub fn data_files<S: AsRef<str>>(&self, roles: &[S]) -> Vec<&DataFile> {
        self.datasets
            .iter()
            .flat_map(|dataset| dataset.datafiles())
            .filter(|data_file| roles.is_empty() || data_file.has_any_role(roles))
            .collect()
    }

    /// Returns the locations of every data file in this collection.
    ///
    /// Ordering and filtering are the same as [Collection::data_files].
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::{Collection, DataFile, Dataset};
    ///
    /// let mut dataset = Dataset::new("a", "b", None::<String>, None::<String>, None::<String>);
    /// dataset.add_data_file(DataFile::new("", "/data/a.nc").with_roles(["data"]));
    /// let mut collection = Collection::new("b");
    /// collection.add_dataset(dataset);
    ///
    /// assert_eq!(collection.data_locations(&["data"]), ["/data/a.nc"]);
    /// ```
    pub fn data_locations<S: AsRef<str>>(&self, roles: &[S]) -> Vec<&str> {
        self.data_files(roles)
            .into_iter()
            .map(DataFile::location)
            .collect()
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Collection(collection_id={})", self.collection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::Collection;
    use crate::{DataFile, Dataset};

    fn collection() -> Collection {
        let mut collection = Collection::new("urn:nasa:unity:unity:test:collection");
        for id in ["granule-1", "granule-2"] {
            let mut dataset = Dataset::new(
                id,
                &collection.collection_id,
                Some("2023-01-01T00:00:00Z"),
                Some("2023-01-01T01:00:00Z"),
                None::<String>,
            );
            dataset.add_data_file(
                DataFile::new("application/x-netcdf", format!("/data/{id}.nc"))
                    .with_roles(["data"]),
            );
            dataset.add_data_file(
                DataFile::new("text/html", format!("https://unity.test/opendap/{id}"))
                    .with_roles(["opendap"]),
            );
            dataset.add_data_file(
                DataFile::new("application/json", format!("/data/{id}.json"))
                    .with_roles(["metadata", "data"]),
            );
            collection.add_dataset(dataset);
        }
        collection
    }

    #[test]
    fn insertion_order() {
        let collection = collection();
        assert_eq!(
            collection.data_locations::<&str>(&[]),
            [
                "/data/granule-1.nc",
                "https://unity.test/opendap/granule-1",
                "/data/granule-1.json",
                "/data/granule-2.nc",
                "https://unity.test/opendap/granule-2",
                "/data/granule-2.json",
            ]
        );
    }

    #[test]
    fn roles_intersect() {
        let collection = collection();
        assert_eq!(
            collection.data_locations(&["data"]),
            [
                "/data/granule-1.nc",
                "/data/granule-1.json",
                "/data/granule-2.nc",
                "/data/granule-2.json",
            ]
        );
        assert_eq!(collection.data_files(&["opendap", "metadata"]).len(), 4);
        assert_eq!(collection.data_files(&["data", "opendap"]).len(), 6);
        assert!(collection.data_files(&["browse"]).is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(
            Collection::new("an-id").to_string(),
            "Collection(collection_id=an-id)"
        );
    }
}
