use assert_json_diff::{assert_json_eq, assert_json_include};
use serde_json::{Value, json};
use std::path::Path;
use unity_sds::{Collection, DataFile, Dataset};

fn read_json(path: impl AsRef<Path>) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

fn collection_in(dir: &Path) -> Collection {
    let mut dataset = Dataset::new(
        "granule-1",
        "a-collection",
        Some("2023-01-01T00:00:00Z"),
        Some("2023-01-01T01:00:00Z"),
        Some("2023-01-02T00:00:00Z"),
    );
    dataset.add_property("processing_level", "L1B");
    dataset.add_data_file(
        DataFile::new(
            "application/x-netcdf",
            dir.join("granule-1.nc").to_string_lossy(),
        )
        .with_roles(["data"]),
    );
    dataset.add_data_file(
        DataFile::new("application/json", "s3://unity-bucket/granule-1.json")
            .with_roles(["metadata"]),
    );
    let mut collection = Collection::new("a-collection");
    collection.add_dataset(dataset);
    collection
}

#[test]
fn catalog_layout() {
    let dir = tempfile::tempdir().unwrap();
    collection_in(dir.path()).to_stac(dir.path()).unwrap();

    assert_json_eq!(
        read_json(dir.path().join("catalog.json")),
        json!({
            "type": "Catalog",
            "stac_version": "1.0.0",
            "id": "a-collection",
            "description": "STAC Catalog",
            "links": [
                {"href": "./catalog.json", "rel": "root", "type": "application/json"},
                {"href": "./granule-1.json", "rel": "item", "type": "application/json"}
            ]
        })
    );

    let item = read_json(dir.path().join("granule-1.json"));
    assert_json_include!(
        actual: item,
        expected: json!({
            "type": "Feature",
            "stac_version": "1.0.0",
            "id": "granule-1",
            "collection": "a-collection",
            "properties": {
                "datetime": "2023-01-01T00:00:00Z",
                "start_datetime": "2023-01-01T00:00:00Z",
                "end_datetime": "2023-01-01T01:00:00Z",
                "created": "2023-01-02T00:00:00Z",
                "processing_level": "L1B"
            },
            "assets": {
                "granule-1.nc": {
                    "href": "./granule-1.nc",
                    "title": "application/x-netcdf file",
                    "description": "",
                    "type": "application/x-netcdf",
                    "roles": ["data"]
                },
                "s3://unity-bucket/granule-1.json": {
                    "href": "s3://unity-bucket/granule-1.json",
                    "roles": ["metadata"]
                }
            }
        })
    );
    assert!(item["properties"]["updated"].is_string());
}

#[test]
fn round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let collection = collection_in(dir.path());
    collection.to_stac(dir.path()).unwrap();

    let round_trip = Collection::from_stac(dir.path().join("catalog.json")).unwrap();
    assert_eq!(round_trip.collection_id, collection.collection_id);
    assert_eq!(round_trip.datasets().len(), collection.datasets().len());
    let dataset = &round_trip.datasets()[0];
    assert_eq!(dataset.id, "granule-1");
    assert_eq!(dataset.collection_id, "a-collection");
    assert_eq!(
        dataset.data_begin_time.as_deref(),
        Some("2023-01-01T00:00:00Z")
    );
    assert_eq!(dataset.properties["processing_level"], "L1B");
    assert_eq!(
        round_trip.data_locations(&["data"]),
        collection.data_locations(&["data"])
    );
    assert_eq!(
        round_trip.data_locations(&["metadata"]),
        ["s3://unity-bucket/granule-1.json"]
    );
}

#[test]
fn round_trip_from_item_collection() {
    let collection = Collection::from_stac("data/cmr_granules.json").unwrap();
    let dir = tempfile::tempdir().unwrap();
    collection.to_stac(dir.path()).unwrap();

    let round_trip = Collection::from_stac(dir.path().join("catalog.json")).unwrap();
    assert_eq!(round_trip.collection_id, "C2011289787-GES_DISC");
    let ids: Vec<_> = round_trip.datasets().iter().map(|d| &d.id).collect();
    let expected: Vec<_> = collection.datasets().iter().map(|d| &d.id).collect();
    assert_eq!(ids, expected);
    for dataset in round_trip.datasets() {
        assert_eq!(dataset.collection_id, "C2011289787-GES_DISC");
        assert!(dataset.bbox.is_some());
        assert!(dataset.geometry.is_some());
    }
    assert_eq!(
        round_trip.data_locations(&["data"]),
        collection.data_locations(&["data"])
    );
}

#[test]
fn round_trip_relative_locations() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("stage-out");
    let mut dataset = Dataset::new(
        "granule-1",
        "a-collection",
        Some("2023-01-01"),
        None::<String>,
        None::<String>,
    );
    dataset.add_data_file(
        DataFile::new("", out.join("nested/granule-1.nc").to_string_lossy()).with_roles(["data"]),
    );
    let mut collection = Collection::new("a-collection");
    collection.add_dataset(dataset);
    collection.to_stac(&out).unwrap();

    let item = read_json(out.join("granule-1.json"));
    assert_eq!(item["assets"]["granule-1.nc"]["href"], "./nested/granule-1.nc");
    assert!(item["assets"]["granule-1.nc"].get("type").is_none());
    assert_eq!(item["properties"]["end_datetime"], Value::Null);

    let round_trip = Collection::from_stac(out.join("catalog.json")).unwrap();
    let locations = round_trip.data_locations::<&str>(&[]);
    assert_eq!(locations.len(), 1);
    assert!(Path::new(locations[0]).is_absolute());
    assert_eq!(
        locations[0],
        out.join("nested/granule-1.nc").to_string_lossy()
    );
}

#[test]
fn data_files_are_not_deduplicated() {
    let mut dataset = Dataset::new(
        "granule-1",
        "a-collection",
        Some("2023-01-01T00:00:00Z"),
        None::<String>,
        None::<String>,
    );
    for _ in 0..3 {
        dataset.add_data_file(DataFile::new("data", "/data/granule-1.nc").with_roles(["data"]));
    }
    let mut collection = Collection::new("a-collection");
    collection.add_dataset(dataset);
    assert_eq!(collection.data_locations(&["data"]).len(), 3);
}
