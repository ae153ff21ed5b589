use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Create a STAC object from JSON.
pub trait FromJson: DeserializeOwned {
    /// Creates an object from JSON bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::{FromJson, stac::Item};
    ///
    /// let item = Item::from_json_slice(br#"{"type": "Feature", "id": "an-id"}"#).unwrap();
    /// assert_eq!(item.id, "an-id");
    /// ```
    fn from_json_slice(slice: &[u8]) -> Result<Self> {
        serde_json::from_slice(slice).map_err(Error::from)
    }
}

/// Writes a STAC object to JSON bytes.
pub trait ToJson: Serialize {
    /// Writes a value as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::{ToJson, stac::Item};
    ///
    /// let mut buf = Vec::new();
    /// Item::new("an-id").to_json_writer(&mut buf, true).unwrap();
    /// ```
    fn to_json_writer(&self, writer: impl Write, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self).map_err(Error::from)
        } else {
            serde_json::to_writer(writer, self).map_err(Error::from)
        }
    }

    /// Writes a value to a path as JSON.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use unity_sds::{ToJson, stac::Item};
    ///
    /// Item::new("an-id").to_json_path("an-id.json", true).unwrap();
    /// ```
    fn to_json_path(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_json_writer(&mut writer, pretty)?;
        writer.flush()?;
        Ok(())
    }
}

impl<T: DeserializeOwned> FromJson for T {}
impl<T: Serialize> ToJson for T {}
