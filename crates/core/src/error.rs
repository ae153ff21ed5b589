use thiserror::Error;

/// Error enum for crate-specific errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A STAC file could not be turned into a [Collection](crate::Collection).
    ///
    /// Every failure of [Collection::from_stac](crate::Collection::from_stac)
    /// collapses into this variant, whether the file was missing, was not
    /// JSON, or was neither a catalog nor an item collection.
    #[error("could not create collection from stac: {0}")]
    CollectionParse(String),

    /// A required feature is not enabled.
    #[error("{0} is not enabled")]
    FeatureNotEnabled(&'static str),

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Returned when a STAC object has the wrong type field.
    #[error("incorrect type: expected={expected}, actual={actual}")]
    IncorrectType {
        /// The actual type field on the object.
        actual: String,

        /// The expected value.
        expected: String,
    },

    /// This string is not a valid datetime.
    #[error("invalid datetime: {0}")]
    InvalidDatetime(String),

    /// Returned when there is not a required field on an object.
    #[error("no \"{0}\" field")]
    MissingField(&'static str),

    /// The href uses a scheme that can't be read.
    #[error("unsupported href: {0}")]
    UnsupportedHref(String),

    /// [reqwest::Error]
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [url::ParseError]
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}
