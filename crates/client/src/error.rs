use crate::Environment;
use reqwest::StatusCode;
use thiserror::Error;

/// Error enum for crate-specific errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Authentication failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// [config::ConfigError]
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// [unity_sds::Error]
    #[error(transparent)]
    Core(#[from] unity_sds::Error),

    /// A collection id doesn't start with the project and venue prefix.
    #[error("collection identifiers must start with {prefix}: {collection_id}")]
    InvalidCollectionId {
        /// The rejected collection id.
        collection_id: String,

        /// The required prefix.
        prefix: String,
    },

    /// The string isn't the name of an environment.
    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),

    /// The string isn't a supported workflow type.
    #[error("invalid workflow type: {0}")]
    InvalidWorkflowType(String),

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// No username and password are available for authentication.
    #[error("UNITY_USER and UNITY_PASSWORD must be set")]
    MissingCredentials,

    /// The settings have no section for this environment.
    #[error("no settings for environment {0}")]
    MissingEnvironment(Environment),

    /// A response didn't have a required header.
    #[error("response has no {0} header")]
    MissingHeader(&'static str),

    /// The session needs a project and a venue, or a venue id.
    #[error("the session project and venue (or venue id) must be set")]
    MissingProjectOrVenue,

    /// A required setting is missing from a section.
    #[error("no {key} setting in section {section}")]
    MissingSetting {
        /// The settings section.
        section: String,

        /// The missing key.
        key: &'static str,
    },

    /// An application has no versions to download.
    #[error("application {0} has no versions")]
    NoApplicationVersions(u64),

    /// An application can't be published without any files.
    #[error("can't publish application {0} because it has no files")]
    NothingToPublish(String),

    /// [reqwest::Error]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// A service responded with an unexpected status.
    #[error("{status} from {url}: {message}")]
    Status {
        /// The response status.
        status: StatusCode,

        /// The request url.
        url: String,

        /// The response body.
        message: String,
    },

    /// [url::ParseError]
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),

    /// [zip::result::ZipError]
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
