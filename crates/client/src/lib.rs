//! A blocking client for the Unity science data system.
//!
//! [Unity] is the entry point. It reads [Settings] for an [Environment],
//! authenticates, and hands out clients for the [DataService], the
//! [ProcessService], and the [ApplicationService]:
//!
//! ```no_run
//! use unity_sds_client::{Environment, Settings, Unity};
//!
//! let settings = Settings::new(Some("environments.ini")).unwrap();
//! let mut unity = Unity::new(Environment::Dev, settings).unwrap();
//! unity.set_project("sounder");
//! unity.set_venue("dev");
//!
//! let data_service = unity.data_service().unwrap();
//! for collection in data_service.collections(10).unwrap() {
//!     let datasets = data_service.collection_data(&collection, 10, None).unwrap();
//!     println!("{collection}: {} dataset(s)", datasets.len());
//! }
//! ```
//!
//! Collections, datasets, and data files come from [unity_sds].

#![deny(unused_crate_dependencies)]
#![warn(missing_docs)]

mod application;
pub mod application_service;
mod auth;
pub mod data_service;
mod environment;
mod error;
mod job;
mod process;
pub mod process_service;
mod session;
mod settings;
mod unity;

pub use {
    application::{Application, ApplicationFile, ApplicationFileKind, WorkflowType},
    application_service::ApplicationService,
    auth::{CognitoAuth, StaticToken, TokenProvider},
    data_service::DataService,
    environment::Environment,
    error::Error,
    job::{Job, JobStatus},
    process::Process,
    process_service::ProcessService,
    session::Session,
    settings::{EnvironmentSettings, Settings},
    unity::Unity,
};

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
use tempfile as _;
