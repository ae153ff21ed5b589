//! The application catalog, for registering and publishing hosted workflows.

use crate::{Application, ApplicationFile, Error, Result, Session, WorkflowType};
use reqwest::{StatusCode, blocking::RequestBuilder, header::ACCEPT};
use serde::Deserialize;
use serde_json::json;
use std::{
    collections::BTreeMap,
    fs::File,
    path::{Path, PathBuf},
    sync::OnceLock,
};
use url::Url;
use zip::ZipArchive;

/// The settings section that holds the catalog's endpoint.
pub const APPLICATION_SERVICE_SECTION: &str = "APPLICATION_SERVICE";

/// A client for the application catalog.
///
/// The catalog is reached with the session's token.
///
/// # Examples
///
/// ```no_run
/// use unity_sds_client::{ApplicationFile, Environment, Settings, Unity, WorkflowType};
///
/// let settings = Settings::new(Some("environments.ini")).unwrap();
/// let unity = Unity::new(Environment::Dev, settings).unwrap();
/// let application_service = unity.application_service().unwrap();
/// let application = application_service
///     .register(
///         "l1a-pge",
///         WorkflowType::Cwl,
///         &[ApplicationFile::parameter("l1a.cwl").with_catalog_path("Dockstore.cwl")],
///         true,
///     )
///     .unwrap();
/// application_service.download_files(&application, "l1a-pge").unwrap();
/// ```
#[derive(Debug)]
pub struct ApplicationService<'a> {
    session: &'a Session,
    endpoint: Url,
    user_id: OnceLock<u64>,
}

#[derive(Debug, Deserialize)]
struct Identified {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct Versions {
    #[serde(rename = "workflowVersions", default)]
    workflow_versions: Vec<Version>,
}

#[derive(Debug, Deserialize)]
struct Version {
    id: u64,
    name: String,
}

impl<'a> ApplicationService<'a> {
    /// Creates an application service at the `endpoint` of the
    /// `[APPLICATION_SERVICE]` settings section.
    pub fn new(session: &'a Session) -> Result<ApplicationService<'a>> {
        let endpoint = session
            .setting(APPLICATION_SERVICE_SECTION, "endpoint")
            .ok_or_else(|| Error::MissingSetting {
                section: APPLICATION_SERVICE_SECTION.to_string(),
                key: "endpoint",
            })?;
        Ok(ApplicationService::with_endpoint(session, Url::parse(endpoint)?))
    }

    /// Creates an application service at a custom endpoint.
    pub fn with_endpoint(session: &'a Session, mut endpoint: Url) -> ApplicationService<'a> {
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        ApplicationService {
            session,
            endpoint,
            user_id: OnceLock::new(),
        }
    }

    /// Returns this service's endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.endpoint.join(path.trim_start_matches('/'))?)
    }

    fn get(&self, path: &str) -> Result<RequestBuilder> {
        Ok(self
            .session
            .get(self.url(path)?)?
            .header(ACCEPT, "application/json"))
    }

    fn publish_request(&self, application: &Application, publish: bool) -> Result<()> {
        let request = self
            .session
            .post(self.url(&format!("workflows/{}/publish", application.id))?)?
            .header(ACCEPT, "application/json")
            .json(&json!({ "publish": publish }));
        let _ = self.session.send_expecting(request, StatusCode::OK)?;
        tracing::debug!(
            "set published={} on application {}",
            publish,
            application.id
        );
        Ok(())
    }

    /// Returns the id of the user that owns the session's token.
    fn user_id(&self) -> Result<u64> {
        if let Some(user_id) = self.user_id.get() {
            return Ok(*user_id);
        }
        let user: Identified = self
            .session
            .send_expecting(self.get("users/user")?, StatusCode::OK)?
            .json()?;
        let _ = self.user_id.set(user.id);
        Ok(user.id)
    }

    /// Returns one application.
    pub fn application(&self, id: u64) -> Result<Application> {
        let value = self
            .session
            .send_expecting(self.get(&format!("workflows/{id}"))?, StatusCode::OK)?
            .json()?;
        Application::from_value(value)
    }

    /// Returns the applications in the catalog.
    ///
    /// With `for_user`, only the applications of the token's user are
    /// returned. `published` keeps only published (`Some(true)`) or
    /// unpublished (`Some(false)`) applications. Unpublished applications
    /// are only visible to their user, so asking for them implies `for_user`.
    pub fn applications(
        &self,
        for_user: bool,
        published: Option<bool>,
    ) -> Result<Vec<Application>> {
        let for_user = for_user || published == Some(false);
        let path = if for_user {
            format!("users/{}/workflows", self.user_id()?)
        } else {
            "workflows/published".to_string()
        };
        let values: Vec<serde_json::Value> = self
            .session
            .send_expecting(self.get(&path)?, StatusCode::OK)?
            .json()?;
        let mut applications = Vec::with_capacity(values.len());
        for value in values {
            // User workflow listings are abbreviated.
            let application = if for_user {
                let workflow: Identified = serde_json::from_value(value)?;
                self.application(workflow.id)?
            } else {
                Application::from_value(value)?
            };
            if published.is_none_or(|published| published == application.is_published) {
                applications.push(application);
            }
        }
        Ok(applications)
    }

    /// Registers a new hosted application, uploads its files, and optionally
    /// publishes it.
    ///
    /// An application can only be published if it has files, so asking to
    /// publish without any files is an error and nothing is registered.
    /// Returns the application as the catalog has it after all of that.
    pub fn register(
        &self,
        name: &str,
        workflow_type: WorkflowType,
        files: &[ApplicationFile],
        publish: bool,
    ) -> Result<Application> {
        if publish && files.is_empty() {
            return Err(Error::NothingToPublish(name.to_string()));
        }
        let request = self
            .session
            .post(self.url("workflows/hostedEntry")?)?
            .header(ACCEPT, "application/json")
            .query(&[("name", name), ("descriptorType", workflow_type.as_str())]);
        let value = self
            .session
            .send_expecting(request, StatusCode::OK)?
            .json()?;
        let mut application = Application::from_value(value)?;
        application.workflow_type = workflow_type;
        tracing::debug!("registered application {} as {}", name, application.id);

        self.upload_files(&application, files)?;
        if publish {
            self.publish(&application)?;
        }
        self.application(application.id)
    }

    /// Uploads files to, or removes files from, a hosted application.
    ///
    /// Does nothing if there are no files.
    pub fn upload_files(
        &self,
        application: &Application,
        files: &[ApplicationFile],
    ) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        let uploads = files
            .iter()
            .map(|file| file.to_upload(application.workflow_type))
            .collect::<Result<Vec<_>>>()?;
        let request = self
            .session
            .patch(self.url(&format!("workflows/hostedEntry/{}", application.id))?)?
            .header(ACCEPT, "application/json")
            .json(&uploads);
        let _ = self.session.send(request)?;
        tracing::debug!(
            "uploaded {} file(s) to application {}",
            files.len(),
            application.id
        );
        Ok(())
    }

    /// Uploads one parameter file, stored in the catalog under `catalog_path`
    /// or its own file name.
    pub fn upload_parameter_file(
        &self,
        application: &Application,
        path: impl AsRef<Path>,
        catalog_path: Option<&str>,
    ) -> Result<()> {
        let mut file = ApplicationFile::parameter(path);
        if let Some(catalog_path) = catalog_path {
            file = file.with_catalog_path(catalog_path);
        }
        self.upload_files(application, &[file])
    }

    /// Uploads one JSON file, stored in the catalog under `catalog_path` or
    /// its own file name.
    pub fn upload_json_file(
        &self,
        application: &Application,
        path: impl AsRef<Path>,
        catalog_path: Option<&str>,
    ) -> Result<()> {
        let mut file = ApplicationFile::json(path);
        if let Some(catalog_path) = catalog_path {
            file = file.with_catalog_path(catalog_path);
        }
        self.upload_files(application, &[file])
    }

    /// Returns an application's versions, as the catalog's version id mapped
    /// to the version name.
    ///
    /// Files are downloaded by version id, while the name is what people see.
    pub fn version_info(&self, application: &Application) -> Result<BTreeMap<u64, String>> {
        let request = self
            .get(&format!("workflows/{}", application.id))?
            .query(&[("include", "versions")]);
        let versions: Versions = self
            .session
            .send_expecting(request, StatusCode::OK)?
            .json()?;
        Ok(versions
            .workflow_versions
            .into_iter()
            .map(|version| (version.id, version.name))
            .collect())
    }

    /// Downloads the files of an application's latest version into `dir`.
    ///
    /// The zip archive is kept in `dir` as
    /// `application_id<id>_v<version name>.zip` next to the extracted
    /// files. Returns the path to the archive.
    pub fn download_files(
        &self,
        application: &Application,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let versions = self.version_info(application)?;
        let (version_id, version_name) = versions
            .last_key_value()
            .ok_or(Error::NoApplicationVersions(application.id))?;
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let zip_path = dir.join(format!(
            "application_id{}_v{}.zip",
            application.id, version_name
        ));

        let request = self
            .session
            .get(self.url(&format!("workflows/{}/zip/{version_id}", application.id))?)?
            .header(ACCEPT, "application/zip");
        let mut response = self.session.send_expecting(request, StatusCode::OK)?;
        let mut file = File::create(&zip_path)?;
        let _ = response.copy_to(&mut file)?;
        drop(file);

        let mut archive = ZipArchive::new(File::open(&zip_path)?)?;
        archive.extract(dir)?;
        tracing::debug!(
            "downloaded {} file(s) of application {} to {}",
            archive.len(),
            application.id,
            dir.display()
        );
        Ok(zip_path)
    }

    /// Publishes an application.
    pub fn publish(&self, application: &Application) -> Result<()> {
        self.publish_request(application, true)
    }

    /// Unpublishes an application.
    ///
    /// Hosted applications can't be deleted, only unpublished.
    pub fn unpublish(&self, application: &Application) -> Result<()> {
        self.publish_request(application, false)
    }
}
