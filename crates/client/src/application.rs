use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

/// A kind of workflow that Unity can host in its application catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkflowType {
    /// Common Workflow Language.
    #[default]
    Cwl,
}

impl WorkflowType {
    /// Returns the catalog's name for this workflow type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::Cwl => "CWL",
        }
    }

    /// Returns the catalog's file type for this workflow's descriptor and
    /// parameter files.
    pub fn parameter_file_type(&self) -> &'static str {
        match self {
            WorkflowType::Cwl => "DOCKSTORE_CWL",
        }
    }

    /// Returns the catalog's file type for this workflow's JSON files.
    pub fn json_file_type(&self) -> &'static str {
        match self {
            WorkflowType::Cwl => "CWL_TEST_JSON",
        }
    }
}

impl Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CWL" => Ok(WorkflowType::Cwl),
            _ => Err(Error::InvalidWorkflowType(s.to_string())),
        }
    }
}

/// An application package in the application catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    /// The catalog's id for this application.
    pub id: u64,

    /// The name, which is the last segment of the full workflow path.
    pub name: String,

    /// The source repository, if the application isn't hosted.
    pub source_repository: Option<String>,

    /// The path of the primary descriptor.
    pub workflow_path: String,

    /// Whether the application is published.
    pub is_published: bool,

    /// The description.
    pub description: String,

    /// The workflow type.
    pub workflow_type: WorkflowType,

    /// Everything the catalog said about this application.
    pub info: Value,
}

#[derive(Debug, Deserialize)]
struct Workflow {
    id: u64,
    full_workflow_path: String,
    #[serde(rename = "gitUrl", default)]
    git_url: Option<String>,
    #[serde(default)]
    workflow_path: Option<String>,
    #[serde(default)]
    is_published: bool,
    #[serde(default)]
    description: Option<String>,
}

const DEFAULT_WORKFLOW_PATH: &str = "Dockstore.cwl";

impl Application {
    /// Creates an application from the catalog's description of a workflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use unity_sds_client::Application;
    ///
    /// let application = Application::from_value(json!({
    ///     "id": 42,
    ///     "full_workflow_path": "dockstore.org/a-user/l1a-pge",
    ///     "is_published": true,
    /// }))
    /// .unwrap();
    /// assert_eq!(application.id, 42);
    /// assert_eq!(application.name, "l1a-pge");
    /// assert_eq!(application.workflow_path, "Dockstore.cwl");
    /// ```
    pub fn from_value(value: Value) -> Result<Application> {
        let workflow: Workflow = serde_json::from_value(value.clone())?;
        let name = workflow
            .full_workflow_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(Application {
            id: workflow.id,
            name,
            source_repository: workflow.git_url.filter(|url| !url.is_empty()),
            workflow_path: workflow
                .workflow_path
                .unwrap_or_else(|| DEFAULT_WORKFLOW_PATH.to_string()),
            is_published: workflow.is_published,
            description: workflow.description.unwrap_or_default(),
            workflow_type: WorkflowType::Cwl,
            info: value,
        })
    }
}

impl Display for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Application(id={}, name={}, published={})",
            self.id, self.name, self.is_published
        )
    }
}

/// What a file holds, which decides its type in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationFileKind {
    /// A workflow descriptor or parameter file, e.g. a `.cwl` file.
    Parameter,

    /// A JSON file, e.g. a job inputs file.
    Json,
}

/// A file to upload to, or remove from, a hosted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFile {
    kind: ApplicationFileKind,
    local_path: Option<PathBuf>,
    catalog_path: String,
}

impl ApplicationFile {
    /// Uploads a local parameter file, stored in the catalog under its file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds_client::ApplicationFile;
    ///
    /// let file = ApplicationFile::parameter("workflows/l1a.cwl");
    /// assert_eq!(file.catalog_path(), "/l1a.cwl");
    /// let file = file.with_catalog_path("l1/l1a.cwl");
    /// assert_eq!(file.catalog_path(), "/l1/l1a.cwl");
    /// ```
    pub fn parameter(path: impl AsRef<Path>) -> ApplicationFile {
        ApplicationFile::local(ApplicationFileKind::Parameter, path.as_ref())
    }

    /// Uploads a local JSON file, stored in the catalog under its file name.
    pub fn json(path: impl AsRef<Path>) -> ApplicationFile {
        ApplicationFile::local(ApplicationFileKind::Json, path.as_ref())
    }

    /// Removes a file from a hosted application.
    pub fn removal(kind: ApplicationFileKind, catalog_path: impl AsRef<str>) -> ApplicationFile {
        ApplicationFile {
            kind,
            local_path: None,
            catalog_path: absolute_catalog_path(catalog_path.as_ref()),
        }
    }

    fn local(kind: ApplicationFileKind, path: &Path) -> ApplicationFile {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        ApplicationFile {
            kind,
            local_path: Some(path.to_path_buf()),
            catalog_path: absolute_catalog_path(&file_name),
        }
    }

    /// Sets where this file is stored in the catalog.
    pub fn with_catalog_path(mut self, catalog_path: impl AsRef<str>) -> ApplicationFile {
        self.catalog_path = absolute_catalog_path(catalog_path.as_ref());
        self
    }

    /// Returns the kind of file.
    pub fn kind(&self) -> ApplicationFileKind {
        self.kind
    }

    /// Returns the local path, or `None` for a removal.
    pub fn local_path(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }

    /// Returns where this file is stored in the catalog, always starting with `/`.
    pub fn catalog_path(&self) -> &str {
        &self.catalog_path
    }

    /// Returns the catalog's JSON for this file, reading its contents.
    ///
    /// A removal has `null` content.
    pub(crate) fn to_upload(&self, workflow_type: WorkflowType) -> Result<Value> {
        let content = match &self.local_path {
            Some(path) => Value::String(std::fs::read_to_string(path)?),
            None => Value::Null,
        };
        let r#type = match self.kind {
            ApplicationFileKind::Parameter => workflow_type.parameter_file_type(),
            ApplicationFileKind::Json => workflow_type.json_file_type(),
        };
        Ok(json!({
            "path": self.catalog_path,
            "absolutePath": self.catalog_path,
            "content": content,
            "type": r#type,
        }))
    }
}

fn absolute_catalog_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
