use crate::{Error, Job, ProcessService, Result};
use reqwest::header::LOCATION;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

/// A process deployed to the processing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    /// The process id.
    pub id: String,

    /// The process title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// A description of the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#abstract: Option<String>,

    /// The process version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_version: Option<String>,

    /// Keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// How the process can be executed, e.g. `async-execute`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub job_control_options: Vec<String>,

    /// Everything else about the process.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Process {
    /// Creates a process with an id and nothing else.
    pub fn new(id: impl ToString) -> Process {
        Process {
            id: id.to_string(),
            title: None,
            r#abstract: None,
            process_version: None,
            keywords: Vec::new(),
            job_control_options: Vec::new(),
            additional_fields: Map::new(),
        }
    }

    /// Executes this process with `data` as the request body.
    ///
    /// The returned job's id comes from the response's `Location` header.
    pub fn execute(&self, service: &ProcessService<'_>, data: &Value) -> Result<Job> {
        let url = service.url(&format!("processes/{}/jobs", self.id))?;
        let request = service.session().post(url)?.json(data);
        let response = service.session().send(request)?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|location| location.to_str().ok())
            .ok_or(Error::MissingHeader("location"))?;
        let job_id = job_id(location).ok_or(Error::MissingHeader("location"))?;
        tracing::debug!("started job {} for process {}", job_id, self.id);
        let mut job = Job::new(job_id);
        job.process_id = Some(self.id.clone());
        job.inputs = Some(data.clone());
        Ok(job)
    }
}

/// The job id is the last segment of the job's location.
fn job_id(location: &str) -> Option<&str> {
    let path = location.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

impl Display for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Process(id={}, process_version={}, title={})",
            self.id,
            self.process_version.as_deref().unwrap_or_default(),
            self.title.as_deref().unwrap_or_default()
        )
    }
}
