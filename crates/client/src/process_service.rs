//! The processing service, for deploying processes and running jobs.

use crate::{Job, Process, Result, Session};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

const PROCESS_SERVICE_PATH: &str = "ades-wpst/";

/// A client for the processing service of one venue.
///
/// # Examples
///
/// ```no_run
/// use serde_json::json;
/// use unity_sds_client::{Environment, Settings, Unity};
///
/// let settings = Settings::new(Some("environments.ini")).unwrap();
/// let mut unity = Unity::new(Environment::Dev, settings).unwrap();
/// unity.set_project("sounder");
/// unity.set_venue("dev");
/// let process_service = unity.process_service().unwrap();
/// let process = process_service.process("chirp-rebinning").unwrap();
/// let job = process.execute(&process_service, &json!({"inputs": {}})).unwrap();
/// println!("{}", job.status(&process_service).unwrap());
/// ```
#[derive(Debug)]
pub struct ProcessService<'a> {
    session: &'a Session,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct Processes {
    processes: Vec<Process>,
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    process: Process,
}

#[derive(Debug, Deserialize)]
struct Jobs {
    jobs: Vec<Job>,
}

impl<'a> ProcessService<'a> {
    /// Creates a processing service at `<unity_href><venue_id>/ades-wpst/`.
    ///
    /// The session needs a venue id, or a project and a venue.
    pub fn new(session: &'a Session) -> Result<ProcessService<'a>> {
        let endpoint = session
            .unity_href()
            .join(&format!("{}/{PROCESS_SERVICE_PATH}", session.venue_id()?))?;
        Ok(ProcessService::with_endpoint(session, endpoint))
    }

    /// Creates a processing service at a custom endpoint.
    pub fn with_endpoint(session: &'a Session, endpoint: Url) -> ProcessService<'a> {
        ProcessService { session, endpoint }
    }

    /// Returns this service's endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns this service's session.
    pub fn session(&self) -> &Session {
        self.session
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        Ok(self.endpoint.join(path)?)
    }

    /// Returns the deployed processes.
    pub fn processes(&self) -> Result<Vec<Process>> {
        let request = self.session.get(self.url("processes")?)?;
        let processes: Processes = self.session.send(request)?.json()?;
        Ok(processes.processes)
    }

    /// Returns one process.
    pub fn process(&self, id: &str) -> Result<Process> {
        let request = self.session.get(self.url(&format!("processes/{id}"))?)?;
        let response: ProcessResponse = self.session.send(request)?.json()?;
        Ok(response.process)
    }

    /// Returns the jobs of a process.
    pub fn jobs(&self, process: &Process) -> Result<Vec<Job>> {
        let request = self
            .session
            .get(self.url(&format!("processes/{}/jobs", process.id))?)?;
        let jobs: Jobs = self.session.send(request)?.json()?;
        Ok(jobs
            .jobs
            .into_iter()
            .map(|mut job| {
                if job.process_id.is_none() {
                    job.process_id = Some(process.id.clone());
                }
                job
            })
            .collect())
    }

    /// Deploys a process from its description.
    pub fn deploy_process(&self, data: &Value) -> Result<()> {
        let request = self.session.post(self.url("processes")?)?.json(data);
        let _ = self.session.send(request)?;
        Ok(())
    }
}
