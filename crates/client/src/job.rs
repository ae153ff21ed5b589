use crate::{ProcessService, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

/// The status of a processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// The job has been accepted but hasn't started.
    Accepted,

    /// The job was dismissed.
    Dismissed,

    /// The job failed.
    Failed,

    /// The job is running.
    Running,

    /// The job finished successfully.
    Succeeded,
}

impl JobStatus {
    /// Returns true if the job won't change status again.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            JobStatus::Dismissed | JobStatus::Failed | JobStatus::Succeeded
        )
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            JobStatus::Accepted => "accepted",
            JobStatus::Dismissed => "dismissed",
            JobStatus::Failed => "failed",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
        })
    }
}

/// A processing job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// The job id.
    #[serde(rename = "jobID")]
    pub id: String,

    /// The process that this job runs, if known.
    #[serde(rename = "processID", default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,

    /// The last known status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,

    /// The job inputs, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Value>,
}

impl Job {
    /// Creates a job with an id and nothing else.
    pub fn new(id: impl ToString) -> Job {
        Job {
            id: id.to_string(),
            process_id: None,
            status: None,
            inputs: None,
        }
    }

    /// Fetches this job's current state.
    pub fn status(&self, service: &ProcessService<'_>) -> Result<Job> {
        let url = service.url(&format!("jobs/{}", self.id))?;
        let job: Job = service.session().send(service.session().get(url)?)?.json()?;
        Ok(self.merged(job))
    }

    /// Fetches this job's results.
    pub fn result(&self, service: &ProcessService<'_>) -> Result<Value> {
        let url = service.url(&format!("jobs/{}/results", self.id))?;
        Ok(service
            .session()
            .send(service.session().get(url)?)?
            .json()?)
    }

    /// Dismisses this job, returning its new state.
    pub fn dismiss(&self, service: &ProcessService<'_>) -> Result<Job> {
        let url = service.url(&format!("jobs/{}", self.id))?;
        let job: Job = service
            .session()
            .send(service.session().delete(url)?)?
            .json()?;
        tracing::debug!("dismissed job {}", self.id);
        Ok(self.merged(job))
    }

    /// Fills in what the service left out of `job` from what we already know.
    fn merged(&self, job: Job) -> Job {
        Job {
            process_id: job.process_id.or_else(|| self.process_id.clone()),
            inputs: job.inputs.or_else(|| self.inputs.clone()),
            ..job
        }
    }
}

impl Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Job(id={}, process={}, status={})",
            self.id,
            self.process_id.as_deref().unwrap_or_default(),
            self.status.map(|status| status.to_string()).unwrap_or_default()
        )
    }
}
