//! Job tracker: the applicant's applications, kept usable when the backend is down.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use saarthi_jobs::marketplace::domain::{ApplicationForm, JobApplication};
use tracing::{info, warn};

use crate::client::SaarthiClient;
use crate::error::ClientError;

/// Local copy of the tracker records.
pub trait TrackerCache: Send + Sync {
    /// `None` when nothing has been cached yet.
    fn load(&self) -> Result<Option<Vec<JobApplication>>, ClientError>;

    fn store(&self, applications: &[JobApplication]) -> Result<(), ClientError>;
}

/// Tracker cache persisted as one JSON document.
#[derive(Debug, Clone)]
pub struct FileTrackerCache {
    path: PathBuf,
}

impl FileTrackerCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrackerCache for FileTrackerCache {
    fn load(&self) -> Result<Option<Vec<JobApplication>>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn store(&self, applications: &[JobApplication]) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(applications)?)?;
        Ok(())
    }
}

/// Backend records replace cached ones for the same job; cached entries for jobs the
/// backend does not know about are kept. Newest application first.
pub fn merge(remote: Vec<JobApplication>, cached: Vec<JobApplication>) -> Vec<JobApplication> {
    let remote_jobs: HashSet<_> = remote.iter().map(|app| app.job_id.clone()).collect();
    let mut merged = remote;
    merged.extend(
        cached
            .into_iter()
            .filter(|app| !remote_jobs.contains(&app.job_id)),
    );
    merged.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
    merged
}

pub struct JobTracker<C> {
    client: SaarthiClient,
    cache: C,
}

impl<C: TrackerCache> JobTracker<C> {
    pub fn new(client: SaarthiClient, cache: C) -> Self {
        Self { client, cache }
    }

    fn cached(&self) -> Vec<JobApplication> {
        match self.cache.load() {
            Ok(records) => records.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable tracker cache");
                Vec::new()
            }
        }
    }

    fn remember(&self, applications: &[JobApplication]) {
        if let Err(err) = self.cache.store(applications) {
            warn!(error = %err, "failed to refresh tracker cache");
        }
    }

    /// Current applications, merged with the local cache.
    ///
    /// A backend failure falls back to the cached records; the error is returned
    /// only when there is no cache to fall back to.
    pub async fn load(&self) -> Result<Vec<JobApplication>, ClientError> {
        match self.client.my_applications().await {
            Ok(remote) => {
                let merged = merge(remote, self.cached());
                self.remember(&merged);
                info!(count = merged.len(), "tracker loaded from backend");
                Ok(merged)
            }
            Err(err) => {
                warn!(error = %err, "backend unavailable; serving cached tracker");
                match self.cache.load() {
                    Ok(Some(cached)) => Ok(merge(Vec::new(), cached)),
                    _ => Err(err),
                }
            }
        }
    }

    /// Record an application on the backend and add it to the cache.
    pub async fn record(&self, form: &ApplicationForm) -> Result<JobApplication, ClientError> {
        let application = self.client.record_application(form).await?;
        let merged = merge(vec![application.clone()], self.cached());
        self.remember(&merged);
        Ok(application)
    }
}
