//! Staging client — authenticated directory listings, the per-path listing
//! cache, and import-job CRUD against the staging backend.

use std::sync::Arc;

use futures_util::future::try_join_all;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use staging_core::auth::AuthProvider;
use staging_core::types::{FileEntry, Folder, ImportJobRequest, JobInfo, ResultEnvelope};

use crate::cache::DirectoryCache;
use crate::config::ServiceConfig;
use crate::error::{normalize_error_body, Result, StagingError};

/// Client for the staging-area backend.
///
/// Holds the configured endpoint, the host's auth provider, and the cache of
/// the last listing per path. The auth token is asked for on every request,
/// so hosts that rotate credentials never send a stale one.
pub struct StagingClient {
    http: reqwest::Client,
    base_url: String,
    root: String,
    auth: Arc<dyn AuthProvider>,
    cache: Mutex<DirectoryCache>,
}

impl StagingClient {
    pub fn new(config: &ServiceConfig, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.services.ftp.url.trim_end_matches('/').to_string(),
            root: config.services.ftp.root.clone(),
            auth,
            cache: Mutex::new(DirectoryCache::new()),
        }
    }

    /// Root directory of the staging area, as configured by the host.
    pub fn root_directory(&self) -> &str {
        &self.root
    }

    /// Home folder of the signed-in user, `/{username}`.
    pub fn home_folder(&self) -> Folder {
        let username = self.auth.username();
        Folder {
            path: format!("/{}", username),
            name: username,
        }
    }

    /// List the staging directory at `path`, or the user's home folder when
    /// no path is given.
    ///
    /// Folders sort before files and each group is ordered newest first;
    /// entries with equal mtime keep the order the server sent. The result
    /// replaces the cached listing for the path. A failed request leaves the
    /// cache untouched.
    pub async fn list(&self, path: Option<&str>) -> Result<Vec<FileEntry>> {
        let path = match path {
            Some(p) => p.to_string(),
            None => format!("/{}", self.auth.username()),
        };
        let url = format!("{}/list/{}", self.base_url, path);

        let resp = self.send(self.http.get(&url)).await?;
        let body = resp.bytes().await?;
        let entries: Vec<FileEntry> = decode(&body)?;

        let listing = order_listing(entries);
        self.cache.lock().await.store(&path, listing.clone());

        info!("listed {}: {} entries", path, listing.len());
        Ok(listing)
    }

    /// Merge newly known entries (for example files that just finished
    /// uploading) into the cached listing for `path`, replacing cached
    /// entries with the same name and placing the new ones at the top.
    /// Returns the resulting listing.
    pub async fn add_to_cache(&self, entries: Vec<FileEntry>, path: &str) -> Vec<FileEntry> {
        self.cache.lock().await.merge_front(path, entries)
    }

    /// Snapshot of the cached listing for `path`, if one exists.
    pub async fn cached(&self, path: &str) -> Option<Vec<FileEntry>> {
        self.cache.lock().await.get(path)
    }

    /// Fetch the user's import jobs.
    pub async fn list_imports(&self) -> Result<Vec<JobInfo>> {
        let url = format!("{}/import-jobs", self.base_url);
        let jobs: Vec<JobInfo> = self.get_result(&url).await?;

        debug!("fetched {} import jobs", jobs.len());
        Ok(jobs)
    }

    /// Register a new import job tying `job_ids` to the given narrative.
    pub async fn create_import_job(
        &self,
        job_ids: &[String],
        workspace_id: u64,
        narrative_id: u64,
    ) -> Result<JobInfo> {
        info!("creating import job: {:?}", job_ids);

        let request = ImportJobRequest::new(job_ids, workspace_id, narrative_id);
        let url = format!("{}/import-jobs", self.base_url);
        let resp = self.send(self.http.post(url).json(&request)).await?;

        let body = resp.bytes().await?;
        let envelope: ResultEnvelope<JobInfo> = decode(&body)?;
        Ok(envelope.result)
    }

    /// Delete a single import job.
    pub async fn delete_import(&self, job_id: &str) -> Result<JobInfo> {
        let url = format!("{}/import-job/{}", self.base_url, job_id);
        let resp = self.send(self.http.delete(url)).await?;

        let body = resp.bytes().await?;
        let envelope: ResultEnvelope<JobInfo> = decode(&body)?;

        info!("deleted import job {}", job_id);
        Ok(envelope.result)
    }

    /// Delete several import jobs concurrently. Fails as soon as any single
    /// delete fails; on success the results line up with `job_ids`.
    pub async fn delete_imports(&self, job_ids: &[String]) -> Result<Vec<JobInfo>> {
        try_join_all(job_ids.iter().map(|id| self.delete_import(id))).await
    }

    /// Fetch the details of a single import job.
    pub async fn get_import_info(&self, job_id: &str) -> Result<JobInfo> {
        let url = format!("{}/import-job/{}", self.base_url, job_id);
        let job: JobInfo = self.get_result(&url).await?;

        debug!("fetched import job info for {}", job_id);
        Ok(job)
    }

    /// GET `url` and unwrap the `{"result": ...}` envelope the import-job
    /// endpoints respond with.
    async fn get_result<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.send(self.http.get(url)).await?;
        let body = resp.bytes().await?;
        let envelope: ResultEnvelope<T> = decode(&body)?;
        Ok(envelope.result)
    }

    /// Attach the current auth token, send, and check the response status.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let token = self.token().await?;
        let resp = match req.header(AUTHORIZATION, token).send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!("staging request failed to send: {}", e);
                return Err(e.into());
            }
        };
        check_status(resp).await
    }

    /// Ask the host for the current token. Called once per request.
    async fn token(&self) -> Result<String> {
        self.auth.token().await.map_err(|e| {
            error!("auth provider failed: {:#}", e);
            StagingError::Auth(format!("{:#}", e))
        })
    }
}

/// Map a non-success response to the normalized error: the body's `error`
/// field when present, else "Server error".
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = normalize_error_body(&body);
    error!("staging request failed: {} - {}", status, message);
    Err(StagingError::Server { status, message })
}

/// Decode a response body, logging the payload shape mismatch on failure.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        error!("unexpected response body: {}", e);
        StagingError::Decode(e)
    })
}

/// Order a raw listing for display: folders before files, each group by
/// mtime descending. The sort is stable, so entries with equal mtime keep
/// the order the server sent them in.
fn order_listing(mut entries: Vec<FileEntry>) -> Vec<FileEntry> {
    entries.sort_by(|a, b| {
        b.is_folder
            .cmp(&a.is_folder)
            .then_with(|| b.mtime.cmp(&a.mtime))
    });
    entries
}
