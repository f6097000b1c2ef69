use serde::{Deserialize, Serialize};

/// A single entry in a remote directory listing.
///
/// Entries are produced by the listing endpoint and never mutated locally;
/// a re-fetch replaces them wholesale. Unknown wire fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_folder: bool,
    /// Modification time in epoch milliseconds, as reported by the server.
    pub mtime: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A named folder reference, e.g. the signed-in user's home directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub path: String,
}

/// An import-job record as returned by the job-tracking endpoints.
///
/// The backend only guarantees `id`; everything else is optional so the
/// client stays tolerant of server-side additions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub job_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// The `{ "result": ... }` wrapper every import-job endpoint responds with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub result: T,
}

/// Body of the create-import-job request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJobRequest<'a> {
    pub narrative_object_id: String,
    pub job_ids: &'a [String],
}

impl<'a> ImportJobRequest<'a> {
    pub fn new(job_ids: &'a [String], ws_id: u64, narrative_id: u64) -> Self {
        Self {
            narrative_object_id: narrative_object_ref(ws_id, narrative_id),
            job_ids,
        }
    }
}

/// Workspace object reference in the `ws.{wsId}.obj.{narrativeId}` form the
/// import backend expects.
pub fn narrative_object_ref(ws_id: u64, narrative_id: u64) -> String {
    format!("ws.{}.obj.{}", ws_id, narrative_id)
}
