// Shared wire types and the host-facing auth seam

pub mod auth;
pub mod types;

pub use auth::{AuthProvider, StaticToken};
pub use types::{FileEntry, Folder, ImportJobRequest, JobInfo, ResultEnvelope};
