// Client service for the staging-area backend: directory listings with an
// in-memory cache, import-job CRUD, and selection tracking for the UI.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod selection;

pub use cache::DirectoryCache;
pub use client::StagingClient;
pub use config::ServiceConfig;
pub use error::{Result, StagingError};
pub use selection::SelectionTracker;

pub use staging_core::{AuthProvider, FileEntry, Folder, JobInfo, StaticToken};
