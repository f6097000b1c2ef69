use std::collections::HashMap;

use staging_core::FileEntry;

/// Last known listing per staging path.
///
/// A successful listing replaces the whole entry for its path; there is no
/// TTL and no partial invalidation. Accessors hand out owned snapshots, so
/// callers never hold references into live cache state.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    listings: HashMap<String, Vec<FileEntry>>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached listing for `path` wholesale.
    pub fn store(&mut self, path: &str, entries: Vec<FileEntry>) {
        self.listings.insert(path.to_string(), entries);
    }

    /// Snapshot of the cached listing for `path`, if one exists.
    pub fn get(&self, path: &str) -> Option<Vec<FileEntry>> {
        self.listings.get(path).cloned()
    }

    /// Merge newly known entries into the cached listing for `path`.
    ///
    /// Cached entries whose `name` matches one of the new entries are
    /// dropped, then the new entries are prepended so they show up at the
    /// top. A path with no cached listing starts from an empty one. Returns
    /// a snapshot of the resulting listing.
    pub fn merge_front(&mut self, path: &str, new_entries: Vec<FileEntry>) -> Vec<FileEntry> {
        let mut merged = new_entries;
        let mut kept = self.listings.remove(path).unwrap_or_default();
        kept.retain(|cached| !merged.iter().any(|fresh| fresh.name == cached.name));
        merged.append(&mut kept);
        self.listings.insert(path.to_string(), merged.clone());
        merged
    }
}
