use serde_json::Value;
use tokio::sync::{broadcast, watch};

use staging_core::FileEntry;

/// Selection state for the staging browser.
///
/// The tracker owns its state: hosts mutate it through `&mut self` and
/// decide how to share it. Captured sets and returned listings are by-value
/// snapshots, so nothing outside the tracker can reach into live state.
///
/// Two kinds of notification stream: the type marker is a latest-value
/// stream that replays its current value to every new subscriber, while the
/// path and count streams are plain event streams with no replay. Publishing
/// with no subscribers drops the event.
pub struct SelectionTracker {
    files: Vec<FileEntry>,
    sets: Vec<Vec<FileEntry>>,
    path_tx: broadcast::Sender<String>,
    file_count_tx: broadcast::Sender<usize>,
    set_count_tx: broadcast::Sender<usize>,
    type_tx: watch::Sender<Option<Value>>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        let (path_tx, _) = broadcast::channel(16);
        let (file_count_tx, _) = broadcast::channel(16);
        let (set_count_tx, _) = broadcast::channel(16);
        let (type_tx, _) = watch::channel(None);

        Self {
            files: Vec::new(),
            sets: Vec::new(),
            path_tx,
            file_count_tx,
            set_count_tx,
            type_tx,
        }
    }

    /// Append `file` to the selection and publish the new count.
    ///
    /// Selecting the same file twice counts twice; the tracker does not
    /// dedup.
    pub fn select_file(&mut self, file: FileEntry) {
        self.files.push(file);
        let _ = self.file_count_tx.send(self.files.len());
    }

    /// Drop every selected entry sharing `file`'s path, publish the new
    /// count, and return a snapshot of what remains selected.
    pub fn unselect_file(&mut self, file: &FileEntry) -> Vec<FileEntry> {
        self.files.retain(|selected| selected.path != file.path);
        let _ = self.file_count_tx.send(self.files.len());
        self.files.clone()
    }

    /// Publish a new active import-type marker, replacing the previous one.
    pub fn select_type(&self, marker: Value) {
        self.type_tx.send_replace(Some(marker));
    }

    /// Capture the current selection as a new set.
    ///
    /// Does nothing when the selection is empty. The captured set is a
    /// snapshot; later selection changes do not alter it. Publishes the new
    /// set count and a file count of 0, but leaves the live selection
    /// untouched.
    pub fn add_set(&mut self) {
        if self.files.is_empty() {
            return;
        }
        self.sets.push(self.files.clone());
        let _ = self.set_count_tx.send(self.sets.len());
        let _ = self.file_count_tx.send(0);
    }

    /// Drop the whole selection and publish a count of 0.
    pub fn clear_selected(&mut self) {
        self.files.clear();
        let _ = self.file_count_tx.send(0);
    }

    /// Publish the staging path the user is now browsing.
    pub fn set_path(&self, path: impl Into<String>) {
        let _ = self.path_tx.send(path.into());
    }

    /// Currently selected files, in selection order.
    pub fn selected_files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Captured sets, oldest first.
    pub fn sets(&self) -> &[Vec<FileEntry>] {
        &self.sets
    }

    /// Event stream of browsed paths. No replay.
    pub fn subscribe_path(&self) -> broadcast::Receiver<String> {
        self.path_tx.subscribe()
    }

    /// Event stream of selected-file counts. No replay.
    pub fn subscribe_file_count(&self) -> broadcast::Receiver<usize> {
        self.file_count_tx.subscribe()
    }

    /// Event stream of captured-set counts. No replay.
    pub fn subscribe_set_count(&self) -> broadcast::Receiver<usize> {
        self.set_count_tx.subscribe()
    }

    /// Latest-value stream of the active import-type marker. New subscribers
    /// immediately see the current value, `None` until a type is selected.
    pub fn subscribe_type(&self) -> watch::Receiver<Option<Value>> {
        self.type_tx.subscribe()
    }
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::broadcast::error::TryRecvError;

    fn entry(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: format!("/alice/{}", name),
            is_folder: false,
            mtime: 0,
            size: None,
        }
    }

    #[test]
    fn test_select_publishes_count() {
        let mut tracker = SelectionTracker::new();
        let mut counts = tracker.subscribe_file_count();

        tracker.select_file(entry("a.fastq"));
        tracker.select_file(entry("b.fastq"));

        assert_eq!(counts.try_recv().unwrap(), 1);
        assert_eq!(counts.try_recv().unwrap(), 2);
        assert_eq!(tracker.selected_files().len(), 2);
    }

    #[test]
    fn test_duplicate_selection_counts_twice() {
        // Re-selecting an already-selected file is kept as two entries.
        let mut tracker = SelectionTracker::new();
        tracker.select_file(entry("a.fastq"));
        tracker.select_file(entry("a.fastq"));

        assert_eq!(tracker.selected_files().len(), 2);
    }

    #[test]
    fn test_unselect_removes_every_path_match() {
        let mut tracker = SelectionTracker::new();
        tracker.select_file(entry("a.fastq"));
        tracker.select_file(entry("b.fastq"));
        tracker.select_file(entry("a.fastq"));

        let remaining = tracker.unselect_file(&entry("a.fastq"));

        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "b.fastq");
        assert_eq!(tracker.selected_files(), remaining.as_slice());
    }

    #[test]
    fn test_add_set_snapshots_selection() {
        let mut tracker = SelectionTracker::new();
        tracker.select_file(entry("a.fastq"));
        tracker.select_file(entry("b.fastq"));
        tracker.add_set();

        // Mutating the live selection must not reach into the captured set.
        tracker.unselect_file(&entry("a.fastq"));
        tracker.select_file(entry("c.fastq"));

        assert_eq!(tracker.sets().len(), 1);
        let names: Vec<&str> = tracker.sets()[0].iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.fastq", "b.fastq"]);
    }

    #[test]
    fn test_add_set_keeps_live_selection_and_publishes_zero() {
        let mut tracker = SelectionTracker::new();
        tracker.select_file(entry("a.fastq"));

        let mut file_counts = tracker.subscribe_file_count();
        let mut set_counts = tracker.subscribe_set_count();
        tracker.add_set();

        assert_eq!(set_counts.try_recv().unwrap(), 1);
        assert_eq!(file_counts.try_recv().unwrap(), 0);
        // The published 0 is a display reset; the selection itself survives.
        assert_eq!(tracker.selected_files().len(), 1);
    }

    #[test]
    fn test_add_set_with_empty_selection_is_noop() {
        let mut tracker = SelectionTracker::new();
        let mut set_counts = tracker.subscribe_set_count();

        tracker.add_set();

        assert!(tracker.sets().is_empty());
        assert!(matches!(set_counts.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_clear_selected() {
        let mut tracker = SelectionTracker::new();
        tracker.select_file(entry("a.fastq"));
        let mut counts = tracker.subscribe_file_count();

        tracker.clear_selected();

        assert!(tracker.selected_files().is_empty());
        assert_eq!(counts.try_recv().unwrap(), 0);
    }

    #[test]
    fn test_type_marker_replays_to_new_subscribers() {
        let tracker = SelectionTracker::new();
        assert!(tracker.subscribe_type().borrow().is_none());

        tracker.select_type(json!({"id": "fastq_reads"}));

        // Subscribed after the fact, yet sees the latest value.
        let rx = tracker.subscribe_type();
        assert_eq!(*rx.borrow(), Some(json!({"id": "fastq_reads"})));
    }

    #[test]
    fn test_count_streams_do_not_replay() {
        let mut tracker = SelectionTracker::new();
        tracker.select_file(entry("a.fastq"));

        // Subscribed after the event; nothing is replayed.
        let mut counts = tracker.subscribe_file_count();
        assert!(matches!(counts.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_set_path_event() {
        let tracker = SelectionTracker::new();
        let mut paths = tracker.subscribe_path();

        tracker.set_path("/alice/reads");

        assert_eq!(paths.try_recv().unwrap(), "/alice/reads");
    }
}
