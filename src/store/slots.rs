use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{Metrics, Task};

const TASKS_SLOT: &str = "uploaded_tasks.json";
const METRICS_SLOT: &str = "uploaded_metrics.json";
const UPLOADED_AT_SLOT: &str = "uploaded_at.json";

type Subscriber = Box<dyn Fn(&Snapshot) + Send + Sync>;

/// The single uploaded dataset plus its precomputed metrics.
/// `uploaded_at` is a unix timestamp in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub metrics: Metrics,
    pub uploaded_at: Option<i64>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// File-backed holder of the current snapshot. One upload replaces the
/// whole dataset; readers always see either the old snapshot or the new
/// one, never a mix.
pub struct SnapshotStore {
    dir: PathBuf,
    current: RwLock<Snapshot>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl SnapshotStore {
    /// Opens the store rooted at `dir`, loading whatever was persisted
    /// there. Missing or corrupt slot files fall back to an empty
    /// snapshot; opening never fails on bad data.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, String> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
        let snapshot = load_snapshot(&dir);
        Ok(Self {
            dir,
            current: RwLock::new(snapshot),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn read(&self) -> Snapshot {
        self.current.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Atomically replaces the snapshot: persist to disk first, then swap
    /// the in-memory copy, then notify subscribers.
    pub fn replace(&self, tasks: Vec<Task>, metrics: Metrics) -> Result<Snapshot, String> {
        let snapshot = Snapshot {
            tasks,
            metrics,
            uploaded_at: Some(Utc::now().timestamp_millis()),
        };
        self.persist(&snapshot)?;
        self.swap_and_notify(snapshot.clone());
        Ok(snapshot)
    }

    /// Drops the dataset entirely, on disk and in memory.
    pub fn clear(&self) -> Result<(), String> {
        for slot in [TASKS_SLOT, METRICS_SLOT, UPLOADED_AT_SLOT] {
            let path = self.dir.join(slot);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| e.to_string())?;
            }
        }
        self.swap_and_notify(Snapshot::default());
        Ok(())
    }

    /// Re-reads the slot files, picking up a replacement written by
    /// another store instance on the same directory.
    pub fn refresh_from_disk(&self) {
        let snapshot = load_snapshot(&self.dir);
        self.swap_and_notify(snapshot);
    }

    /// Registers a callback invoked after every snapshot change.
    pub fn subscribe(&self, callback: impl Fn(&Snapshot) + Send + Sync + 'static) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(Box::new(callback));
        }
    }

    fn swap_and_notify(&self, snapshot: Snapshot) {
        if let Ok(mut current) = self.current.write() {
            *current = snapshot.clone();
        }
        if let Ok(subs) = self.subscribers.lock() {
            for callback in subs.iter() {
                callback(&snapshot);
            }
        }
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<(), String> {
        write_slot(&self.dir.join(TASKS_SLOT), &snapshot.tasks)?;
        write_slot(&self.dir.join(METRICS_SLOT), &snapshot.metrics)?;
        write_slot(&self.dir.join(UPLOADED_AT_SLOT), &snapshot.uploaded_at)?;
        Ok(())
    }
}

fn write_slot<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    fs::write(path, json).map_err(|e| e.to_string())
}

fn load_snapshot(dir: &Path) -> Snapshot {
    Snapshot {
        tasks: read_slot(&dir.join(TASKS_SLOT)).unwrap_or_default(),
        metrics: read_slot(&dir.join(METRICS_SLOT)).unwrap_or_default(),
        uploaded_at: read_slot(&dir.join(UPLOADED_AT_SLOT)).unwrap_or_default(),
    }
}

fn read_slot<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("ignoring corrupt slot file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusClass;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample_task(title: &str) -> Task {
        Task {
            title: Some(title.to_string()),
            status: "Done".to_string(),
            status_class: StatusClass::Completed,
            completed_flag: true,
            ..Task::default()
        }
    }

    #[test]
    fn open_on_empty_dir_yields_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let snapshot = store.read();
        assert!(snapshot.is_empty());
        assert!(snapshot.uploaded_at.is_none());
    }

    #[test]
    fn replace_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SnapshotStore::open(dir.path()).unwrap();
            let metrics = Metrics {
                total: 1,
                completed: 1,
                completion: 100,
                ..Metrics::default()
            };
            store.replace(vec![sample_task("a")], metrics).unwrap();
        }
        let reopened = SnapshotStore::open(dir.path()).unwrap();
        let snapshot = reopened.read();
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.metrics.completion, 100);
        assert!(snapshot.uploaded_at.is_some());
    }

    #[test]
    fn corrupt_slot_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TASKS_SLOT), "{ not json").unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        assert!(store.read().is_empty());
    }

    #[test]
    fn subscribers_fire_on_replace_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        store.replace(vec![sample_task("a")], Metrics::default()).unwrap();
        store.clear().unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert!(store.read().is_empty());
    }

    #[test]
    fn refresh_picks_up_a_sibling_writer() {
        let dir = tempfile::tempdir().unwrap();
        let reader = SnapshotStore::open(dir.path()).unwrap();
        let writer = SnapshotStore::open(dir.path()).unwrap();
        writer.replace(vec![sample_task("a")], Metrics::default()).unwrap();
        assert!(reader.read().is_empty());
        reader.refresh_from_disk();
        assert_eq!(reader.read().tasks.len(), 1);
    }
}
