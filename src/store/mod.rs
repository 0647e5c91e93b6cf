pub mod slots;

pub use slots::{Snapshot, SnapshotStore};
