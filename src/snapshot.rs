use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::NoteStore;

const SNAPSHOT_VERSION: u32 = 1;

/// Mirror of the in-memory note list written on exit. The notes directory
/// itself stays canonical; the snapshot only restores the last selection
/// and lets the info sheet show counts before the first load finishes.
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct Snapshot {
    /// Snapshot format version (for migrations)
    pub version: u32,
    /// Notes directory this snapshot was taken of
    pub notes_dir: String,
    pub notes: Vec<SnapshotNote>,
    /// Filename of the selected note; ids are regenerated on every load,
    /// so the filename is the stable handle across sessions.
    pub selected: Option<String>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SnapshotNote {
    pub id: Uuid,
    pub text: String,
    pub modified: SystemTime,
    pub tags: Vec<String>,
    pub filename: String,
}

impl Snapshot {
    pub fn capture(store: &NoteStore, notes_dir: &Path, selected: Option<&str>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            notes_dir: notes_dir.to_string_lossy().to_string(),
            notes: store
                .sorted()
                .iter()
                .map(|note| SnapshotNote {
                    id: note.id,
                    text: note.text.clone(),
                    modified: note.modified,
                    tags: note.tags.clone(),
                    filename: note.filename.clone(),
                })
                .collect(),
            selected: selected.map(|s| s.to_string()),
        }
    }
}

/// Cache location for a directory's snapshot
pub fn get_snapshot_path(notes_dir: &Path) -> PathBuf {
    let cache_base = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(std::env::var("HOME").unwrap_or_default()).join(".cache"));

    // 8-char hash of the notes directory keeps snapshots apart per vault
    let hash = {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        notes_dir.hash(&mut hasher);
        format!("{:016x}", hasher.finish())[..8].to_string()
    };

    cache_base.join("flatnote").join(hash).join("snapshot.bin")
}

/// Load a snapshot from disk; version mismatches are discarded
pub fn load_snapshot(path: &Path) -> Option<Snapshot> {
    let file = fs::File::open(path).ok()?;
    let reader = BufReader::new(file);
    let snapshot: Snapshot = bincode::deserialize_from(reader).ok()?;
    if snapshot.version != SNAPSHOT_VERSION {
        return None;
    }
    Some(snapshot)
}

/// Save a snapshot to disk
pub fn save_snapshot(snapshot: &Snapshot, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, snapshot).map_err(std::io::Error::other)
}
