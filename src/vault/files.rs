use std::fs;
use std::time::SystemTime;

use super::Vault;
use crate::store::Note;

/// File persistence over the resolved directory: one UTF-8 `.txt` file per
/// note, named after the note's first line. Failures are logged and reported
/// as sentinel values; the in-memory store stays authoritative either way.
impl Vault {
    /// Write a note body to `<filename>.txt`, overwriting any existing
    /// content. Fire-and-forget: errors are logged and swallowed, a failed
    /// save is retried only by the next edit or autosave tick.
    pub fn save(&self, filename: &str, contents: &str) {
        let scope = match self.scope() {
            Ok(scope) => scope,
            Err(e) => {
                tracing::warn!("save '{}' aborted: {}", filename, e);
                return;
            }
        };
        let path = scope.note_path(filename);
        tracing::debug!("saving {}", path.display());
        if let Err(e) = fs::write(&path, contents) {
            tracing::warn!("could not save {}: {}", path.display(), e);
        }
    }

    /// Remove `<filename>.txt`. Returns false on any failure, including a
    /// file that was never there.
    pub fn delete(&self, filename: &str) -> bool {
        let scope = match self.scope() {
            Ok(scope) => scope,
            Err(e) => {
                tracing::warn!("delete '{}' aborted: {}", filename, e);
                return false;
            }
        };
        let path = scope.note_path(filename);
        tracing::debug!("deleting {}", path.display());
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("could not delete {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Move `<old>.txt` to `<new>.txt`. Returns false when the source is
    /// missing or the move fails. An existing destination is overwritten by
    /// the underlying rename.
    pub fn rename(&self, old: &str, new: &str) -> bool {
        let scope = match self.scope() {
            Ok(scope) => scope,
            Err(e) => {
                tracing::warn!("rename '{}' -> '{}' aborted: {}", old, new, e);
                return false;
            }
        };
        let from = scope.note_path(old);
        let to = scope.note_path(new);
        if !from.exists() {
            tracing::warn!("rename source missing: {}", from.display());
            return false;
        }
        tracing::debug!("renaming {} -> {}", from.display(), to.display());
        match fs::rename(&from, &to) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("could not rename {}: {}", from.display(), e);
                false
            }
        }
    }

    /// Reconstruct one note per non-hidden `.txt` file in the directory.
    /// The first line of the content is the title, the filesystem mtime the
    /// timestamp. Unreadable entries are logged and skipped.
    pub fn load_all(&self) -> Vec<Note> {
        let scope = match self.scope() {
            Ok(scope) => scope,
            Err(e) => {
                tracing::warn!("load aborted: {}", e);
                return Vec::new();
            }
        };

        let entries = match fs::read_dir(scope.dir()) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("could not list {}: {}", scope.dir().display(), e);
                return Vec::new();
            }
        };

        let mut notes = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_note_file(&path) {
                continue;
            }
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            let modified = fs::metadata(&path)
                .and_then(|m| m.modified())
                .unwrap_or_else(|_| SystemTime::now());
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            notes.push(Note::from_file(&stem, text, modified));
        }
        tracing::info!("loaded {} notes from {}", notes.len(), scope.dir().display());
        notes
    }

    /// True iff the directory holds no non-hidden `.txt` file. Also true
    /// when the directory cannot be read at all.
    pub fn is_note_dir_empty(&self) -> bool {
        let scope = match self.scope() {
            Ok(scope) => scope,
            Err(e) => {
                tracing::warn!("empty check aborted: {}", e);
                return true;
            }
        };
        match fs::read_dir(scope.dir()) {
            Ok(entries) => !entries
                .flatten()
                .any(|entry| is_note_file(&entry.path())),
            Err(_) => true,
        }
    }
}

fn is_note_file(path: &std::path::Path) -> bool {
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true);
    !hidden && path.extension().map(|e| e == "txt").unwrap_or(false) && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault_in(dir: &std::path::Path) -> Vault {
        Vault::open(dir).unwrap()
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());
        let body = "Hello\nworld with üñïçødé\n";

        vault.save("Hello", body);

        let notes = vault.load_all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, body);
        assert_eq!(notes[0].filename, "Hello");
        assert_eq!(notes[0].disk_filename.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_save_twice_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());

        vault.save("Note", "same content");
        vault.save("Note", "same content");

        let notes = vault.load_all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "same content");
    }

    #[test]
    fn test_save_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());

        vault.save("Note", "old");
        vault.save("Note", "new");

        let contents = fs::read_to_string(tmp.path().join("Note.txt")).unwrap();
        assert_eq!(contents, "new");
    }

    #[test]
    fn test_delete_missing_returns_false() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());
        assert!(!vault.delete("never existed"));
    }

    #[test]
    fn test_delete_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());
        vault.save("Gone", "x");

        assert!(vault.delete("Gone"));
        assert!(!tmp.path().join("Gone.txt").exists());
    }

    #[test]
    fn test_rename_moves_file() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());
        vault.save("Hello", "Hello\nworld");

        assert!(vault.rename("Hello", "Goodbye"));
        assert!(!tmp.path().join("Hello.txt").exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join("Goodbye.txt")).unwrap(),
            "Hello\nworld"
        );
    }

    #[test]
    fn test_rename_missing_source_returns_false() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());
        assert!(!vault.rename("nope", "other"));
    }

    #[test]
    fn test_load_skips_hidden_and_foreign_files() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());
        fs::write(tmp.path().join(".hidden.txt"), "secret").unwrap();
        fs::write(tmp.path().join("image.png"), [0u8; 4]).unwrap();
        fs::write(tmp.path().join("Real.txt"), "Real\nnote").unwrap();

        let notes = vault.load_all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].filename, "Real");
    }

    #[test]
    fn test_empty_check_ignores_hidden_and_foreign() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());
        assert!(vault.is_note_dir_empty());

        fs::write(tmp.path().join(".hidden.txt"), "x").unwrap();
        fs::write(tmp.path().join("readme.md"), "x").unwrap();
        assert!(vault.is_note_dir_empty());

        fs::write(tmp.path().join("One.txt"), "One").unwrap();
        assert!(!vault.is_note_dir_empty());
    }

    #[test]
    fn test_mtime_becomes_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = vault_in(tmp.path());
        vault.save("Stamp", "Stamp");

        let mtime = fs::metadata(tmp.path().join("Stamp.txt"))
            .unwrap()
            .modified()
            .unwrap();
        let notes = vault.load_all();
        assert_eq!(notes[0].modified, mtime);
    }
}
