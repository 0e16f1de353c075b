use std::time::SystemTime;

use uuid::Uuid;

/// Display title used when the first line of a note is empty.
pub const UNTITLED: &str = "No Title";

/// Derive a note's backing filename (no extension) from its text: the first
/// line, stripped of newlines, with path separators replaced so a title can
/// never escape the notes directory.
pub fn derive_filename(text: &str) -> String {
    text.lines()
        .next()
        .unwrap_or("")
        .trim_end_matches('\r')
        .replace(['/', '\\'], "-")
}

#[derive(Debug, Clone)]
pub struct Note {
    pub id: Uuid,
    pub text: String,
    pub modified: SystemTime,
    pub tags: Vec<String>,
    /// Filename derived from the current first line (no extension).
    pub filename: String,
    /// Stem of the file this note was last persisted under, `None` until the
    /// first flush. When it differs from `filename` the flush renames first.
    pub disk_filename: Option<String>,
    /// Dirty flag: edited since the last flush.
    pub changed: bool,
}

impl Note {
    /// A fresh, empty note created by the "new note" action.
    pub fn new(now: SystemTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: String::new(),
            modified: now,
            tags: Vec::new(),
            filename: String::new(),
            disk_filename: None,
            changed: false,
        }
    }

    /// A note reconstructed from a file on disk. The title comes from the
    /// first line of the content; `stem` is the actual on-disk name so a
    /// later flush renames the real file.
    pub fn from_file(stem: &str, text: String, modified: SystemTime) -> Self {
        let filename = derive_filename(&text);
        Self {
            id: Uuid::new_v4(),
            filename,
            disk_filename: Some(stem.to_string()),
            text,
            modified,
            tags: Vec::new(),
            changed: false,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.filename.is_empty() {
            UNTITLED
        } else {
            &self.filename
        }
    }
}

/// In-memory note collection, kept sorted by modification time descending
/// after every mutation. Persistence is the caller's job.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn add(&mut self, note: Note) {
        self.notes.push(note);
        self.sort();
    }

    /// Remove from the collection only; deleting the backing file is a
    /// separate, caller-driven step.
    pub fn remove(&mut self, id: Uuid) -> Option<Note> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Replace a note's text: bumps the timestamp, recomputes the derived
    /// filename, marks the note dirty, and re-sorts the collection.
    pub fn update_text(&mut self, id: Uuid, new_text: &str, now: SystemTime) {
        if let Some(note) = self.get_mut(id) {
            note.text = new_text.to_string();
            note.modified = now;
            note.filename = derive_filename(new_text);
            note.changed = true;
        }
        self.sort();
    }

    /// Notes in display order: newest first, ties in insertion order.
    pub fn sorted(&self) -> &[Note] {
        &self.notes
    }

    /// Case-insensitive substring filter over note bodies. An empty query
    /// matches everything. Linear scan; order preserved.
    pub fn filter<'a>(&'a self, query: &str) -> Vec<&'a Note> {
        if query.is_empty() {
            return self.notes.iter().collect();
        }
        let needle = query.to_lowercase();
        self.notes
            .iter()
            .filter(|n| n.text.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    fn sort(&mut self) {
        // Stable sort: equal timestamps keep their relative order.
        self.notes.sort_by(|a, b| b.modified.cmp(&a.modified));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn note_with(text: &str, modified: SystemTime) -> Note {
        let mut note = Note::new(modified);
        note.text = text.to_string();
        note.filename = derive_filename(text);
        note
    }

    #[test]
    fn test_filename_is_first_line() {
        assert_eq!(derive_filename("Hello\nworld"), "Hello");
        assert_eq!(derive_filename("Hello"), "Hello");
        assert_eq!(derive_filename(""), "");
        assert_eq!(derive_filename("\nbody"), "");
    }

    #[test]
    fn test_filename_strips_carriage_return() {
        assert_eq!(derive_filename("Hello\r\nworld"), "Hello");
    }

    #[test]
    fn test_filename_sanitizes_separators() {
        assert_eq!(derive_filename("a/b\\c\nrest"), "a-b-c");
    }

    #[test]
    fn test_display_title_placeholder() {
        let note = note_with("\nbody only", at(1));
        assert_eq!(note.filename, "");
        assert_eq!(note.display_title(), UNTITLED);
    }

    #[test]
    fn test_update_text_rederives_filename() {
        let mut store = NoteStore::new();
        let note = note_with("Hello\nworld", at(1));
        let id = note.id;
        store.add(note);

        store.update_text(id, "Goodbye\nworld", at(2));

        let note = store.get(id).unwrap();
        assert_eq!(note.filename, "Goodbye");
        assert_eq!(note.modified, at(2));
        assert!(note.changed);
    }

    #[test]
    fn test_sorted_newest_first() {
        let mut store = NoteStore::new();
        store.add(note_with("t3", at(30)));
        store.add(note_with("t1", at(10)));
        store.add(note_with("t2", at(20)));

        let titles: Vec<&str> = store.sorted().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(titles, ["t3", "t2", "t1"]);
    }

    #[test]
    fn test_sorted_ties_keep_insertion_order() {
        let mut store = NoteStore::new();
        store.add(note_with("first", at(10)));
        store.add(note_with("second", at(10)));

        let titles: Vec<&str> = store.sorted().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[test]
    fn test_filter_empty_query_matches_all() {
        let mut store = NoteStore::new();
        store.add(note_with("alpha", at(2)));
        store.add(note_with("beta", at(1)));

        assert_eq!(store.filter("").len(), 2);
    }

    #[test]
    fn test_filter_case_insensitive() {
        let mut store = NoteStore::new();
        store.add(note_with("Shopping List\nmilk and Eggs", at(1)));
        store.add(note_with("other", at(2)));

        let matches = store.filter("EGGS");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].filename, "Shopping List");
    }

    #[test]
    fn test_remove_leaves_rest() {
        let mut store = NoteStore::new();
        let keep = note_with("keep", at(2));
        let drop = note_with("drop", at(1));
        let drop_id = drop.id;
        store.add(keep);
        store.add(drop);

        assert!(store.remove(drop_id).is_some());
        assert!(store.remove(drop_id).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.sorted()[0].text, "keep");
    }
}
