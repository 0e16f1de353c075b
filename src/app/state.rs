use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Instant, SystemTime};

use uuid::Uuid;

use crate::autosave::Debouncer;
use crate::config::Config;
use crate::editor::Editor;
use crate::snapshot::{self, Snapshot};
use crate::store::{Note, NoteStore};
use crate::vault::{Vault, VaultError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Sidebar,
    Editor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    None,
    DeleteConfirm,
    FolderPrompt {
        input: String,
        error: Option<String>,
        first_run: bool,
    },
    Info,
    Help,
}

pub struct App {
    pub config: Config,
    pub vault: Option<Vault>,
    pub store: NoteStore,
    pub debouncer: Debouncer,
    pub editor: Editor,
    pub focus: Focus,
    pub dialog: Dialog,
    pub selected: Option<Uuid>,
    pub search_active: bool,
    pub search_query: String,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new_with_path(initial_path: Option<PathBuf>) -> Self {
        let mut config = Config::load();

        if let Some(ref path) = initial_path {
            config.set_notes_dir(path);
            if let Err(e) = config.save() {
                tracing::warn!("could not persist notes directory: {}", e);
            }
        }

        let window = std::time::Duration::from_secs(config.autosave_secs.max(1));
        let mut app = Self {
            vault: None,
            store: NoteStore::new(),
            debouncer: Debouncer::new(window),
            editor: Editor::default(),
            focus: Focus::Sidebar,
            dialog: Dialog::None,
            selected: None,
            search_active: false,
            search_query: String::new(),
            status_message: None,
            should_quit: false,
            config,
        };

        match Vault::resolve(&mut app.config) {
            Ok(vault) => {
                app.vault = Some(vault);
                app.load_notes();
                app.restore_selection();
            }
            Err(VaultError::NotConfigured) => {
                app.dialog = Dialog::FolderPrompt {
                    input: String::new(),
                    error: None,
                    first_run: true,
                };
            }
            Err(e) => {
                tracing::warn!("directory resolution failed: {}", e);
                app.dialog = Dialog::FolderPrompt {
                    input: app.config.notes_dir.clone().unwrap_or_default(),
                    error: Some("Could not open/access the notes directory.".to_string()),
                    first_run: false,
                };
            }
        }

        app
    }

    // ---- loading -----------------------------------------------------------

    /// Rebuild the in-memory store from the directory contents.
    pub fn load_notes(&mut self) {
        let Some(vault) = self.vault.clone() else {
            return;
        };
        self.store.clear();
        self.debouncer.clear();
        if !vault.is_note_dir_empty() {
            for note in vault.load_all() {
                self.store.add(note);
            }
        }
        self.selected = self.visible_ids().first().copied();
        self.sync_editor_from_selection();
    }

    /// Reload from disk, flushing dirty notes first so nothing is lost.
    pub fn reload(&mut self) {
        self.flush_all();
        self.load_notes();
        self.status_message = Some("Notes reloaded".to_string());
    }

    fn restore_selection(&mut self) {
        let Some(vault) = &self.vault else { return };
        let path = snapshot::get_snapshot_path(vault.dir());
        let Some(snap) = snapshot::load_snapshot(&path) else {
            return;
        };
        if snap.notes_dir != vault.dir().to_string_lossy() {
            return;
        }
        if let Some(filename) = snap.selected {
            if let Some(note) = self.store.sorted().iter().find(|n| n.filename == filename) {
                self.selected = Some(note.id);
                self.sync_editor_from_selection();
            }
        }
    }

    /// Write the note-list mirror and the current selection to the cache.
    pub fn save_snapshot_to_cache(&self) {
        let Some(vault) = &self.vault else { return };
        let selected = self
            .selected
            .and_then(|id| self.store.get(id))
            .map(|n| n.filename.clone());
        let snap = Snapshot::capture(&self.store, vault.dir(), selected.as_deref());
        let path = snapshot::get_snapshot_path(vault.dir());
        if let Err(e) = snapshot::save_snapshot(&snap, &path) {
            tracing::warn!("could not write snapshot: {}", e);
        }
    }

    // ---- selection and filtering -------------------------------------------

    /// Ids of the notes the sidebar shows, in display order, honoring the
    /// active search filter.
    pub fn visible_ids(&self) -> Vec<Uuid> {
        self.store
            .filter(&self.search_query)
            .iter()
            .map(|n| n.id)
            .collect()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selected.and_then(|id| self.store.get(id))
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.visible_ids().iter().position(|v| *v == id)
    }

    pub fn select_offset(&mut self, delta: isize) {
        let visible = self.visible_ids();
        if visible.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|id| visible.iter().position(|v| *v == id))
            .unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(visible.len() - 1);
        self.select(Some(visible[next]));
    }

    /// Change selection, flushing the note being left behind (the TUI's
    /// editor-blur trigger).
    pub fn select(&mut self, id: Option<Uuid>) {
        if self.selected == id {
            return;
        }
        if let Some(prev) = self.selected {
            self.flush_note(prev);
        }
        self.selected = id;
        self.sync_editor_from_selection();
    }

    fn sync_editor_from_selection(&mut self) {
        self.editor = match self.selected_note() {
            Some(note) => Editor::from_text(&note.text),
            None => Editor::default(),
        };
    }

    // ---- search ------------------------------------------------------------

    pub fn begin_search(&mut self) {
        self.search_active = true;
    }

    pub fn end_search(&mut self, keep_query: bool) {
        self.search_active = false;
        if !keep_query {
            self.search_query.clear();
            self.clamp_selection();
        }
    }

    pub fn search_input(&mut self, c: char) {
        self.search_query.push(c);
        self.clamp_selection();
    }

    pub fn search_backspace(&mut self) {
        self.search_query.pop();
        self.clamp_selection();
    }

    /// Keep the selection inside the filtered view after the query changes.
    fn clamp_selection(&mut self) {
        let visible = self.visible_ids();
        let still_visible = self
            .selected
            .map(|id| visible.contains(&id))
            .unwrap_or(false);
        if !still_visible {
            self.select(visible.first().copied());
        }
    }

    // ---- note operations ---------------------------------------------------

    pub fn new_note(&mut self) {
        self.search_query.clear();
        self.search_active = false;
        let note = Note::new(SystemTime::now());
        let id = note.id;
        self.store.add(note);
        self.select(Some(id));
        self.focus = Focus::Editor;
    }

    pub fn request_delete(&mut self) {
        if self.selected.is_none() || self.store.is_empty() {
            return;
        }
        if self.config.confirm_delete {
            self.dialog = Dialog::DeleteConfirm;
        } else {
            self.delete_selected();
        }
    }

    /// Remove the selected note from disk and memory. The file deletion is
    /// best-effort; the in-memory removal happens regardless.
    pub fn delete_selected(&mut self) {
        self.dialog = Dialog::None;
        let Some(id) = self.selected else { return };
        self.debouncer.cancel(id);
        if let Some(note) = self.store.remove(id) {
            if let Some(vault) = &self.vault {
                let on_disk = note.disk_filename.as_deref().unwrap_or(&note.filename);
                if !on_disk.is_empty() && !vault.delete(on_disk) {
                    tracing::warn!(
                        "backing file for '{}' was not deleted",
                        note.display_title()
                    );
                }
            }
        }
        self.selected = None;
        let visible = self.visible_ids();
        self.selected = visible.first().copied();
        self.sync_editor_from_selection();
        self.focus = Focus::Sidebar;
    }

    /// Fold the editor buffer back into the store after a keystroke: bump
    /// the timestamp, rederive the filename, mark dirty, reset the idle
    /// deadline.
    pub fn apply_editor_change(&mut self, now: SystemTime, tick: Instant) {
        let Some(id) = self.selected else { return };
        let text = self.editor.text();
        let unchanged = self.store.get(id).map(|n| n.text == text).unwrap_or(true);
        if unchanged {
            return;
        }
        self.store.update_text(id, &text, now);
        self.debouncer.note_edited(id, tick);
    }

    // ---- persistence -------------------------------------------------------

    /// Flush one dirty note to disk: rename first when the title changed,
    /// then write. Rename-then-save, never the other way around, so content
    /// is never written under a stale name.
    pub fn flush_note(&mut self, id: Uuid) {
        self.debouncer.cancel(id);
        let Some(vault) = self.vault.clone() else {
            return;
        };
        let Some(note) = self.store.get_mut(id) else {
            return;
        };
        if !note.changed {
            return;
        }
        if note.filename.is_empty() {
            // Untitled: nothing sensible to persist under. Stays dirty so a
            // later title flushes it.
            tracing::debug!("skipping flush of untitled note {}", id);
            return;
        }
        if let Some(old) = note.disk_filename.clone() {
            if old != note.filename && !old.is_empty() {
                vault.rename(&old, &note.filename);
            }
        }
        vault.save(&note.filename, &note.text);
        note.disk_filename = Some(note.filename.clone());
        note.changed = false;
    }

    /// Flush every dirty note. Shutdown and terminal focus loss funnel here;
    /// there is no ordering constraint between notes.
    pub fn flush_all(&mut self) {
        let dirty: Vec<Uuid> = self
            .store
            .sorted()
            .iter()
            .filter(|n| n.changed)
            .map(|n| n.id)
            .collect();
        for id in dirty {
            self.flush_note(id);
        }
    }

    /// Event-loop tick: flush notes whose idle window elapsed.
    pub fn autosave_tick(&mut self, now: Instant) {
        for id in self.debouncer.due(now) {
            tracing::debug!("idle window elapsed, flushing {}", id);
            self.flush_note(id);
        }
    }

    // ---- folder handling ---------------------------------------------------

    pub fn prompt_for_folder(&mut self) {
        self.dialog = Dialog::FolderPrompt {
            input: self.config.notes_dir.clone().unwrap_or_default(),
            error: None,
            first_run: false,
        };
    }

    /// Accept the folder prompt. Creates the directory if needed, persists
    /// the choice, and loads whatever notes it holds.
    pub fn choose_folder(&mut self, input: &str) {
        let expanded = PathBuf::from(shellexpand::tilde(input.trim()).to_string());
        if let Err(e) = std::fs::create_dir_all(&expanded) {
            self.folder_prompt_error(format!("Could not create folder: {}", e));
            return;
        }
        match Vault::open(&expanded) {
            Ok(vault) => {
                self.config.set_notes_dir(vault.dir());
                if let Err(e) = self.config.save() {
                    tracing::warn!("could not persist notes directory: {}", e);
                }
                self.vault = Some(vault);
                self.dialog = Dialog::None;
                self.load_notes();
            }
            Err(e) => self.folder_prompt_error(format!("Could not open folder: {}", e)),
        }
    }

    /// Dismissing the prompt without a selection: the user-cancelled path.
    /// Prior state stays untouched; without a vault the notes only live in
    /// memory.
    pub fn cancel_folder_prompt(&mut self) {
        if let Dialog::FolderPrompt { first_run, .. } = &self.dialog {
            if *first_run && self.vault.is_none() {
                self.status_message =
                    Some("No folder chosen; notes will not be saved.".to_string());
            }
        }
        self.dialog = Dialog::None;
    }

    fn folder_prompt_error(&mut self, message: String) {
        if let Dialog::FolderPrompt { error, .. } = &mut self.dialog {
            *error = Some(message);
        }
    }

    /// Open the notes directory in the system file browser.
    pub fn open_folder_in_browser(&mut self) {
        let Some(vault) = &self.vault else {
            self.status_message = Some("Could not open directory.".to_string());
            return;
        };
        if !open_in_file_browser(vault.dir()) {
            self.status_message = Some("Could not open directory.".to_string());
        }
    }
}

fn open_in_file_browser(dir: &Path) -> bool {
    #[cfg(target_os = "macos")]
    let program = "open";
    #[cfg(target_os = "windows")]
    let program = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let program = "xdg-open";

    match Command::new(program).arg(dir).spawn() {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("could not open {}: {}", dir.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::derive_filename;
    use std::fs;
    use std::time::Duration;

    fn app_with_vault(dir: &Path) -> App {
        let mut app = App {
            config: Config::default(),
            vault: Some(Vault::open(dir).unwrap()),
            store: NoteStore::new(),
            debouncer: Debouncer::new(Duration::from_secs(5)),
            editor: Editor::default(),
            focus: Focus::Sidebar,
            dialog: Dialog::None,
            selected: None,
            search_active: false,
            search_query: String::new(),
            status_message: None,
            should_quit: false,
        };
        app.config.confirm_delete = false;
        app
    }

    fn add_note(app: &mut App, text: &str) -> Uuid {
        let mut note = Note::new(SystemTime::now());
        note.text = text.to_string();
        note.filename = derive_filename(text);
        note.changed = true;
        let id = note.id;
        app.store.add(note);
        id
    }

    #[test]
    fn test_flush_writes_under_derived_name() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_vault(tmp.path());
        let id = add_note(&mut app, "Hello\nworld");

        app.flush_note(id);

        assert_eq!(
            fs::read_to_string(tmp.path().join("Hello.txt")).unwrap(),
            "Hello\nworld"
        );
        assert!(!app.store.get(id).unwrap().changed);
    }

    #[test]
    fn test_title_edit_renames_then_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_vault(tmp.path());
        let id = add_note(&mut app, "Hello\nworld");
        app.flush_note(id);

        app.selected = Some(id);
        app.editor = Editor::from_text("Goodbye\nworld");
        app.apply_editor_change(SystemTime::now(), Instant::now());
        app.flush_note(id);

        assert!(!tmp.path().join("Hello.txt").exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join("Goodbye.txt")).unwrap(),
            "Goodbye\nworld"
        );
    }

    #[test]
    fn test_untitled_note_is_not_flushed() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_vault(tmp.path());
        let id = add_note(&mut app, "\nbody without title");

        app.flush_note(id);

        assert!(app.vault.as_ref().unwrap().is_note_dir_empty());
        // Still dirty; a later title edit will flush it.
        assert!(app.store.get(id).unwrap().changed);
    }

    #[test]
    fn test_delete_removes_file_and_note() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_vault(tmp.path());
        let id = add_note(&mut app, "Doomed");
        app.flush_note(id);
        app.selected = Some(id);

        app.delete_selected();

        assert!(app.store.is_empty());
        assert!(!tmp.path().join("Doomed.txt").exists());
    }

    #[test]
    fn test_autosave_tick_flushes_due_notes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_vault(tmp.path());
        let id = add_note(&mut app, "Idle note");
        let start = Instant::now();
        app.debouncer.note_edited(id, start);

        app.autosave_tick(start + Duration::from_secs(4));
        assert!(!tmp.path().join("Idle note.txt").exists());

        app.autosave_tick(start + Duration::from_secs(5));
        assert!(tmp.path().join("Idle note.txt").exists());
    }

    #[test]
    fn test_switching_selection_flushes_previous() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_vault(tmp.path());
        let first = add_note(&mut app, "First");
        let second = add_note(&mut app, "Second");
        app.selected = Some(first);

        app.select(Some(second));

        assert!(tmp.path().join("First.txt").exists());
        assert!(!tmp.path().join("Second.txt").exists());
    }

    #[test]
    fn test_search_narrows_and_clamps_selection() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_vault(tmp.path());
        add_note(&mut app, "Groceries\nmilk");
        let other = add_note(&mut app, "Work\nmeeting notes");
        app.selected = Some(other);

        app.begin_search();
        for c in "milk".chars() {
            app.search_input(c);
        }

        let visible = app.visible_ids();
        assert_eq!(visible.len(), 1);
        assert_eq!(app.selected, Some(visible[0]));
    }

    #[test]
    fn test_flush_all_covers_every_dirty_note() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_vault(tmp.path());
        add_note(&mut app, "One");
        add_note(&mut app, "Two");

        app.flush_all();

        assert!(tmp.path().join("One.txt").exists());
        assert!(tmp.path().join("Two.txt").exists());
    }
}
