use std::io;
use std::time::{Duration, Instant, SystemTime};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};

use crate::app::{App, Dialog, Focus};
use crate::ui;

const TICK: Duration = Duration::from_millis(250);

pub fn run_app<B: Backend<Error = io::Error>>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Wake up for the next autosave deadline even without input.
        let now = Instant::now();
        let timeout = app
            .debouncer
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now).min(TICK))
            .unwrap_or(TICK);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Event::Paste(text) => {
                    if app.focus == Focus::Editor && app.dialog == Dialog::None {
                        app.editor.insert_text(&text);
                        app.apply_editor_change(SystemTime::now(), Instant::now());
                    }
                }
                // Terminal lost focus: same trigger as the editor blurring.
                Event::FocusLost => app.flush_all(),
                _ => {}
            }
        }

        app.autosave_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.dialog != Dialog::None {
        handle_dialog_key(app, key);
        return;
    }

    if app.search_active && app.focus == Focus::Sidebar {
        handle_search_key(app, key);
        return;
    }

    match app.focus {
        Focus::Sidebar => handle_sidebar_key(app, key),
        Focus::Editor => handle_editor_key(app, key),
    }
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match &mut app.dialog {
        Dialog::DeleteConfirm => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.delete_selected(),
            KeyCode::Char('n') | KeyCode::Esc => app.dialog = Dialog::None,
            _ => {}
        },
        Dialog::FolderPrompt { input, .. } => match key.code {
            KeyCode::Enter => {
                let chosen = input.clone();
                app.choose_folder(&chosen);
            }
            KeyCode::Esc => app.cancel_folder_prompt(),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        },
        Dialog::Info | Dialog::Help => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.dialog = Dialog::None,
            _ => {}
        },
        Dialog::None => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.end_search(false),
        KeyCode::Enter => app.end_search(true),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Up => app.select_offset(-1),
        KeyCode::Down => app.select_offset(1),
        KeyCode::Char(c) => app.search_input(c),
        _ => {}
    }
}

fn handle_sidebar_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.select_offset(1),
        KeyCode::Char('k') | KeyCode::Up => app.select_offset(-1),
        KeyCode::Home => app.select_offset(isize::MIN),
        KeyCode::End => app.select_offset(isize::MAX),
        KeyCode::Enter | KeyCode::Char('e') | KeyCode::Tab => {
            if app.selected.is_some() {
                app.focus = Focus::Editor;
            }
        }
        KeyCode::Char('n') => app.new_note(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('o') => app.open_folder_in_browser(),
        KeyCode::Char('s') => app.prompt_for_folder(),
        KeyCode::Char('i') => app.dialog = Dialog::Info,
        KeyCode::Char('?') => app.dialog = Dialog::Help,
        _ => {}
    }
}

fn handle_editor_key(app: &mut App, key: KeyEvent) {
    let mut edited = true;
    match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            // Leaving the editor is a blur: flush immediately.
            if let Some(id) = app.selected {
                app.flush_note(id);
            }
            app.focus = Focus::Sidebar;
            edited = false;
        }
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(id) = app.selected {
                app.apply_editor_change(SystemTime::now(), Instant::now());
                app.flush_note(id);
            }
            edited = false;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.editor.insert_char(c)
        }
        KeyCode::Enter => app.editor.insert_newline(),
        KeyCode::Backspace => app.editor.backspace(),
        KeyCode::Delete => app.editor.delete_forward(),
        KeyCode::Left => {
            app.editor.move_left();
            edited = false;
        }
        KeyCode::Right => {
            app.editor.move_right();
            edited = false;
        }
        KeyCode::Up => {
            app.editor.move_up();
            edited = false;
        }
        KeyCode::Down => {
            app.editor.move_down();
            edited = false;
        }
        KeyCode::Home => {
            app.editor.move_line_start();
            edited = false;
        }
        KeyCode::End => {
            app.editor.move_line_end();
            edited = false;
        }
        KeyCode::PageUp => {
            app.editor.page_up(10);
            edited = false;
        }
        KeyCode::PageDown => {
            app.editor.page_down(10);
            edited = false;
        }
        _ => edited = false,
    }
    if edited {
        app.apply_editor_change(SystemTime::now(), Instant::now());
    }
}
