use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Dialog};
use crate::config::Config;

use super::centered_rect;

pub fn render_dialogs(f: &mut Frame, app: &App, area: Rect) {
    match &app.dialog {
        Dialog::None => {}
        Dialog::DeleteConfirm => render_delete_confirm(f, app, area),
        Dialog::FolderPrompt {
            input,
            error,
            first_run,
        } => render_folder_prompt(f, input, error.as_deref(), *first_run, area),
        Dialog::Info => render_info(f, app, area),
        Dialog::Help => render_help(f, area),
    }
}

fn dialog_block(title: &str, hint: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .title_bottom(
            Line::from(Span::styled(
                format!(" {} ", hint),
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn render_delete_confirm(f: &mut Frame, app: &App, area: Rect) {
    let title = app
        .selected_note()
        .map(|n| n.display_title().to_string())
        .unwrap_or_default();

    let dialog_area = centered_rect(52, 5, area);
    f.render_widget(Clear, dialog_area);

    let body = vec![
        Line::from(vec![
            Span::raw("Delete \""),
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("\"?"),
        ]),
        Line::from(Span::styled(
            "This can't be undone.",
            Style::default().fg(Color::Red),
        )),
    ];

    f.render_widget(
        Paragraph::new(body).block(dialog_block("Delete Note", "y: Delete, n: Cancel")),
        dialog_area,
    );
}

fn render_folder_prompt(
    f: &mut Frame,
    input: &str,
    error: Option<&str>,
    first_run: bool,
    area: Rect,
) {
    let dialog_area = centered_rect(60, 7, area);
    f.render_widget(Clear, dialog_area);

    let mut body = vec![Line::from(if first_run {
        "Choose a folder to store your notes:"
    } else {
        "Notes folder:"
    })];
    body.push(Line::from(vec![
        Span::raw("> "),
        Span::styled(input.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(
            "_",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
    ]));
    match error {
        Some(message) => body.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        ))),
        None => body.push(Line::from(Span::styled(
            "The folder is created if it does not exist.",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    f.render_widget(
        Paragraph::new(body).block(dialog_block("Notes Folder", "Enter: Accept, Esc: Cancel")),
        dialog_area,
    );
}

fn render_info(f: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_rect(60, 7, area);
    f.render_widget(Clear, dialog_area);

    let dir = app
        .vault
        .as_ref()
        .map(|v| v.dir().display().to_string())
        .unwrap_or_else(|| "not set yet".to_string());

    let body = vec![
        Line::from(format!("Note count: {}", app.store.len())),
        Line::from(format!("Saving notes in: {}", dir)),
        Line::from(format!("Config: {}", Config::config_path().display())),
    ];

    f.render_widget(
        Paragraph::new(body).block(dialog_block("Information", "Esc: Close")),
        dialog_area,
    );
}

fn render_help(f: &mut Frame, area: Rect) {
    let dialog_area = centered_rect(46, 14, area);
    f.render_widget(Clear, dialog_area);

    let key = |k: &str, what: &str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), Style::default().fg(Color::Cyan)),
            Span::raw(what.to_string()),
        ])
    };

    let body = vec![
        key("j/k, ↑/↓", "Move in the note list"),
        key("Enter, e", "Edit the selected note"),
        key("n", "New note"),
        key("d, Del", "Delete note"),
        key("/", "Search as you type"),
        key("r", "Reload notes from disk"),
        key("o", "Open notes folder"),
        key("s", "Choose notes folder"),
        key("i", "Show info"),
        key("Esc", "Leave the editor (saves)"),
        key("Ctrl+S", "Save now"),
        key("q", "Quit"),
    ];

    f.render_widget(
        Paragraph::new(body).block(dialog_block("Help", "Esc: Close")),
        dialog_area,
    );
}
