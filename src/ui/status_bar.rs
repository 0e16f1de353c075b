use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Focus};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mode = match app.focus {
        Focus::Sidebar => "sidebar",
        Focus::Editor => "editor",
    };

    let dirty = app.store.sorted().iter().filter(|n| n.changed).count();
    let counts = if dirty > 0 {
        format!("{} notes ({} unsaved)", app.store.len(), dirty)
    } else {
        format!("{} notes", app.store.len())
    };

    let dir = app
        .vault
        .as_ref()
        .map(|v| shorten_home(&v.dir().to_string_lossy()))
        .unwrap_or_else(|| "no folder".to_string());

    let middle = app
        .status_message
        .clone()
        .unwrap_or_else(|| "n: New  d: Delete  /: Search  r: Reload  ?: Help".to_string());

    let left = format!(" {} | {} ", mode, counts);
    let right = format!(" {} ", dir);
    let pad = (area.width as usize)
        .saturating_sub(left.chars().count() + middle.chars().count() + right.chars().count());

    let line = Line::from(vec![
        Span::styled(
            left,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(middle, Style::default().fg(Color::Gray)),
        Span::raw(" ".repeat(pad)),
        Span::styled(right, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

fn shorten_home(path: &str) -> String {
    if let Some(home) = dirs::home_dir() {
        let home = home.to_string_lossy().to_string();
        if path.starts_with(&home) {
            return path.replacen(&home, "~", 1);
        }
    }
    path.to_string()
}
