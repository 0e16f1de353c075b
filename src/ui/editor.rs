use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Dialog, Focus};

pub fn render_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Editor;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = app
        .selected_note()
        .map(|n| format!(" {} ", n.display_title()))
        .unwrap_or_else(|| " — ".to_string());
    let hint = if focused {
        " Ctrl+S: Save, Esc: Back "
    } else {
        " Enter: Edit "
    };

    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(hint).right_aligned())
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);

    if app.selected_note().is_none() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "Select a note or create a new one.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let inner_height = inner.height as usize;
    app.editor.ensure_cursor_visible(inner_height);
    let scroll_top = app.editor.scroll_top();

    let lines: Vec<Line> = app
        .editor
        .lines()
        .into_iter()
        .skip(scroll_top)
        .take(inner_height)
        .map(|l| Line::from(l.to_string()))
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);

    // Native terminal cursor while editing, clipped at the right border.
    if focused && app.dialog == Dialog::None {
        let (row, _) = app.editor.cursor();
        if row >= scroll_top && row < scroll_top + inner_height {
            let x = inner.x
                + (app.editor.cursor_display_col() as u16).min(inner.width.saturating_sub(1));
            let y = inner.y + (row - scroll_top) as u16;
            f.set_cursor_position((x, y));
        }
    }
}
