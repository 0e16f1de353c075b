use std::time::SystemTime;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::{App, Focus};

pub fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.focus == Focus::Sidebar {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let visible = app.store.filter(&app.search_query);
    let title = if app.search_query.is_empty() {
        format!(" Notes ({}) ", app.store.len())
    } else {
        format!(" Notes ({}/{}) ", visible.len(), app.store.len())
    };

    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.search_active || !app.search_query.is_empty() {
        let cursor = if app.search_active { "_" } else { "" };
        block = block.title_bottom(
            Line::from(vec![
                Span::raw(" /"),
                Span::styled(
                    app.search_query.clone(),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    cursor,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::SLOW_BLINK),
                ),
                Span::raw(" "),
            ])
            .left_aligned(),
        );
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|note| {
            let mut title_spans = vec![Span::styled(
                note.display_title().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if note.changed {
                title_spans.push(Span::styled(" *", Style::default().fg(Color::Yellow)));
            }
            ListItem::new(vec![
                Line::from(title_spans),
                Line::from(Span::styled(
                    format_time(note.modified, &app.config.date_format),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(50, 55, 70)));

    let mut state = ListState::default();
    state.select(app.selected_index());
    f.render_stateful_widget(list, area, &mut state);
}

/// Format a timestamp with the configured chrono pattern, falling back to a
/// fixed one when the pattern does not parse.
fn format_time(time: SystemTime, pattern: &str) -> String {
    let local: DateTime<Local> = time.into();
    let items: Vec<Item> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return local.format("%Y-%m-%d %H:%M").to_string();
    }
    local.format_with_items(items.into_iter()).to_string()
}
