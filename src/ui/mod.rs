mod dialogs;
mod editor;
mod sidebar;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::App;

const SIDEBAR_WIDTH: u16 = 34;

pub fn render(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(outer[0]);

    sidebar::render_sidebar(f, app, panes[0]);
    editor::render_editor(f, app, panes[1]);
    status_bar::render_status_bar(f, app, outer[1]);

    dialogs::render_dialogs(f, app, f.area());
}

/// Centered rect for dialogs, clamped to the containing area.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
