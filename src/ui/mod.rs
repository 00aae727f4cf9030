pub mod header;
pub mod meters;
pub mod process_table;
pub mod welcome;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::App;

/// Cap on per-core meter lines before the pane collapses the rest.
const MAX_CORE_ROWS: u16 = 16;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(frame.area());

    header::render(frame, chunks[0], &app.snapshot, app.refresh_interval);

    let content = chunks[1];
    let view = app.view;

    // Implicit fallback, not a user toggle: an empty view shows the
    // welcome pane.
    if !view.any_visible() {
        welcome::render(frame, content);
        return;
    }

    let mut constraints: Vec<Constraint> = Vec::new();
    if view.cpu {
        constraints.push(Constraint::Length(cpu_pane_height(app)));
    }
    if view.memory {
        constraints.push(Constraint::Length(3));
    }
    if view.disk {
        constraints.push(Constraint::Length(3));
    }
    if view.network {
        constraints.push(Constraint::Length(3));
    }
    if view.top.is_some() {
        constraints.push(Constraint::Min(4));
    }

    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(content);

    let mut index = 0;
    let mut next_area = || -> Rect {
        let area = areas[index];
        index += 1;
        area
    };

    if view.cpu {
        meters::render_cpu(frame, next_area(), &app.snapshot);
    }
    if view.memory {
        meters::render_memory(frame, next_area(), &app.snapshot.memory);
    }
    if view.disk {
        meters::render_disk(frame, next_area(), &app.snapshot);
    }
    if view.network {
        meters::render_network(frame, next_area(), &app.snapshot);
    }
    if let Some(mode) = view.top {
        process_table::render(frame, next_area(), &app.snapshot, mode);
    }
}

fn cpu_pane_height(app: &App) -> u16 {
    let cores = app.snapshot.cores.len() as u16;
    cores.min(MAX_CORE_ROWS) + 2
}
