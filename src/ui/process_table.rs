use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::engine::rank::rank;
use crate::engine::snapshot::{ProcessSample, Snapshot};
use crate::format::{format_bytes, truncate_unicode};
use crate::view::TopMode;

const FIXED_COLUMNS_WIDTH: usize = 44;

/// The display owns the row budget: however many rows fit inside the pane
/// become the ranker's truncation limit.
pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, mode: TopMode) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            format!(" {} ", mode.label()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let limit = inner.height.saturating_sub(1) as usize;
    let ranked = rank(&snapshot.processes, mode.metric(), limit);

    let mut lines = Vec::with_capacity(ranked.len() + 1);
    lines.push(Line::from(Span::styled(
        format!(
            "{:>7} {:<10} {:>6} {:>9} {:>4}  {}",
            "PID", "USER", "%CPU", "MEM", "PRI", "COMMAND"
        ),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));

    let command_width = (inner.width as usize).saturating_sub(FIXED_COLUMNS_WIDTH);
    for sample in &ranked {
        lines.push(Line::from(row_text(sample, mode, command_width)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn row_text(sample: &ProcessSample, mode: TopMode, command_width: usize) -> String {
    let owner = sample.owner.as_deref().unwrap_or("-");
    let priority = sample
        .priority
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let command = if mode.verbose() {
        &sample.command
    } else {
        &sample.name
    };
    format!(
        "{:>7} {:<10} {:>6.1} {:>9} {:>4}  {}",
        sample.pid,
        truncate_unicode(owner, 10),
        sample.cpu_share,
        format_bytes(sample.resident_memory),
        priority,
        truncate_unicode(command, command_width),
    )
}
