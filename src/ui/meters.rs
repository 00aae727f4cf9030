use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::engine::snapshot::Snapshot;
use crate::format::{format_bytes, format_rate};
use crate::metrics::MemoryUsage;

fn pane_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ))
}

pub fn render_cpu(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = pane_block(format!(" CPU {:.1}% ", snapshot.aggregate_cpu_percent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner.height as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(visible);
    let shown = snapshot.cores.len().min(visible);
    for (i, core) in snapshot.cores.iter().take(shown).enumerate() {
        let pct = core.percents;
        lines.push(Line::from(vec![
            Span::styled(format!("cpu{i:<3}"), Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " {:5.1}%  user {:5.1}  sys {:5.1}  nice {:5.1}  idle {:5.1}",
                pct.busy(),
                pct.user,
                pct.system,
                pct.nice,
                pct.idle
            )),
        ]));
    }
    if snapshot.cores.len() > shown && !lines.is_empty() {
        let hidden = snapshot.cores.len() - shown + 1;
        lines.pop();
        lines.push(Line::from(Span::styled(
            format!("… {hidden} more cores"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_memory(frame: &mut Frame, area: Rect, memory: &MemoryUsage) {
    let ratio = if memory.total > 0 {
        (memory.used as f64 / memory.total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .block(pane_block(" Memory ".to_string()))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .ratio(ratio)
        .label(format!(
            "{} / {} ({:.0}%)  swap {} / {}",
            format_bytes(memory.used),
            format_bytes(memory.total),
            ratio * 100.0,
            format_bytes(memory.swap_used),
            format_bytes(memory.swap_total),
        ));

    frame.render_widget(gauge, area);
}

pub fn render_disk(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = pane_block(" Disk ".to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled("read ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(
            "{:>10}  ({} total)   ",
            format_rate(snapshot.disk_read_rate),
            format_bytes(snapshot.disk_read.current)
        )),
        Span::styled("write ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(
            "{:>10}  ({} total)",
            format_rate(snapshot.disk_write_rate),
            format_bytes(snapshot.disk_written.current)
        )),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

pub fn render_network(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = pane_block(" Network ".to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled("in ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(
            "{:>10}  ({} total)   ",
            format_rate(snapshot.net_in_rate),
            format_bytes(snapshot.net_in.current)
        )),
        Span::styled("out ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(
            "{:>10}  ({} total)",
            format_rate(snapshot.net_out_rate),
            format_bytes(snapshot.net_out.current)
        )),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
