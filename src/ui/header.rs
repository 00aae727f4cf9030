use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::engine::snapshot::Snapshot;
use crate::format::format_uptime;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, refresh_interval: Duration) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_host_facts(frame, chunks[0], snapshot);
    render_cpu_gauge(frame, chunks[1], snapshot);
    render_status(frame, chunks[2], snapshot, refresh_interval);
}

fn render_host_facts(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let uptime = uptime_secs(snapshot);
    let lines = vec![
        Line::from(vec![
            Span::styled(
                " pulsetop ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                snapshot.kernel.hostname.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                snapshot.kernel.os_version.clone(),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                snapshot.hardware.cpu_model.clone(),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(format!(
                "  {} cores  up {}",
                snapshot.hardware.logical_cpus,
                format_uptime(uptime)
            )),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_cpu_gauge(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            " CPU ",
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let ratio = f64::from(snapshot.aggregate_cpu_percent.clamp(0.0, 100.0)) / 100.0;
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(ratio)
        .label(format!("{:.1}%", snapshot.aggregate_cpu_percent));

    frame.render_widget(gauge, area);
}

fn render_status(frame: &mut Frame, area: Rect, snapshot: &Snapshot, refresh_interval: Duration) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(format!("procs {}", snapshot.processes.len())),
        Line::from(Span::styled(
            format!("every {} ms", refresh_interval.as_millis()),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn uptime_secs(snapshot: &Snapshot) -> u64 {
    let boot = snapshot.kernel.boot_time_secs;
    if boot == 0 {
        return 0;
    }
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|now| now.as_secs().saturating_sub(boot))
        .unwrap_or(0)
}
