use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

const KEY_HELP: &[(&str, &str)] = &[
    ("c", "toggle CPU pane"),
    ("m", "toggle memory pane"),
    ("d", "toggle disk pane"),
    ("n", "toggle network pane"),
    ("p / P", "top processes by %CPU (terse / full command)"),
    ("r / R", "top processes by memory (terse / full command)"),
    ("+ / -", "halve / double the refresh interval"),
    ("space", "refresh now"),
    ("q", "quit"),
];

/// Shown whenever no pane is enabled.
pub fn render(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            " pulsetop ",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from("No panes enabled."),
        Line::from(Span::styled(
            format!(
                "Toggle panes with the keys below, or preset them via the {} environment variable.",
                crate::config::ENV_TOGGLES
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    for (key, description) in KEY_HELP {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {key:<7}"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(*description),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
