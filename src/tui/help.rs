use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const KEYBINDS: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "Next / previous field"),
    ("Enter", "Next field, press button, or newline in Meaning"),
    ("Ctrl-S", "Save entry"),
    ("Ctrl-F", "Jump to search"),
    ("Esc", "Clear search (in search field) / Quit"),
    ("Ctrl-L", "Show all entries"),
    ("↑/↓ or j/k", "Navigate results (results focused)"),
    ("Ctrl-E", "Export shown entries as JSON"),
    ("Ctrl-X", "Export shown entries as CSV"),
    ("Ctrl-Y", "Copy selected entry to clipboard"),
    ("F1", "Show this help"),
    ("Ctrl-C", "Quit"),
];

pub fn draw_help(area: Rect, f: &mut Frame) {
    let mut lines = vec![Line::from("Keybinds:")];
    for (key, action) in KEYBINDS {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{key:<16}"), Style::default().fg(Color::Magenta)),
            Span::raw(*action),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to return to the form.",
        Style::default().fg(Color::Gray),
    )));

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
