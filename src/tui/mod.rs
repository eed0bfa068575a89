mod export;
mod help;
mod state;

use crate::model::AppConfig;
use crate::storage::VocabularyStore;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Terminal,
};
use state::{Focus, Notice, UiState};
use std::{io, time::Duration};

const ACCENT: Color = Color::Magenta;

/// Whether the event loop should keep running after a key press.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the form until the user quits. All store access happens on this thread.
pub fn run(cfg: &AppConfig, store: &VocabularyStore) -> Result<()> {
    let mut state = UiState {
        title: cfg.title.clone(),
        labels: store.labels().clone(),
        ..Default::default()
    };
    state.refresh(store);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();
    tracing::info!(path = %store.path().display(), "form opened");

    let res = event_loop(&mut terminal, &mut state, store);

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut UiState,
    store: &VocabularyStore,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| draw(f.area(), f, state))
            .context("draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("poll terminal events")? {
            continue;
        }
        if let Event::Key(k) = event::read().context("read terminal event")? {
            if k.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(state, store, k) == Flow::Quit {
                tracing::info!("form closed");
                return Ok(());
            }
        }
    }
}

fn handle_key(state: &mut UiState, store: &VocabularyStore, k: KeyEvent) -> Flow {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && k.code == KeyCode::Char('c') {
        return Flow::Quit;
    }
    // Modal message and help screen swallow the next key.
    if state.notice.take().is_some() {
        return Flow::Continue;
    }
    if state.show_help {
        state.show_help = false;
        return Flow::Continue;
    }

    if ctrl {
        match k.code {
            KeyCode::Char('s') => state.save(store),
            KeyCode::Char('f') => state.focus = Focus::Search,
            KeyCode::Char('l') => state.clear_search(store),
            KeyCode::Char('e') => {
                let res = export::export_shown_json(state);
                export::export_and_report(state, "JSON", res);
            }
            KeyCode::Char('x') => {
                let res = export::export_shown_csv(state, store);
                export::export_and_report(state, "CSV", res);
            }
            KeyCode::Char('y') => export::copy_selected(state),
            _ => {}
        }
        return Flow::Continue;
    }

    match k.code {
        KeyCode::F(1) => state.show_help = true,
        KeyCode::Tab => state.focus = state.focus.next(),
        KeyCode::BackTab => state.focus = state.focus.prev(),
        KeyCode::Esc => {
            if state.focus == Focus::Search || state.active_search.is_some() {
                state.clear_search(store);
            } else {
                return Flow::Quit;
            }
        }
        KeyCode::Enter => match state.focus {
            Focus::Source | Focus::Target => state.focus = state.focus.next(),
            Focus::Meaning => state.insert_char('\n'),
            Focus::Save => state.save(store),
            Focus::Search | Focus::SearchButton => state.search(store),
            Focus::Results => {}
        },
        KeyCode::Backspace => state.backspace(),
        KeyCode::Up if state.focus == Focus::Results => state.select_prev(),
        KeyCode::Down if state.focus == Focus::Results => state.select_next(),
        KeyCode::Char('k') if state.focus == Focus::Results => state.select_prev(),
        KeyCode::Char('j') if state.focus == Focus::Results => state.select_next(),
        KeyCode::Char(c) if state.focus.is_text_input() => state.insert_char(c),
        _ => {}
    }
    Flow::Continue
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    if state.show_help {
        help::draw_help(area, f);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        state.title.clone(),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let labels = &state.labels;
    draw_input(f, chunks[1], state, Focus::Source, &labels.source, &state.source);
    draw_input(f, chunks[2], state, Focus::Target, &labels.target, &state.target);
    draw_input(f, chunks[3], state, Focus::Meaning, &labels.meaning, &state.meaning);
    draw_button(f, chunks[4], state.focus == Focus::Save, "Save (Ctrl-S)");

    let search_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(14)])
        .split(chunks[5]);
    draw_input(f, search_row[0], state, Focus::Search, "Search", &state.search);
    draw_button(
        f,
        search_row[1],
        state.focus == Focus::SearchButton,
        "Search",
    );

    draw_results(f, chunks[6], state);

    let status = Paragraph::new(Line::from(vec![
        Span::styled("F1", Style::default().fg(ACCENT)),
        Span::raw(" help  "),
        Span::styled(state.info.clone(), Style::default().fg(Color::Gray)),
    ]));
    f.render_widget(status, chunks[7]);

    if let Some(notice) = &state.notice {
        draw_notice(f, area, notice);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(ACCENT)
    }
}

fn draw_input(
    f: &mut ratatui::Frame,
    area: Rect,
    state: &UiState,
    which: Focus,
    title: &str,
    value: &str,
) {
    let focused = state.focus == which;
    let lines: Vec<Line> = value.split('\n').map(Line::from).collect();
    let line_count = lines.len();

    // Keep the cursor line visible in the multi-line meaning field.
    let inner_height = area.height.saturating_sub(2).max(1) as usize;
    let scroll = line_count.saturating_sub(inner_height) as u16;

    let p = Paragraph::new(lines)
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused))
                .title(title.to_string()),
        );
    f.render_widget(p, area);

    if focused {
        let last = value.rsplit('\n').next().unwrap_or("");
        let row = (line_count.saturating_sub(1) as u16).saturating_sub(scroll);
        let width = Line::from(last).width() as u16;
        let x = area.x + 1 + width.min(area.width.saturating_sub(3));
        let y = area.y + 1 + row.min(area.height.saturating_sub(3));
        f.set_cursor_position((x, y));
    }
}

fn draw_button(f: &mut ratatui::Frame, area: Rect, focused: bool, label: &str) {
    let style = if focused {
        Style::default()
            .fg(Color::White)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT)
    };
    let p = Paragraph::new(Line::from(Span::styled(label.to_string(), style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused)),
        );
    f.render_widget(p, area);
}

fn draw_results(f: &mut ratatui::Frame, area: Rect, state: &UiState) {
    let focused = state.focus == Focus::Results;
    let max_items = (area.height as usize).saturating_sub(2).max(1);

    // Keep the selected row visible.
    let scroll_offset = state.selected.saturating_sub(max_items - 1);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, entry) in state
        .entries
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(max_items)
    {
        let is_selected = focused && idx == state.selected;
        let style = if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>3}. ", idx + 1),
                if is_selected {
                    style
                } else {
                    Style::default().fg(Color::Gray)
                },
            ),
            Span::styled(entry.to_string().replace('\n', " "), style),
        ]));
    }

    if state.entries.is_empty() {
        let msg = match &state.active_search {
            Some(term) => format!("No matches for '{term}'."),
            None => "No entries yet. Fill in the form and press Ctrl-S.".to_string(),
        };
        lines.push(Line::from(Span::styled(msg, Style::default().fg(Color::Gray))));
    }

    let title = match &state.active_search {
        Some(term) => format!("Results for '{term}' ({}) - Esc: show all", state.entries.len()),
        None => format!("Entries ({})", state.entries.len()),
    };
    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .title(title),
    );
    f.render_widget(p, area);
}

fn draw_notice(f: &mut ratatui::Frame, area: Rect, notice: &Notice) {
    let color = match notice {
        Notice::Success(_) => Color::Green,
        Notice::Warning(_) => Color::Yellow,
        Notice::Error(_) => Color::Red,
    };
    let popup = centered_rect(area, 50, 7);
    let p = Paragraph::new(vec![
        Line::from(""),
        Line::from(notice.message().to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(notice.title()),
    );
    f.render_widget(Clear, popup);
    f.render_widget(p, popup);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnLabels;
    use ratatui::backend::TestBackend;
    use tempfile::{tempdir, TempDir};

    fn store() -> (TempDir, VocabularyStore) {
        let dir = tempdir().unwrap();
        let store =
            VocabularyStore::open(dir.path().join("dictionary.xlsx"), ColumnLabels::default())
                .unwrap();
        (dir, store)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(state: &mut UiState, store: &VocabularyStore, s: &str) {
        for c in s.chars() {
            handle_key(state, store, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn full_form_flow_saves_entry() {
        let (_dir, store) = store();
        let mut state = UiState::default();

        type_str(&mut state, &store, "casa");
        handle_key(&mut state, &store, key(KeyCode::Enter));
        type_str(&mut state, &store, "house");
        handle_key(&mut state, &store, key(KeyCode::Enter));
        type_str(&mut state, &store, "a building");
        handle_key(&mut state, &store, key(KeyCode::Enter));
        type_str(&mut state, &store, "for living");
        handle_key(&mut state, &store, ctrl('s'));

        assert!(matches!(state.notice, Some(Notice::Success(_))));
        let saved = store.list().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].meaning, "a building\nfor living");

        // Any key dismisses the popup without reaching the form.
        handle_key(&mut state, &store, key(KeyCode::Char('z')));
        assert!(state.notice.is_none());
        assert!(state.source.is_empty());
    }

    #[test]
    fn enter_on_search_field_runs_search_and_esc_restores() {
        let (_dir, store) = store();
        let mut state = UiState::default();
        for (s, t, m) in [("gato", "cat", "feline"), ("cão", "dog", "canine")] {
            state.source = s.into();
            state.target = t.into();
            state.meaning = m.into();
            state.save(&store);
        }
        state.notice = None;

        handle_key(&mut state, &store, ctrl('f'));
        type_str(&mut state, &store, "dog");
        handle_key(&mut state, &store, key(KeyCode::Enter));
        assert_eq!(state.entries.len(), 1);

        assert_eq!(
            handle_key(&mut state, &store, key(KeyCode::Esc)),
            Flow::Continue
        );
        assert_eq!(state.entries.len(), 2);
    }

    #[test]
    fn ctrl_l_restores_full_list_after_search() {
        let (_dir, store) = store();
        let mut state = UiState::default();
        for (s, t, m) in [("gato", "cat", "feline"), ("cão", "dog", "canine")] {
            state.source = s.into();
            state.target = t.into();
            state.meaning = m.into();
            state.save(&store);
        }
        state.notice = None;
        state.search = "feline".into();
        state.search(&store);
        state.focus = Focus::Results;
        assert_eq!(state.entries.len(), 1);

        assert_eq!(handle_key(&mut state, &store, ctrl('l')), Flow::Continue);
        assert_eq!(state.entries.len(), 2);
        assert!(state.active_search.is_none());
        assert!(state.search.is_empty());
    }

    #[test]
    fn f1_opens_help_and_next_key_closes_it() {
        let (_dir, store) = store();
        let mut state = UiState::default();

        handle_key(&mut state, &store, key(KeyCode::F(1)));
        assert!(state.show_help);

        // The closing key is swallowed, not typed into the form.
        handle_key(&mut state, &store, key(KeyCode::Char('q')));
        assert!(!state.show_help);
        assert!(state.source.is_empty());
    }

    #[test]
    fn cursor_follows_display_width_of_wide_chars() {
        let mut state = UiState::default();
        state.source = "日本".into();

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw(f.area(), f, &state)).unwrap();

        // Source field starts at row 1; border occupies column 0.
        terminal.backend_mut().assert_cursor_position((5, 2));
    }

    #[test]
    fn esc_on_form_quits_and_ctrl_c_always_quits() {
        let (_dir, store) = store();
        let mut state = UiState::default();
        assert_eq!(handle_key(&mut state, &store, key(KeyCode::Esc)), Flow::Quit);

        state.notice = Some(Notice::Warning("x".into()));
        assert_eq!(handle_key(&mut state, &store, ctrl('c')), Flow::Quit);
    }

    #[test]
    fn list_navigation_only_when_results_focused() {
        let (_dir, store) = store();
        let mut state = UiState::default();
        state.entries = vec![
            crate::model::VocabularyEntry::new("um", "one", "1").unwrap(),
            crate::model::VocabularyEntry::new("dois", "two", "2").unwrap(),
        ];

        handle_key(&mut state, &store, key(KeyCode::Char('j')));
        assert_eq!(state.selected, 0);
        assert_eq!(state.source, "j");

        state.focus = Focus::Results;
        handle_key(&mut state, &store, key(KeyCode::Char('j')));
        assert_eq!(state.selected, 1);
        handle_key(&mut state, &store, key(KeyCode::Up));
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn draw_renders_title_and_entries() {
        let mut state = UiState::default();
        state.entries = vec![crate::model::VocabularyEntry::new("gato", "cat", "feline").unwrap()];

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw(f.area(), f, &state)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Vocabulary EN-PT"));
        assert!(text.contains("gato - cat (feline)"));
        assert!(text.contains("Portuguese"));
    }

    #[test]
    fn centered_rect_fits_small_areas() {
        let r = centered_rect(Rect::new(0, 0, 20, 5), 50, 7);
        assert_eq!(r, Rect::new(0, 0, 20, 5));
    }
}
