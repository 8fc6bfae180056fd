use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::app::state::{AppState, FocusPane};
use crate::board::FormMode;
use crate::highlight::build_highlight_regex;

pub mod format;

pub use format::{format_long_timestamp, preview_text, PREVIEW_CHARS};

pub fn draw_app(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(frame.size());

    draw_form(frame, state, rows[0], rows[1]);
    draw_search(frame, state, rows[2]);
    draw_notes(frame, state, list_state, rows[3]);
    draw_pager(frame, state, rows[4]);

    let status = Paragraph::new(build_status_line(state)).style(Style::default().fg(Color::Gray));
    frame.render_widget(status, rows[5]);
}

fn pane_style(state: &AppState, pane: FocusPane) -> Style {
    if state.focus == pane {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_form(frame: &mut Frame, state: &AppState, title_area: Rect, body_area: Rect) {
    let draft = state.board.draft();
    let mode = state.board.mode();

    let title_label = match mode {
        FormMode::Creating => "Note Title".to_string(),
        FormMode::Editing { index } => format!("Note Title (editing #{})", index + 1),
    };
    let title_input = Paragraph::new(placeholder_or(&draft.title, "Note Title")).block(
        Block::default()
            .title(title_label)
            .borders(Borders::ALL)
            .border_style(pane_style(state, FocusPane::Title)),
    );
    frame.render_widget(title_input, title_area);

    let submit_style = if mode.is_editing() {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
    };
    let mut hint = vec![
        Span::styled(format!("[ {} ]", mode.submit_label()), submit_style),
        Span::styled(" Ctrl-s", Style::default().fg(Color::Gray)),
    ];
    if mode.is_editing() {
        hint.push(Span::styled(" • Esc discard", Style::default().fg(Color::Gray)));
    }
    let body_input = Paragraph::new(placeholder_or(&draft.text, "Write your note here..."))
        .block(
            Block::default()
                .title("Note")
                .title_bottom(Line::from(hint))
                .borders(Borders::ALL)
                .border_style(pane_style(state, FocusPane::Body)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(body_input, body_area);

    match state.focus {
        FocusPane::Title => set_input_cursor(frame, title_area, &draft.title),
        FocusPane::Body => set_input_cursor(frame, body_area, &draft.text),
        _ => {}
    }
}

fn draw_search(frame: &mut Frame, state: &AppState, area: Rect) {
    let search_text = state.board.search_text();
    let input = Paragraph::new(placeholder_or(search_text, "Search notes...")).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(pane_style(state, FocusPane::Search)),
    );
    frame.render_widget(input, area);
    if state.focus == FocusPane::Search {
        set_input_cursor(frame, area, search_text);
    }
}

fn draw_notes(frame: &mut Frame, state: &AppState, list_state: &mut ListState, area: Rect) {
    let highlight_regex = build_highlight_regex(state.board.search_text());
    let highlight_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let editing_index = match state.board.mode() {
        FormMode::Editing { index } => Some(index),
        FormMode::Creating => None,
    };

    let page = state.page_notes();
    let mut items = Vec::with_capacity(page.len());
    for entry in &page {
        let note = entry.note;
        let mut title_spans = Vec::new();
        if editing_index == Some(entry.index) {
            title_spans.push(Span::styled(
                "✎ ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        title_spans.extend(highlight_line(
            &note.title,
            highlight_regex.as_ref(),
            highlight_style,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let preview = preview_text(&note.text, state.preview_chars).replace('\n', " ");
        let lines = vec![
            Line::from(title_spans),
            Line::from(highlight_line(
                &preview,
                highlight_regex.as_ref(),
                highlight_style,
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format_long_timestamp(note.timestamp),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];
        items.push(ListItem::new(lines));
    }

    if items.is_empty() {
        let message = if state.board.is_empty() {
            "No notes yet. Type a title and body, then press Ctrl-s."
        } else if state.board.filtered_notes().is_empty() {
            "No notes match the search."
        } else {
            "Nothing on this page. Pick another page below."
        };
        items.push(ListItem::new(message));
        list_state.select(None);
    } else if state.focus == FocusPane::Notes {
        list_state.select(state.selected_on_page());
    } else {
        list_state.select(None);
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title("Notes • Enter edit • d delete • h/l page")
                .borders(Borders::ALL)
                .border_style(pane_style(state, FocusPane::Notes)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, list_state);
}

fn draw_pager(frame: &mut Frame, state: &AppState, area: Rect) {
    let total = state.board.total_pages();
    let current = state.board.current_page();
    let mut spans = Vec::with_capacity(total * 2);
    for page in 1..=total {
        let style = if page == current {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {page} "), style));
        spans.push(Span::raw(" "));
    }
    let pager = Paragraph::new(Line::from(spans))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().title("Pages").borders(Borders::ALL));
    frame.render_widget(pager, area);
}

fn build_status_line(state: &AppState) -> Text<'static> {
    let board = &state.board;
    let focus = match state.focus {
        FocusPane::Title => "Title",
        FocusPane::Body => "Body",
        FocusPane::Search => "Search",
        FocusPane::Notes => "Notes",
    };
    let mode_style = if board.mode().is_editing() {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let spans = vec![
        Span::raw(format!("Total: {} ", board.len())),
        Span::raw(format!(" | Matching: {} ", board.filtered_notes().len())),
        Span::raw(" | Page: "),
        Span::styled(
            format!("{}/{}", board.current_page(), board.total_pages()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Mode: "),
        Span::styled(board.mode().submit_label(), mode_style),
        Span::raw(" | Focus: "),
        Span::styled(focus, Style::default().add_modifier(Modifier::BOLD)),
    ];

    let mut lines = vec![Line::from(spans)];
    if let Some(message) = &state.status_message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Tab switch pane • Ctrl-s save • / search • q quit",
            Style::default().fg(Color::DarkGray),
        )));
    }
    Text::from(lines)
}

fn placeholder_or<'a>(value: &'a str, placeholder: &'a str) -> Text<'a> {
    if value.is_empty() {
        Text::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        Text::from(value)
    }
}

/// Places the terminal cursor after the last character of a bordered
/// input. Long lines are not wrapped for cursor purposes; the position is
/// clamped to the inner area.
fn set_input_cursor(frame: &mut Frame, area: Rect, value: &str) {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    if inner_width == 0 || inner_height == 0 {
        return;
    }
    let row = value.matches('\n').count() as u16;
    let last_line = value.rsplit('\n').next().unwrap_or("");
    let col = UnicodeWidthStr::width(last_line).min(inner_width as usize - 1) as u16;
    let row = row.min(inner_height - 1);
    frame.set_cursor(area.x + 1 + col, area.y + 1 + row);
}

fn highlight_line(
    text: &str,
    regex: Option<&Regex>,
    highlight_style: Style,
    base_style: Style,
) -> Vec<Span<'static>> {
    if let Some(re) = regex {
        let mut spans = Vec::new();
        let mut last = 0;
        for mat in re.find_iter(text) {
            if mat.start() > last {
                spans.push(Span::styled(
                    text[last..mat.start()].to_string(),
                    base_style,
                ));
            }
            spans.push(Span::styled(mat.as_str().to_string(), highlight_style));
            last = mat.end();
        }
        if last < text.len() {
            spans.push(Span::styled(text[last..].to_string(), base_style));
        }
        if spans.is_empty() {
            spans.push(Span::styled(text.to_string(), base_style));
        }
        spans
    } else {
        vec![Span::styled(text.to_string(), base_style)]
    }
}
