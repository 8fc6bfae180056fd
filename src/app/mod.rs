use std::io::Stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::ListState;
use ratatui::Terminal;

use crate::board::NoteBoard;
use crate::config::AppConfig;
use crate::ui;

pub mod state;

pub use state::{AppState, FocusPane};

enum Action {
    Quit,
    SelectNext,
    SelectPrevious,
    EditSelected,
    DeleteSelected,
    NextPage,
    PreviousPage,
    JumpToPage(usize),
    StartSearch,
    NewNote,
}

pub struct App {
    state: AppState,
    list_state: ListState,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let board = NoteBoard::with_page_size(config.notes_per_page);
        let state = AppState::new(board, config.preview_chars);
        let tick_rate = Duration::from_millis(config.tick_rate_ms.max(1));
        Self {
            state,
            list_state: ListState::default(),
            should_quit: false,
            tick_rate,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        tracing::info!(
            notes_per_page = self.state.board.notes_per_page(),
            "note board session started"
        );
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        tracing::info!(notes = self.state.board.len(), "note board session ended");
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal
                .draw(|frame| ui::draw_app(frame, &self.state, &mut self.list_state))
                .context("rendering frame")?;

            if self.should_quit {
                break;
            }

            if event::poll(self.tick_rate).context("polling for terminal events")? {
                match event::read().context("reading terminal event")? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {
                        // next draw adapts to the new size
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Tab => {
                self.state.focus_next();
                return;
            }
            KeyCode::BackTab => {
                self.state.focus_previous();
                return;
            }
            _ => {}
        }

        match self.state.focus {
            focus if focus.is_form() => self.handle_form_key(key),
            FocusPane::Search => self.handle_search_key(key),
            _ => {
                if let Some(action) = notes_action(key) {
                    self.handle_action(action);
                }
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('s') {
                self.state.clear_status_message();
                self.state.submit_form();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if !self.state.cancel_edit() {
                    self.state.focus = FocusPane::Notes;
                }
            }
            KeyCode::Enter => {
                if self.state.focus == FocusPane::Title {
                    self.state.focus = FocusPane::Body;
                } else {
                    self.state.push_input_char('\n');
                }
            }
            KeyCode::Backspace => {
                self.state.pop_input_char();
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::ALT | KeyModifiers::SUPER) =>
            {
                self.state.push_input_char(ch);
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.state.focus = FocusPane::Notes;
            }
            KeyCode::Backspace => {
                self.state.pop_input_char();
            }
            KeyCode::Char(ch)
                if !key.modifiers.intersects(
                    KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER,
                ) =>
            {
                self.state.push_input_char(ch);
            }
            _ => {}
        }
    }

    fn handle_action(&mut self, action: Action) {
        self.state.clear_status_message();
        match action {
            Action::Quit => self.should_quit = true,
            Action::SelectNext => self.state.move_selection(1),
            Action::SelectPrevious => self.state.move_selection(-1),
            Action::EditSelected => self.state.edit_selected(),
            Action::DeleteSelected => self.state.delete_selected(),
            Action::NextPage => {
                self.state.move_page(1);
            }
            Action::PreviousPage => {
                self.state.move_page(-1);
            }
            Action::JumpToPage(page) => {
                if !self.state.jump_to_page(page) {
                    tracing::debug!(page, "no such page button");
                }
            }
            Action::StartSearch => self.state.focus = FocusPane::Search,
            Action::NewNote => self.state.focus = FocusPane::Title,
        }
    }
}

fn notes_action(key: KeyEvent) -> Option<Action> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
        KeyCode::Char('e') | KeyCode::Enter => Some(Action::EditSelected),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteSelected),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::NextPage),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::PreviousPage),
        KeyCode::Char('/') => Some(Action::StartSearch),
        KeyCode::Char('a') => Some(Action::NewNote),
        KeyCode::Char(ch) => ch
            .to_digit(10)
            .filter(|digit| *digit > 0)
            .map(|digit| Action::JumpToPage(digit as usize)),
        _ => None,
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("switching to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal backend")?;
    terminal.hide_cursor().context("hiding cursor")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().context("disabling raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("restoring screen state")?;
    Ok(())
}
