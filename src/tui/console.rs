use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, TableState};

use crate::domain::product::Product;
use crate::services::FieldEdit;
use crate::services::console::{ConsoleEvent, ConsoleState, DraftField};

use super::{Action, Screen};

/// Presentation-only state of the console screen: table cursor plus which
/// input owns the keyboard.
pub struct ConsoleView {
    pub table: TableState,
    pub focus: Focus,
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self {
            table: TableState::default(),
            focus: Focus::Table,
        }
    }
}

/// Which part of the console currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Form(DraftField),
    Trace,
}

/// Map one key press onto the console screen.
pub fn handle_key(key: KeyEvent, state: &ConsoleState, view: &mut ConsoleView) -> Action {
    match view.focus {
        Focus::Table => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Tab => Action::Switch(Screen::Catalog),
            KeyCode::Up => {
                super::step_cursor(&mut view.table, state.products.len(), false);
                Action::None
            }
            KeyCode::Down => {
                super::step_cursor(&mut view.table, state.products.len(), true);
                Action::None
            }
            KeyCode::Char('n') => {
                view.focus = Focus::Form(DraftField::Name);
                Action::None
            }
            KeyCode::Char('e') => match cursor_product(state, view) {
                Some(product) => {
                    view.focus = Focus::Form(DraftField::Name);
                    Action::Console(ConsoleEvent::EditStarted(product.clone()))
                }
                None => Action::None,
            },
            KeyCode::Char('d') => match cursor_product(state, view) {
                Some(product) => Action::Console(ConsoleEvent::DeleteRequested(product.id)),
                None => Action::None,
            },
            KeyCode::Char('t') => match cursor_product(state, view) {
                Some(product) => {
                    view.focus = Focus::Trace;
                    Action::Console(ConsoleEvent::TraceStarted(product.id))
                }
                None => Action::None,
            },
            _ => Action::None,
        },
        Focus::Form(field) => match key.code {
            KeyCode::Esc => {
                view.focus = Focus::Table;
                Action::None
            }
            KeyCode::Enter => {
                view.focus = Focus::Table;
                Action::Console(ConsoleEvent::DraftSubmitted)
            }
            KeyCode::Tab | KeyCode::Down => {
                view.focus = Focus::Form(next_field(field));
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                view.focus = Focus::Form(previous_field(field));
                Action::None
            }
            KeyCode::Backspace => {
                Action::Console(ConsoleEvent::DraftEdited(field, FieldEdit::Backspace))
            }
            KeyCode::Char(ch) => {
                Action::Console(ConsoleEvent::DraftEdited(field, FieldEdit::Insert(ch)))
            }
            _ => Action::None,
        },
        Focus::Trace => match key.code {
            KeyCode::Esc => {
                view.focus = Focus::Table;
                Action::None
            }
            KeyCode::Enter => {
                view.focus = Focus::Table;
                Action::Console(ConsoleEvent::TraceSubmitted)
            }
            KeyCode::Backspace => Action::Console(ConsoleEvent::TraceEdited(FieldEdit::Backspace)),
            KeyCode::Char(ch) => Action::Console(ConsoleEvent::TraceEdited(FieldEdit::Insert(ch))),
            _ => Action::None,
        },
    }
}

fn next_field(field: DraftField) -> DraftField {
    match field {
        DraftField::Name => DraftField::Description,
        DraftField::Description => DraftField::Price,
        DraftField::Price => DraftField::Name,
    }
}

fn previous_field(field: DraftField) -> DraftField {
    match field {
        DraftField::Name => DraftField::Price,
        DraftField::Description => DraftField::Name,
        DraftField::Price => DraftField::Description,
    }
}

fn cursor_product<'a>(state: &'a ConsoleState, view: &ConsoleView) -> Option<&'a Product> {
    view.table
        .selected()
        .and_then(|index| state.products.get(index))
}

/// Draw the console screen.
pub fn render(frame: &mut Frame, state: &ConsoleState, view: &mut ConsoleView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let state_line = match state.refreshed_at {
        Some(refreshed_at) => format!(
            "{} products | refreshed {}",
            state.products.len(),
            refreshed_at.format("%H:%M:%S")
        ),
        None => "loading...".to_string(),
    };
    frame.render_widget(super::header("Management Console", state_line), chunks[0]);

    let form_title = match &state.editing {
        Some(product) => format!(" Edit product #{} ", product.id),
        None => " Add product ".to_string(),
    };
    let form_lines = vec![
        field_line("Name", &state.draft.name, view.focus, DraftField::Name),
        field_line(
            "Description",
            &state.draft.description,
            view.focus,
            DraftField::Description,
        ),
        field_line("Price", &state.draft.price, view.focus, DraftField::Price),
    ];
    frame.render_widget(
        Paragraph::new(form_lines).block(Block::default().borders(Borders::ALL).title(form_title)),
        chunks[1],
    );

    if let Focus::Form(field) = view.focus {
        let (row, value) = match field {
            DraftField::Name => (0, &state.draft.name),
            DraftField::Description => (1, &state.draft.description),
            DraftField::Price => (2, &state.draft.price),
        };
        let cursor_x = chunks[1].x + 1 + 13 + value.chars().count() as u16;
        frame.set_cursor_position((cursor_x, chunks[1].y + 1 + row));
    }

    let table = super::product_table(&state.products, " Products ");
    frame.render_stateful_widget(table, chunks[2], &mut view.table);

    match &state.trace {
        Some(draft) => {
            let title = super::trace_box_title(&state.products, draft.product_id);
            let prompt = Paragraph::new(format!("Email: {}", draft.email))
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(prompt, chunks[3]);

            if view.focus == Focus::Trace {
                let cursor_x = chunks[3].x + 1 + 7 + draft.email.chars().count() as u16;
                frame.set_cursor_position((cursor_x, chunks[3].y + 1));
            }
        }
        None => {
            let hint = Paragraph::new("Press t on a row to record a trace.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(" Trace "));
            frame.render_widget(hint, chunks[3]);
        }
    }

    frame.render_widget(
        Paragraph::new(super::notice_line(state.notice.as_ref())),
        chunks[4],
    );

    let help = match view.focus {
        Focus::Table => "q quit | Tab catalog | Up/Down row | n new | e edit | d delete | t trace",
        Focus::Form(_) => "Enter save | Tab next field | Esc back | type to edit",
        Focus::Trace => "Enter submit | Esc back | type to edit the email",
    };
    frame.render_widget(Paragraph::new(super::help_line(help)), chunks[5]);
}

fn field_line(label: &str, value: &str, focus: Focus, field: DraftField) -> Line<'static> {
    let style = if focus == Focus::Form(field) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    Line::styled(format!("{:<13}{value}", format!("{label}:")), style)
}
