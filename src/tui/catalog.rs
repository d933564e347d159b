use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, TableState};

use crate::domain::product::Product;
use crate::services::FieldEdit;
use crate::services::catalog::{CatalogEvent, CatalogState};

use super::{Action, Screen};

/// Presentation-only state of the catalog screen: the table cursor.
#[derive(Default)]
pub struct CatalogView {
    pub table: TableState,
}

/// Map one key press onto the catalog screen.
///
/// While a product is selected the keyboard belongs to the email prompt, so
/// shortcuts like `q` insert characters instead of quitting.
pub fn handle_key(key: KeyEvent, state: &CatalogState, view: &mut CatalogView) -> Action {
    if state.selected.is_some() {
        return match key.code {
            KeyCode::Esc => Action::Catalog(CatalogEvent::SelectionCleared),
            KeyCode::Enter => Action::Catalog(CatalogEvent::TraceSubmitted),
            KeyCode::Tab => Action::Switch(Screen::Console),
            KeyCode::Up => {
                super::step_cursor(&mut view.table, state.products.len(), false);
                Action::None
            }
            KeyCode::Down => {
                super::step_cursor(&mut view.table, state.products.len(), true);
                Action::None
            }
            KeyCode::Backspace => Action::Catalog(CatalogEvent::EmailEdited(FieldEdit::Backspace)),
            KeyCode::Char(ch) => Action::Catalog(CatalogEvent::EmailEdited(FieldEdit::Insert(ch))),
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Tab => Action::Switch(Screen::Console),
        KeyCode::Up => {
            super::step_cursor(&mut view.table, state.products.len(), false);
            Action::None
        }
        KeyCode::Down => {
            super::step_cursor(&mut view.table, state.products.len(), true);
            Action::None
        }
        KeyCode::Enter | KeyCode::Char('t') => match cursor_product(state, view) {
            Some(product) => Action::Catalog(CatalogEvent::Selected(product.id)),
            None => Action::None,
        },
        _ => Action::None,
    }
}

fn cursor_product<'a>(state: &'a CatalogState, view: &CatalogView) -> Option<&'a Product> {
    view.table
        .selected()
        .and_then(|index| state.products.get(index))
}

/// Draw the catalog screen.
pub fn render(frame: &mut Frame, state: &CatalogState, view: &mut CatalogView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
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
    frame.render_widget(super::header("Product Catalog", state_line), chunks[0]);

    if state.products.is_empty() {
        let empty = Paragraph::new("No products available at the moment.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Products "));
        frame.render_widget(empty, chunks[1]);
    } else {
        let table = super::product_table(&state.products, " Products ");
        frame.render_stateful_widget(table, chunks[1], &mut view.table);
    }

    match state.selected {
        Some(product_id) => {
            let title = super::trace_box_title(&state.products, product_id);
            let prompt = Paragraph::new(format!("Email: {}", state.email))
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(prompt, chunks[2]);

            let cursor_x = chunks[2].x + 1 + 7 + state.email.chars().count() as u16;
            frame.set_cursor_position((cursor_x, chunks[2].y + 1));
        }
        None => {
            let hint = Paragraph::new("Select a row and press Enter to trace a product.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(" Trace "));
            frame.render_widget(hint, chunks[2]);
        }
    }

    frame.render_widget(
        Paragraph::new(super::notice_line(state.notice.as_ref())),
        chunks[3],
    );

    let help = if state.selected.is_some() {
        "Enter submit | Esc close | Tab console | type to edit the email"
    } else {
        "q quit | Tab console | Up/Down row | Enter or t trace"
    };
    frame.render_widget(Paragraph::new(super::help_line(help)), chunks[4]);
}
