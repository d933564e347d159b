use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};

use crate::directory::{ProductReader, ProductWriter, TraceRecorder};
use crate::domain::product::Product;
use crate::services::catalog::{CatalogCommand, CatalogEvent};
use crate::services::console::{ConsoleCommand, ConsoleEvent};
use crate::services::{Notice, NoticeLevel};
use crate::services::{catalog as catalog_service, console as console_service};

pub mod catalog;
pub mod console;

use catalog::CatalogView;
use console::ConsoleView;

/// Everything the terminal runtime needs from the directory client.
pub trait Directory: ProductReader + ProductWriter + TraceRecorder + Send + Sync {}

impl<T> Directory for T where T: ProductReader + ProductWriter + TraceRecorder + Send + Sync {}

/// Which screen is on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Console,
    Catalog,
}

/// What a key press turned into.
pub enum Action {
    None,
    Quit,
    Switch(Screen),
    Catalog(CatalogEvent),
    Console(ConsoleEvent),
}

/// Completed directory calls flowing back into the event loop.
///
/// Each reply is stamped with the mount generation it was spawned under, so
/// work started before a screen switch is dropped instead of landing on a
/// freshly mounted screen.
enum Reply {
    Catalog(u64, CatalogEvent),
    Console(u64, ConsoleEvent),
}

/// Terminal application state: both screens plus the channel the worker
/// threads report back on.
pub struct App<D> {
    directory: Arc<D>,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
    screen: Screen,
    generation: u64,
    catalog: catalog_service::CatalogState,
    console: console_service::ConsoleState,
    catalog_view: CatalogView,
    console_view: ConsoleView,
    should_quit: bool,
}

impl<D> App<D>
where
    D: Directory + 'static,
{
    fn new(directory: Arc<D>) -> Self {
        let (tx, rx) = channel();

        Self {
            directory,
            tx,
            rx,
            screen: Screen::Console,
            generation: 0,
            catalog: catalog_service::CatalogState::default(),
            console: console_service::ConsoleState::default(),
            catalog_view: CatalogView::default(),
            console_view: ConsoleView::default(),
            should_quit: false,
        }
    }

    /// Switch to `screen`, resetting it the way a page load would.
    fn mount(&mut self, screen: Screen) {
        self.screen = screen;
        self.generation += 1;

        match screen {
            Screen::Console => {
                let (state, command) = console_service::init();
                self.console = state;
                self.console_view = ConsoleView::default();
                self.run_console(command);
            }
            Screen::Catalog => {
                let (state, command) = catalog_service::init();
                self.catalog = state;
                self.catalog_view = CatalogView::default();
                self.run_catalog(command);
            }
        }
    }

    fn apply_catalog(&mut self, event: CatalogEvent) {
        let state = std::mem::take(&mut self.catalog);
        let (state, command) = catalog_service::update(state, event);
        self.catalog = state;

        if let Some(command) = command {
            self.run_catalog(command);
        }
    }

    fn apply_console(&mut self, event: ConsoleEvent) {
        let state = std::mem::take(&mut self.console);
        let (state, command) = console_service::update(state, event);
        self.console = state;

        if let Some(command) = command {
            self.run_console(command);
        }
    }

    fn run_catalog(&self, command: CatalogCommand) {
        let directory = Arc::clone(&self.directory);
        let tx = self.tx.clone();
        let generation = self.generation;

        thread::spawn(move || {
            let event = catalog_service::execute(directory.as_ref(), command);
            let _ = tx.send(Reply::Catalog(generation, event));
        });
    }

    fn run_console(&self, command: ConsoleCommand) {
        let directory = Arc::clone(&self.directory);
        let tx = self.tx.clone();
        let generation = self.generation;

        thread::spawn(move || {
            let event = console_service::execute(directory.as_ref(), command);
            let _ = tx.send(Reply::Console(generation, event));
        });
    }

    fn drain_replies(&mut self) {
        while let Ok(reply) = self.rx.try_recv() {
            match reply {
                Reply::Catalog(generation, event) if generation == self.generation => {
                    self.apply_catalog(event);
                }
                Reply::Console(generation, event) if generation == self.generation => {
                    self.apply_console(event);
                }
                _ => {}
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = match self.screen {
            Screen::Console => console::handle_key(key, &self.console, &mut self.console_view),
            Screen::Catalog => catalog::handle_key(key, &self.catalog, &mut self.catalog_view),
        };

        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::Switch(screen) => self.mount(screen),
            Action::Catalog(event) => self.apply_catalog(event),
            Action::Console(event) => self.apply_console(event),
        }
    }

    fn render(&mut self, frame: &mut ratatui::Frame) {
        match self.screen {
            Screen::Console => console::render(frame, &self.console, &mut self.console_view),
            Screen::Catalog => catalog::render(frame, &self.catalog, &mut self.catalog_view),
        }
    }
}

/// Run the terminal UI against `directory` until the user quits.
pub fn run<D>(directory: Arc<D>) -> io::Result<()>
where
    D: Directory + 'static,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(directory);
    app.mount(Screen::Console);

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<D, B>(terminal: &mut Terminal<B>, app: &mut App<D>) -> io::Result<()>
where
    D: Directory + 'static,
    B: Backend,
{
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.drain_replies();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn step_cursor(table: &mut TableState, len: usize, down: bool) {
    if len == 0 {
        table.select(None);
        return;
    }

    let next = match table.selected() {
        None => 0,
        Some(index) if down => (index + 1).min(len - 1),
        Some(index) => index.saturating_sub(1),
    };
    table.select(Some(next));
}

fn product_table(products: &[Product], title: &str) -> Table<'static> {
    let rows: Vec<Row> = products
        .iter()
        .map(|product| {
            Row::new(vec![
                product.id.to_string(),
                product.name.clone(),
                product.description.clone(),
                format!("${:.2}", product.price),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(30),
            Constraint::Percentage(50),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["ID", "Name", "Description", "Price"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string()),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ")
}

fn header(title: &str, state_line: String) -> Paragraph<'static> {
    Paragraph::new(format!("{title} | {state_line}"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL))
}

fn notice_line(notice: Option<&Notice>) -> Line<'static> {
    match notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::styled(notice.text.clone(), Style::default().fg(color))
        }
        None => Line::raw(""),
    }
}

fn help_line(text: &str) -> Line<'static> {
    Line::styled(text.to_string(), Style::default().fg(Color::DarkGray))
}

fn trace_box_title(products: &[Product], product_id: i64) -> String {
    match products.iter().find(|product| product.id == product_id) {
        Some(product) => format!(" Trace {} ", product.name),
        None => format!(" Trace product #{product_id} "),
    }
}
