use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::library::{Book, Library, NewBook};
use crate::query::{Mutation, Query, QueryState};
use crate::store::BookStore;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::{draw_footer, draw_header, LibraryState, StatusMessage};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{AddBookView, BookListView, RemoveBookView, SearchView, StatsView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Result of a store write, applied to the library once it arrives
#[derive(Debug)]
enum Outcome {
  Added(Book),
  Removed { title: String, deleted: usize },
}

/// Main application state
pub struct App {
  /// Application configuration
  config: Config,

  /// Shared store handle, created once at startup
  store: Arc<dyn BookStore>,

  /// Session cache. Only the App mutates it, and only after a store call succeeded.
  library: Library,

  /// Full listing of the collection, run at startup and on refresh
  load: Query<Vec<Book>>,

  /// The one store write in flight, if any
  pending: Option<Mutation<Outcome>>,

  /// Navigation stack - root is always the book list
  view_stack: Vec<Box<dyn View>>,

  /// `:` command palette
  command: CommandInput,

  /// Latest status line message
  status: Option<StatusMessage>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  /// Build the app and start loading the library. Must be called inside a
  /// Tokio runtime.
  pub fn new(config: Config, store: Arc<dyn BookStore>) -> Self {
    let store_for_query = store.clone();
    let mut load = Query::new(move || {
      let store = store_for_query.clone();
      async move { store.list_all().await.map_err(|e| format!("{:#}", e)) }
    });
    load.fetch();

    Self {
      config,
      store,
      library: Library::default(),
      load,
      pending: None,
      view_stack: vec![Box::new(BookListView::new())],
      command: CommandInput::new(),
      status: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.main_loop(&mut terminal).await;

    // Cleanup terminal, even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));

    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.tick(),
      Event::Resize => {}
    }
  }

  /// Apply finished store calls
  fn tick(&mut self) {
    if self.load.poll() {
      match self.load.state() {
        QueryState::Success(books) => {
          info!(count = books.len(), "loaded library");
          self.library = Library::new(books.clone());
        }
        QueryState::Error(e) => {
          warn!(error = %e, "failed to load library");
          self.status = Some(StatusMessage::error(format!("Failed to load books: {}", e)));
        }
        QueryState::Idle | QueryState::Loading => {}
      }
    }

    let Some(mutation) = self.pending.as_mut() else {
      return;
    };
    let Some(result) = mutation.poll() else {
      return;
    };
    let label = mutation.label().to_string();
    self.pending = None;

    match result {
      Ok(outcome) => self.apply(outcome),
      Err(e) => {
        // Store rejected the write; the library stays as it was
        warn!(action = %label, error = %e, "store write failed");
        self.status = Some(StatusMessage::error(format!("{} failed: {}", label, e)));
      }
    }
  }

  fn apply(&mut self, outcome: Outcome) {
    match outcome {
      Outcome::Added(book) => {
        info!(id = %book.id, title = %book.title, "added book");
        self.status = Some(StatusMessage::success(format!(
          "Added \"{}\" to your library.",
          book.title
        )));
        if let Some(view) = self.view_stack.last_mut() {
          view.on_book_added(&book);
        }
        self.library.insert(book);
      }
      Outcome::Removed { title, deleted } => {
        let dropped = self.library.remove_title(&title);
        info!(title = %title, deleted, dropped, "removed books");
        self.status = Some(if deleted == 0 && dropped == 0 {
          StatusMessage::info(format!("No book titled \"{}\" found.", title))
        } else {
          StatusMessage::success(format!(
            "Removed {} titled \"{}\".",
            plural(deleted.max(dropped)),
            title
          ))
        });
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let captures = self
      .view_stack
      .last()
      .map(|view| view.captures_input())
      .unwrap_or(false);

    // The palette only opens when the view isn't taking text input
    if self.command.is_active() || !captures {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    let Some(view) = self.view_stack.last_mut() else {
      return;
    };
    let action = view.handle_key(key, &self.library);
    self.apply_action(action);
  }

  fn apply_action(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Add(book) => self.start_add(book),
      ViewAction::Remove(title) => self.start_remove(title),
      ViewAction::Refresh => self.refresh(),
    }
  }

  /// Writes wait for the initial load and for each other
  fn ready_to_write(&mut self) -> bool {
    if self.load.is_loading() {
      self.status = Some(StatusMessage::info(
        "Still loading the library, try again in a moment.",
      ));
      return false;
    }
    if let Some(pending) = &self.pending {
      self.status = Some(StatusMessage::info(format!(
        "{} is still in progress.",
        pending.label()
      )));
      return false;
    }
    true
  }

  fn start_add(&mut self, book: NewBook) {
    if !self.ready_to_write() {
      return;
    }

    let label = format!("Adding \"{}\"", book.title);
    self.status = Some(StatusMessage::info(format!("{}...", label)));

    let store = self.store.clone();
    self.pending = Some(Mutation::spawn(label, async move {
      store
        .append(&book)
        .await
        .map(Outcome::Added)
        .map_err(|e| format!("{:#}", e))
    }));
  }

  fn start_remove(&mut self, title: String) {
    if !self.ready_to_write() {
      return;
    }

    let label = format!("Removing \"{}\"", title);
    self.status = Some(StatusMessage::info(format!("{}...", label)));

    let store = self.store.clone();
    self.pending = Some(Mutation::spawn(label, async move {
      match store.delete_by_title(&title).await {
        Ok(deleted) => Ok(Outcome::Removed { title, deleted }),
        Err(e) => Err(format!("{:#}", e)),
      }
    }));
  }

  fn refresh(&mut self) {
    // A listing taken mid-write could miss the write
    if let Some(pending) = &self.pending {
      self.status = Some(StatusMessage::info(format!(
        "{} is still in progress.",
        pending.label()
      )));
      return;
    }

    info!("reloading library");
    self.status = Some(StatusMessage::info("Reloading books..."));
    self.load.refetch();
  }

  fn execute_command(&mut self, cmd: &str) {
    match cmd {
      "books" => self.reset_to(None),
      "add" => self.reset_to(Some(Box::new(AddBookView::new()))),
      "remove" => self.reset_to(Some(Box::new(RemoveBookView::new()))),
      "search" => self.reset_to(Some(Box::new(SearchView::new()))),
      "stats" => self.reset_to(Some(Box::new(StatsView::new()))),
      "refresh" => self.refresh(),
      "quit" => self.should_quit = true,
      "" => {}
      other => {
        self.status = Some(StatusMessage::error(format!("Unknown command: {}", other)));
      }
    }
  }

  /// Return to the book list, optionally opening `view` on top of it
  fn reset_to(&mut self, view: Option<Box<dyn View>>) {
    self.view_stack.truncate(1);
    if let Some(view) = view {
      self.view_stack.push(view);
    }
  }

  fn library_state(&self) -> LibraryState {
    if self.load.is_loading() {
      LibraryState::Loading
    } else if self.pending.is_some() {
      LibraryState::Saving
    } else {
      LibraryState::Ready(self.library.len())
    }
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    let shortcuts = self
      .view_stack
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default();
    draw_header(
      frame,
      chunks[0],
      self.config.display_title(),
      &self.store.describe(),
      self.library_state(),
      &shortcuts,
    );

    if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, chunks[1], &self.library);
    }
    self.command.render_overlay(frame, chunks[1]);

    let breadcrumb: Vec<String> = self
      .view_stack
      .iter()
      .map(|view| view.breadcrumb_label())
      .collect();
    draw_footer(frame, chunks[2], &breadcrumb, self.status.as_ref());
  }
}

fn plural(count: usize) -> String {
  if count == 1 {
    "1 book".to_string()
  } else {
    format!("{} books", count)
  }
}
