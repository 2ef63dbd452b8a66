use crate::library::{Book, Library};
use crate::ui::components::{ConfirmEvent, ConfirmPrompt, KeyResult};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{read_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::{AddBookView, SearchView, StatsView};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Root view: every book in the library
pub struct BookListView {
  list_state: ListState,
  confirm: ConfirmPrompt,
}

impl BookListView {
  pub fn new() -> Self {
    Self {
      list_state: ListState::default(),
      confirm: ConfirmPrompt::new(),
    }
  }

  fn selected<'a>(&self, library: &'a Library) -> Option<&'a Book> {
    self
      .list_state
      .selected()
      .and_then(|idx| library.books().get(idx))
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, library: &Library) {
    ensure_valid_selection(&mut self.list_state, library.len());

    let block = Block::default()
      .title(format!(" Books ({}) ", library.len()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if library.is_empty() {
      let paragraph = Paragraph::new("Your library is empty. Press 'a' to add a book.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = library.books().iter().map(book_line).map(ListItem::new).collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl Default for BookListView {
  fn default() -> Self {
    Self::new()
  }
}

/// One row of the book table
pub(crate) fn book_line(book: &Book) -> Line<'static> {
  let year = if book.year == 0 {
    "-".to_string()
  } else {
    book.year.to_string()
  };

  Line::from(vec![
    Span::styled(
      format!("{:<36}", truncate(&book.title, 36)),
      Style::default().fg(Color::Cyan),
    ),
    Span::raw(" "),
    Span::raw(format!("{:<24}", truncate(&book.author, 24))),
    Span::raw(" "),
    Span::styled(format!("{:>5}", year), Style::default().fg(Color::White)),
    Span::raw("  "),
    Span::styled(
      format!("{:<16}", truncate(&book.genre, 16)),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw(" "),
    Span::styled(book.status_label(), Style::default().fg(read_color(book.read))),
  ])
}

impl View for BookListView {
  fn handle_key(&mut self, key: KeyEvent, library: &Library) -> ViewAction {
    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Confirmed(title)) => return ViewAction::Remove(title),
      KeyResult::Event(ConfirmEvent::Cancelled) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Char('a') => return ViewAction::Push(Box::new(AddBookView::new())),
      KeyCode::Char('s') | KeyCode::Char('/') => {
        return ViewAction::Push(Box::new(SearchView::new()))
      }
      KeyCode::Char('t') => return ViewAction::Push(Box::new(StatsView::new())),
      KeyCode::Char('r') => return ViewAction::Refresh,
      KeyCode::Char('d') | KeyCode::Delete => {
        if let Some(book) = self.selected(library) {
          let copies = library
            .books()
            .iter()
            .filter(|b| b.title == book.title)
            .count();
          let message = if copies > 1 {
            format!("Remove all {} books titled \"{}\"?", copies, book.title)
          } else {
            format!("Remove \"{}\"?", book.title)
          };
          self.confirm.show(message, book.title.clone());
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, library: &Library) {
    self.render_list(frame, area, library);
    self.confirm.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Books".to_string()
  }

  fn captures_input(&self) -> bool {
    self.confirm.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("a", "add").with_priority(20),
      ShortcutInfo::new("d", "remove").with_priority(30),
      ShortcutInfo::new("s", "search").with_priority(40),
      ShortcutInfo::new("t", "stats").with_priority(50),
      ShortcutInfo::new("r", "refresh").with_priority(60),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::views::tests::{key, sample_library};

  fn select_first(view: &mut BookListView, library: &Library) {
    ensure_valid_selection(&mut view.list_state, library.len());
  }

  #[test]
  fn test_delete_asks_for_confirmation() {
    let library = sample_library();
    let mut view = BookListView::new();
    select_first(&mut view, &library);

    assert!(matches!(
      view.handle_key(key(KeyCode::Char('d')), &library),
      ViewAction::None
    ));
    assert!(view.captures_input());

    match view.handle_key(key(KeyCode::Char('y')), &library) {
      ViewAction::Remove(title) => assert_eq!(title, "The Hobbit"),
      other => panic!("expected Remove, got {:?}", other),
    }
    assert!(!view.captures_input());
  }

  #[test]
  fn test_cancelled_delete_does_nothing() {
    let library = sample_library();
    let mut view = BookListView::new();
    select_first(&mut view, &library);

    view.handle_key(key(KeyCode::Char('d')), &library);
    assert!(matches!(
      view.handle_key(key(KeyCode::Char('n')), &library),
      ViewAction::None
    ));
    assert!(!view.captures_input());
  }

  #[test]
  fn test_delete_on_empty_library_is_ignored() {
    let library = Library::default();
    let mut view = BookListView::new();
    view.handle_key(key(KeyCode::Char('d')), &library);
    assert!(!view.captures_input());
  }

  #[test]
  fn test_navigation_keys() {
    let library = sample_library();
    let mut view = BookListView::new();
    assert!(matches!(
      view.handle_key(key(KeyCode::Char('a')), &library),
      ViewAction::Push(_)
    ));
    assert!(matches!(
      view.handle_key(key(KeyCode::Char('r')), &library),
      ViewAction::Refresh
    ));
    assert!(matches!(
      view.handle_key(key(KeyCode::Char('q')), &library),
      ViewAction::Pop
    ));
  }

  #[test]
  fn test_book_line_shows_all_fields() {
    let library = sample_library();
    let line = book_line(&library.books()[0]);
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    assert!(text.contains("The Hobbit"));
    assert!(text.contains("J.R.R. Tolkien"));
    assert!(text.contains("1937"));
    assert!(text.contains("Fantasy"));
    assert!(text.contains("Read"));
  }
}
