use crate::library::Library;
use crate::ui::ensure_valid_selection;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Pick a title to remove. Every book with that title is removed.
pub struct RemoveBookView {
  list_state: ListState,
}

impl RemoveBookView {
  pub fn new() -> Self {
    Self {
      list_state: ListState::default(),
    }
  }
}

impl Default for RemoveBookView {
  fn default() -> Self {
    Self::new()
  }
}

impl View for RemoveBookView {
  fn handle_key(&mut self, key: KeyEvent, library: &Library) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Enter => {
        let titles = library.titles();
        if let Some(title) = self.list_state.selected().and_then(|idx| titles.get(idx)) {
          return ViewAction::Remove(title.to_string());
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, library: &Library) {
    let titles = library.titles();
    ensure_valid_selection(&mut self.list_state, titles.len());

    let block = Block::default()
      .title(" Select the book to remove ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red));

    if titles.is_empty() {
      let paragraph = Paragraph::new("Your library is empty.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = titles
      .iter()
      .map(|title| ListItem::new(title.to_string()))
      .collect();

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

  fn breadcrumb_label(&self) -> String {
    "Remove Book".to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("enter", "remove").with_priority(20),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::views::tests::{key, sample_library};

  #[test]
  fn test_enter_removes_selected_title() {
    let library = sample_library();
    let mut view = RemoveBookView::new();
    ensure_valid_selection(&mut view.list_state, library.titles().len());
    view.handle_key(key(KeyCode::Down), &library);

    match view.handle_key(key(KeyCode::Enter), &library) {
      ViewAction::Remove(title) => assert_eq!(title, "Dune"),
      other => panic!("expected Remove, got {:?}", other),
    }
  }

  #[test]
  fn test_enter_on_empty_library_does_nothing() {
    let library = Library::default();
    let mut view = RemoveBookView::new();
    assert!(matches!(
      view.handle_key(key(KeyCode::Enter), &library),
      ViewAction::None
    ));
  }
}
