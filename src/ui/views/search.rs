use crate::library::{Library, SearchField};
use crate::ui::components::{InputResult, TextInput};
use crate::ui::renderfns::input_line;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::book_list::book_line;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Search the library by author or title
pub struct SearchView {
  field: SearchField,
  input: TextInput,
  /// Last submitted search. Results are recomputed against the live library.
  submitted: Option<(SearchField, String)>,
  list_state: ListState,
}

impl SearchView {
  pub fn new() -> Self {
    Self {
      field: SearchField::default(),
      input: TextInput::new(),
      submitted: None,
      list_state: ListState::default(),
    }
  }

  fn render_prompt(&self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(" Search ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow));

    let mut spans = vec![
      Span::styled("Search by ", Style::default().fg(Color::DarkGray)),
      Span::styled(
        format!("[{}]", self.field.label()),
        Style::default().fg(Color::Cyan).bold(),
      ),
      Span::raw(" "),
    ];
    spans.extend(input_line("", &self.input).spans);

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
  }

  fn render_results(&mut self, frame: &mut Frame, area: Rect, library: &Library) {
    let Some((field, query)) = &self.submitted else {
      let paragraph = Paragraph::new("Press Enter to search, Tab to switch between author and title.")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    };

    let results = library.search(*field, query);
    if self.list_state.selected().is_none() && !results.is_empty() {
      self.list_state.select(Some(0));
    }
    if let Some(idx) = self.list_state.selected() {
      if idx >= results.len() {
        self.list_state.select(results.len().checked_sub(1));
      }
    }

    let block = Block::default()
      .title(format!(" Results ({}) ", results.len()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if results.is_empty() {
      let paragraph = Paragraph::new("No book found.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = results
      .into_iter()
      .map(|book| ListItem::new(book_line(book)))
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray))
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl Default for SearchView {
  fn default() -> Self {
    Self::new()
  }
}

impl View for SearchView {
  fn handle_key(&mut self, key: KeyEvent, _library: &Library) -> ViewAction {
    match key.code {
      KeyCode::Tab | KeyCode::BackTab => {
        self.field = self.field.toggle();
        return ViewAction::None;
      }
      KeyCode::Down => {
        self.list_state.select_next();
        return ViewAction::None;
      }
      KeyCode::Up => {
        self.list_state.select_previous();
        return ViewAction::None;
      }
      _ => {}
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(query) => {
        self.submitted = Some((self.field, query));
        self.list_state.select(None);
        ViewAction::None
      }
      InputResult::Cancelled => ViewAction::Pop,
      InputResult::Consumed | InputResult::NotHandled => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, library: &Library) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Prompt
        Constraint::Min(0),    // Results
      ])
      .split(area);

    self.render_prompt(frame, chunks[0]);
    self.render_results(frame, chunks[1], library);
  }

  fn breadcrumb_label(&self) -> String {
    match &self.submitted {
      Some((field, query)) => format!("Search [{}: {}]", field.label(), query),
      None => "Search".to_string(),
    }
  }

  fn captures_input(&self) -> bool {
    true
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("tab", "author/title").with_priority(10),
      ShortcutInfo::new("enter", "search").with_priority(20),
      ShortcutInfo::new("esc", "back").with_priority(90),
    ]
  }
}
