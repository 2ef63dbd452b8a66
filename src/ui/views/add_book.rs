use crate::library::{Book, Library, NewBook};
use crate::ui::components::{BookForm, FormEvent, KeyResult};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Form for adding a book. Stays open after a successful add so several
/// books can be entered in a row.
pub struct AddBookView {
  form: BookForm,
  last_added: Option<String>,
  /// Book sent to the store from this form, until the store answers
  submitted: Option<NewBook>,
}

impl AddBookView {
  pub fn new() -> Self {
    Self {
      form: BookForm::new(),
      last_added: None,
      submitted: None,
    }
  }
}

impl Default for AddBookView {
  fn default() -> Self {
    Self::new()
  }
}

impl View for AddBookView {
  fn handle_key(&mut self, key: KeyEvent, _library: &Library) -> ViewAction {
    match self.form.handle_key(key) {
      KeyResult::Event(FormEvent::Submitted(draft)) => match draft.validate() {
        Ok(book) => {
          self.submitted = Some(book.clone());
          ViewAction::Add(book)
        }
        Err(e) => {
          self.form.set_error(e.to_string());
          ViewAction::None
        }
      },
      KeyResult::Event(FormEvent::Cancelled) => ViewAction::Pop,
      KeyResult::Handled | KeyResult::NotHandled => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, _library: &Library) {
    let block = Block::default()
      .title(" Add a New Book ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Spacing
        Constraint::Min(0),    // Form
        Constraint::Length(1), // Last added
      ])
      .split(inner);

    self.form.render(frame, chunks[1]);

    if let Some(title) = &self.last_added {
      let line = Line::from(vec![
        Span::styled("Added ", Style::default().fg(Color::DarkGray)),
        Span::styled(title.as_str(), Style::default().fg(Color::Green)),
      ]);
      frame.render_widget(Paragraph::new(line), chunks[2]);
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Add Book".to_string()
  }

  fn captures_input(&self) -> bool {
    true
  }

  fn on_book_added(&mut self, book: &Book) {
    let Some(submitted) = self.submitted.take() else {
      return;
    };
    let added = NewBook {
      title: book.title.clone(),
      author: book.author.clone(),
      year: book.year,
      genre: book.genre.clone(),
      read: book.read,
    };
    // Keep whatever was typed after the submit
    if added == submitted && self.form.draft().validate().ok() == Some(submitted) {
      self.form.clear();
      self.last_added = Some(book.title.clone());
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("tab", "next field").with_priority(10),
      ShortcutInfo::new("space", "toggle read").with_priority(20),
      ShortcutInfo::new("enter", "save").with_priority(30),
      ShortcutInfo::new("esc", "back").with_priority(90),
    ]
  }
}
