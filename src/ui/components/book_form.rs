use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::library::BookDraft;
use crate::ui::renderfns::input_line;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Digits in `u32::MAX`, the largest year a record can hold
const YEAR_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
  #[default]
  Title,
  Author,
  Year,
  Genre,
  Read,
}

impl FormField {
  const ALL: [FormField; 5] = [
    FormField::Title,
    FormField::Author,
    FormField::Year,
    FormField::Genre,
    FormField::Read,
  ];

  fn index(self) -> usize {
    Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
  }

  fn next(self) -> Self {
    Self::ALL[(self.index() + 1) % Self::ALL.len()]
  }

  fn prev(self) -> Self {
    Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
  }

  fn label(self) -> &'static str {
    match self {
      FormField::Title => "Book Title",
      FormField::Author => "Author",
      FormField::Year => "Publication Year",
      FormField::Genre => "Genre",
      FormField::Read => "Have you read this book?",
    }
  }
}

/// Events emitted by the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
  Submitted(BookDraft),
  Cancelled,
}

/// Add-a-book form: four text fields and a read checkbox
#[derive(Debug, Clone)]
pub struct BookForm {
  title: TextInput,
  author: TextInput,
  year: TextInput,
  genre: TextInput,
  read: bool,
  focus: FormField,
  error: Option<String>,
}

impl Default for BookForm {
  fn default() -> Self {
    Self {
      title: TextInput::new(),
      author: TextInput::new(),
      year: TextInput::numeric(YEAR_DIGITS),
      genre: TextInput::new(),
      read: false,
      focus: FormField::default(),
      error: None,
    }
  }
}

impl BookForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn focus(&self) -> FormField {
    self.focus
  }

  /// Show a problem with the last submission
  pub fn set_error(&mut self, error: String) {
    self.error = Some(error);
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Reset every field and move focus back to the title
  pub fn clear(&mut self) {
    *self = Self::default();
  }

  /// Current field values
  pub fn draft(&self) -> BookDraft {
    BookDraft {
      title: self.title.value().to_string(),
      author: self.author.value().to_string(),
      // Empty input counts as year 0; the input only takes digits
      year: self.year.value().parse().unwrap_or(0),
      genre: self.genre.value().to_string(),
      read: self.read,
    }
  }

  fn focused_input(&mut self) -> Option<&mut TextInput> {
    match self.focus {
      FormField::Title => Some(&mut self.title),
      FormField::Author => Some(&mut self.author),
      FormField::Year => Some(&mut self.year),
      FormField::Genre => Some(&mut self.genre),
      FormField::Read => None,
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    match key.code {
      KeyCode::Esc => return KeyResult::Event(FormEvent::Cancelled),
      KeyCode::Enter => {
        let year = self.year.value();
        if !year.is_empty() && year.parse::<u32>().is_err() {
          self.error = Some(format!("publication year must be at most {}", u32::MAX));
          return KeyResult::Handled;
        }
        return KeyResult::Event(FormEvent::Submitted(self.draft()));
      }
      KeyCode::Tab | KeyCode::Down => {
        self.focus = self.focus.next();
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = self.focus.prev();
        return KeyResult::Handled;
      }
      KeyCode::Char(' ') if self.focus == FormField::Read => {
        self.read = !self.read;
        return KeyResult::Handled;
      }
      _ => {}
    }

    let Some(input) = self.focused_input() else {
      return KeyResult::NotHandled;
    };
    match input.handle_key(key) {
      InputResult::Consumed => {
        self.error = None;
        KeyResult::Handled
      }
      InputResult::NotHandled => KeyResult::NotHandled,
      // Enter and Esc are handled above
      InputResult::Submitted(_) | InputResult::Cancelled => KeyResult::Handled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let mut lines = Vec::new();

    for field in FormField::ALL {
      let focused = field == self.focus;
      let label_style = if focused {
        Style::default().fg(Color::Yellow).bold()
      } else {
        Style::default().fg(Color::White)
      };
      let marker = if focused { "> " } else { "  " };

      let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(format!("{:<26}", field.label()), label_style),
      ];

      let input = match field {
        FormField::Title => Some(&self.title),
        FormField::Author => Some(&self.author),
        FormField::Year => Some(&self.year),
        FormField::Genre => Some(&self.genre),
        FormField::Read => None,
      };

      match input {
        Some(input) if focused => spans.extend(input_line("", input).spans),
        Some(input) => spans.push(Span::raw(input.value().to_string())),
        None => {
          let checkbox = if self.read { "[x]" } else { "[ ]" };
          spans.push(Span::styled(checkbox, Style::default().fg(Color::Cyan)));
        }
      }

      lines.push(Line::from(spans));
      lines.push(Line::default());
    }

    if let Some(error) = &self.error {
      lines.push(Line::from(Span::styled(
        error.as_str(),
        Style::default().fg(Color::Red),
      )));
    }

    frame.render_widget(Paragraph::new(lines), area);
  }
}
