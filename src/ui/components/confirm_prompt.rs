use super::KeyResult;
use crate::ui::renderfns::centered_overlay;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Events emitted by the confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmEvent {
  /// User agreed; carries the value the prompt was opened for
  Confirmed(String),
  Cancelled,
}

/// Yes/no overlay guarding a destructive action
#[derive(Debug, Clone, Default)]
pub struct ConfirmPrompt {
  active: bool,
  message: String,
  subject: String,
}

impl ConfirmPrompt {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Ask `message`; `subject` comes back in [`ConfirmEvent::Confirmed`].
  pub fn show(&mut self, message: String, subject: String) {
    self.active = true;
    self.message = message;
    self.subject = subject;
  }

  fn hide(&mut self) {
    self.active = false;
    self.message.clear();
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ConfirmEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
        let subject = std::mem::take(&mut self.subject);
        self.hide();
        KeyResult::Event(ConfirmEvent::Confirmed(subject))
      }
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('q') => {
        self.subject.clear();
        self.hide();
        KeyResult::Event(ConfirmEvent::Cancelled)
      }
      // Modal: swallow everything else
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let overlay_area = centered_overlay(area, 50, 5);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red))
      .title(" Confirm ");

    let text = vec![
      Line::from(self.message.as_str()),
      Line::from(vec![
        Span::styled("<y>", Style::default().fg(Color::Cyan)),
        Span::styled(" yes   ", Style::default().fg(Color::DarkGray)),
        Span::styled("<n>", Style::default().fg(Color::Cyan)),
        Span::styled(" no", Style::default().fg(Color::DarkGray)),
      ]),
    ];

    let paragraph = Paragraph::new(text)
      .block(block)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, overlay_area);
  }
}
