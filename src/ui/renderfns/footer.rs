use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Outcome shown in the footer after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
  Success,
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
  pub kind: StatusKind,
  pub text: String,
}

impl StatusMessage {
  pub fn success(text: impl Into<String>) -> Self {
    Self {
      kind: StatusKind::Success,
      text: text.into(),
    }
  }

  pub fn info(text: impl Into<String>) -> Self {
    Self {
      kind: StatusKind::Info,
      text: text.into(),
    }
  }

  pub fn error(text: impl Into<String>) -> Self {
    Self {
      kind: StatusKind::Error,
      text: text.into(),
    }
  }

  fn color(&self) -> Color {
    match self.kind {
      StatusKind::Success => Color::Green,
      StatusKind::Info => Color::Cyan,
      StatusKind::Error => Color::Red,
    }
  }
}

/// Draw the footer bar with view breadcrumb and the latest status message
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  breadcrumb: &[String],
  status: Option<&StatusMessage>,
) {
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == breadcrumb.len() - 1 {
      // Current view - highlighted
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  if let Some(status) = status {
    spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
      status.text.clone(),
      Style::default().fg(status.color()),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use ratatui::backend::TestBackend;
  use ratatui::Terminal;

  fn render(breadcrumb: &[String], status: Option<&StatusMessage>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
    terminal
      .draw(|frame| draw_footer(frame, frame.area(), breadcrumb, status))
      .unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  #[test]
  fn test_breadcrumb_joined() {
    let rendered = render(&["Books".to_string(), "Add Book".to_string()], None);
    assert!(rendered.contains("Books > Add Book"));
  }

  #[test]
  fn test_status_message_shown() {
    let status = StatusMessage::error("Failed to save book");
    let rendered = render(&["Books".to_string()], Some(&status));
    assert!(rendered.contains("Failed to save book"));
  }

  #[test]
  fn test_status_colors() {
    assert_eq!(StatusMessage::success("ok").color(), Color::Green);
    assert_eq!(StatusMessage::info("hm").color(), Color::Cyan);
    assert_eq!(StatusMessage::error("no").color(), Color::Red);
  }
}
