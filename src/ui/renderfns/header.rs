use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// What the header shows about the library next to the title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryState {
  Loading,
  Saving,
  Ready(usize),
}

impl LibraryState {
  fn label(&self) -> String {
    match self {
      LibraryState::Loading => "loading...".to_string(),
      LibraryState::Saving => "saving...".to_string(),
      LibraryState::Ready(1) => "1 book".to_string(),
      LibraryState::Ready(n) => format!("{} books", n),
    }
  }
}

/// Draw the header bar with title, store location, library state and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  location: &str,
  state: LibraryState,
  shortcuts: &[ShortcutInfo],
) {
  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", location), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", state.label()),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::raw(" "),
  ];

  let mut shortcuts: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  shortcuts.sort_by_key(|s| s.priority);

  // Shortcuts - keys and brackets highlighted, descriptions dimmed
  for shortcut in shortcuts {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
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

  #[test]
  fn test_state_labels() {
    assert_eq!(LibraryState::Loading.label(), "loading...");
    assert_eq!(LibraryState::Saving.label(), "saving...");
    assert_eq!(LibraryState::Ready(0).label(), "0 books");
    assert_eq!(LibraryState::Ready(1).label(), "1 book");
    assert_eq!(LibraryState::Ready(12).label(), "12 books");
  }

  #[test]
  fn test_header_renders_shortcuts_in_priority_order() {
    let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
    let shortcuts = vec![
      ShortcutInfo::new("q", "back").with_priority(30),
      ShortcutInfo::new(":", "command").with_priority(10),
    ];
    terminal
      .draw(|frame| {
        draw_header(
          frame,
          frame.area(),
          "Personal Library",
          "sqlite:library.db",
          LibraryState::Ready(3),
          &shortcuts,
        )
      })
      .unwrap();

    let rendered: String = terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect();
    assert!(rendered.contains("Personal Library"));
    assert!(rendered.contains("3 books"));
    let command = rendered.find("<:> command").unwrap();
    let back = rendered.find("<q> back").unwrap();
    assert!(command < back);
  }
}
