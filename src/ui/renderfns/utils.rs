use crate::ui::components::TextInput;
use ratatui::prelude::*;

/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for a book's read status
pub fn read_color(read: bool) -> Color {
  if read {
    Color::Green
  } else {
    Color::Yellow
  }
}

/// Overlay anchored to the top-left of the content area, with a small margin
pub fn top_left_overlay(area: Rect, height: u16) -> Rect {
  let width = (area.width * 60 / 100).clamp(30, 60);
  Rect::new(area.x + 1, area.y + 1, width, height).intersection(area)
}

/// Overlay of the given size centered in `area`, shrunk to fit
pub fn centered_overlay(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  let x = area.x + (area.width - width) / 2;
  let y = area.y + (area.height - height) / 2;
  Rect::new(x, y, width, height)
}

/// Prompt line for a text input with a block cursor at the cursor position
pub fn input_line(prefix: &str, input: &TextInput) -> Line<'static> {
  let (before, after) = input.split_at_cursor();
  let mut rest = after.chars();
  let under_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());

  Line::from(vec![
    Span::styled(prefix.to_string(), Style::default().fg(Color::Yellow)),
    Span::raw(before.to_string()),
    Span::styled(under_cursor, Style::default().bg(Color::Yellow).fg(Color::Black)),
    Span::raw(rest.as_str().to_string()),
  ])
}
