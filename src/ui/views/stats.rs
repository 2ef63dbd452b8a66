use crate::library::Library;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Reading statistics, recomputed from the library on every render
pub struct StatsView;

impl StatsView {
  pub fn new() -> Self {
    Self
  }
}

impl Default for StatsView {
  fn default() -> Self {
    Self::new()
  }
}

fn stat_line(label: &str, value: String, color: Color) -> Line<'static> {
  Line::from(vec![
    Span::styled(format!("  {:<28}", label), Style::default().fg(Color::DarkGray)),
    Span::styled(value, Style::default().fg(color).bold()),
  ])
}

impl View for StatsView {
  fn handle_key(&mut self, key: KeyEvent, _library: &Library) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => ViewAction::Refresh,
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, library: &Library) {
    let stats = library.stats();

    let block = Block::default()
      .title(" Library Statistics ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let lines = vec![
      Line::default(),
      stat_line("Total number of books:", stats.total.to_string(), Color::White),
      stat_line("Number of books read:", stats.read.to_string(), Color::Green),
      stat_line(
        "Percentage of books read:",
        stats.percentage_label(),
        Color::Yellow,
      ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
  }

  fn breadcrumb_label(&self) -> String {
    "Statistics".to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("r", "refresh").with_priority(60),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
