use super::Book;

/// Aggregate figures over the cached books.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryStats {
  pub total: usize,
  pub read: usize,
  pub read_percentage: f64,
}

impl LibraryStats {
  pub fn from_books(books: &[Book]) -> Self {
    let total = books.len();
    let read = books.iter().filter(|b| b.read).count();
    let read_percentage = if total > 0 {
      read as f64 / total as f64 * 100.0
    } else {
      0.0
    };

    Self {
      total,
      read,
      read_percentage,
    }
  }

  /// Read percentage with two decimals, e.g. "75.00%"
  pub fn percentage_label(&self) -> String {
    format!("{:.2}%", self.read_percentage)
  }
}
