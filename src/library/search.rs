use super::Book;

/// Which field a search matches against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchField {
  #[default]
  Author,
  Title,
}

impl SearchField {
  pub fn value<'a>(&self, book: &'a Book) -> &'a str {
    match self {
      SearchField::Author => &book.author,
      SearchField::Title => &book.title,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      SearchField::Author => "Author",
      SearchField::Title => "Book Title",
    }
  }

  /// The other field
  pub fn toggle(self) -> Self {
    match self {
      SearchField::Author => SearchField::Title,
      SearchField::Title => SearchField::Author,
    }
  }
}

impl std::str::FromStr for SearchField {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "author" | "a" => Ok(SearchField::Author),
      "title" | "t" => Ok(SearchField::Title),
      other => Err(format!("unknown search field '{}', expected author or title", other)),
    }
  }
}
