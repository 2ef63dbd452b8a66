use super::search::SearchField;
use super::stats::LibraryStats;
use super::Book;

/// Session-scoped mirror of the store.
///
/// The cache is only mutated after the matching store call succeeded, so it
/// never holds a record the store rejected.
#[derive(Debug, Clone, Default)]
pub struct Library {
  books: Vec<Book>,
}

impl Library {
  pub fn new(books: Vec<Book>) -> Self {
    Self { books }
  }

  pub fn books(&self) -> &[Book] {
    &self.books
  }

  pub fn len(&self) -> usize {
    self.books.len()
  }

  pub fn is_empty(&self) -> bool {
    self.books.is_empty()
  }

  /// Distinct titles in first-seen order, for the removal selector
  pub fn titles(&self) -> Vec<&str> {
    let mut titles: Vec<&str> = Vec::new();
    for book in &self.books {
      if !titles.contains(&book.title.as_str()) {
        titles.push(&book.title);
      }
    }
    titles
  }

  /// Append a record the store has accepted.
  pub fn insert(&mut self, book: Book) {
    self.books.push(book);
  }

  /// Drop every record with exactly this title. Returns how many were dropped.
  pub fn remove_title(&mut self, title: &str) -> usize {
    let before = self.books.len();
    self.books.retain(|book| book.title != title);
    before - self.books.len()
  }

  /// Books whose `field` contains `query`, ignoring case.
  pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
    let needle = query.to_lowercase();
    self
      .books
      .iter()
      .filter(|book| field.value(book).to_lowercase().contains(&needle))
      .collect()
  }

  pub fn stats(&self) -> LibraryStats {
    LibraryStats::from_books(&self.books)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn book(id: &str, title: &str, author: &str, read: bool) -> Book {
    Book {
      id: id.to_string(),
      title: title.to_string(),
      author: author.to_string(),
      year: 2000,
      genre: String::new(),
      read,
    }
  }

  fn sample() -> Library {
    Library::new(vec![
      book("1", "The Hobbit", "J.R.R. Tolkien", true),
      book("2", "Dune", "Frank Herbert", false),
      book("3", "The Hobbit", "J.R.R. Tolkien", false),
      book("4", "Emma", "Jane Austen", true),
    ])
  }

  #[test]
  fn test_insert_grows_by_one() {
    let mut library = sample();
    library.insert(book("5", "Persuasion", "Jane Austen", false));
    assert_eq!(library.len(), 5);
    assert_eq!(library.books().last().unwrap().title, "Persuasion");
  }

  #[test]
  fn test_remove_title_drops_all_duplicates() {
    let mut library = sample();
    assert_eq!(library.remove_title("The Hobbit"), 2);
    assert_eq!(library.len(), 2);
    assert!(library.books().iter().all(|b| b.title != "The Hobbit"));
  }

  #[test]
  fn test_remove_absent_title_is_noop() {
    let mut library = sample();
    assert_eq!(library.remove_title("Missing"), 0);
    assert_eq!(library.remove_title("Missing"), 0);
    assert_eq!(library.len(), 4);
  }

  #[test]
  fn test_remove_title_is_exact_match() {
    let mut library = sample();
    assert_eq!(library.remove_title("the hobbit"), 0);
    assert_eq!(library.remove_title("Hobbit"), 0);
  }

  #[test]
  fn test_titles_are_distinct_in_order() {
    assert_eq!(sample().titles(), vec!["The Hobbit", "Dune", "Emma"]);
  }

  #[test]
  fn test_search_author_case_insensitive() {
    let library = sample();
    let found = library.search(SearchField::Author, "tolkien");
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|b| b.author == "J.R.R. Tolkien"));
  }

  #[test]
  fn test_search_title_substring() {
    let library = sample();
    let found = library.search(SearchField::Title, "UN");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Dune");
  }

  #[test]
  fn test_search_no_match_is_empty() {
    assert!(sample().search(SearchField::Title, "zzz").is_empty());
  }

  #[test]
  fn test_search_empty_query_matches_all() {
    assert_eq!(sample().search(SearchField::Author, "").len(), 4);
  }
}
