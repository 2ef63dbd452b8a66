//! Book records and the in-memory session cache that mirrors the store.

mod cache;
mod search;
mod session;
mod stats;

pub use cache::Library;
pub use search::SearchField;
pub use session::Session;
pub use stats::LibraryStats;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A catalogued book as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
  /// Store-assigned document id
  pub id: String,
  pub title: String,
  pub author: String,
  pub year: u32,
  pub genre: String,
  pub read: bool,
}

impl Book {
  /// Human readable read status
  pub fn status_label(&self) -> &'static str {
    if self.read {
      "Read"
    } else {
      "Unread"
    }
  }
}

/// A validated book that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
  pub title: String,
  pub author: String,
  pub year: u32,
  pub genre: String,
  pub read: bool,
}

impl NewBook {
  /// Attach the id the store generated for this record.
  pub fn into_book(self, id: String) -> Book {
    Book {
      id,
      title: self.title,
      author: self.author,
      year: self.year,
      genre: self.genre,
      read: self.read,
    }
  }
}

/// Raw input from the add form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
  pub title: String,
  pub author: String,
  pub year: u32,
  pub genre: String,
  pub read: bool,
}

/// Why a draft could not be turned into a [`NewBook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("please fill in the book title")]
  MissingTitle,
  #[error("please fill in the author")]
  MissingAuthor,
}

impl BookDraft {
  /// Trim text fields and check that title and author are present.
  pub fn validate(&self) -> Result<NewBook, ValidationError> {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(ValidationError::MissingTitle);
    }
    let author = self.author.trim();
    if author.is_empty() {
      return Err(ValidationError::MissingAuthor);
    }

    Ok(NewBook {
      title: title.to_string(),
      author: author.to_string(),
      year: self.year,
      genre: self.genre.trim().to_string(),
      read: self.read,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft(title: &str, author: &str) -> BookDraft {
    BookDraft {
      title: title.to_string(),
      author: author.to_string(),
      year: 1954,
      genre: "  Fantasy ".to_string(),
      read: true,
    }
  }

  #[test]
  fn test_validate_trims_fields() {
    let book = draft("  The Hobbit ", " J.R.R. Tolkien").validate().unwrap();
    assert_eq!(book.title, "The Hobbit");
    assert_eq!(book.author, "J.R.R. Tolkien");
    assert_eq!(book.genre, "Fantasy");
    assert_eq!(book.year, 1954);
    assert!(book.read);
  }

  #[test]
  fn test_validate_rejects_blank_title() {
    assert_eq!(
      draft("   ", "Tolkien").validate(),
      Err(ValidationError::MissingTitle)
    );
    assert_eq!(
      draft("", "Tolkien").validate(),
      Err(ValidationError::MissingTitle)
    );
  }

  #[test]
  fn test_validate_rejects_blank_author() {
    assert_eq!(
      draft("Dune", " \t").validate(),
      Err(ValidationError::MissingAuthor)
    );
  }

  #[test]
  fn test_empty_genre_is_allowed() {
    let mut d = draft("Dune", "Frank Herbert");
    d.genre = String::new();
    assert_eq!(d.validate().unwrap().genre, "");
  }

  #[test]
  fn test_into_book_keeps_fields() {
    let new_book = draft("Dune", "Frank Herbert").validate().unwrap();
    let book = new_book.clone().into_book("abc".to_string());
    assert_eq!(book.id, "abc");
    assert_eq!(book.title, new_book.title);
    assert_eq!(book.status_label(), "Read");
  }
}
