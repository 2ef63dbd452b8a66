use color_eyre::Result;
use std::sync::Arc;
use tracing::info;

use super::{Book, BookDraft, Library};
use crate::store::BookStore;

/// A store handle plus the cache loaded from it.
///
/// Each mutation calls the store first and only touches the cache once the
/// store call returned successfully.
pub struct Session {
  store: Arc<dyn BookStore>,
  library: Library,
}

impl Session {
  /// Load the collection once and keep it as the session cache.
  pub async fn open(store: Arc<dyn BookStore>) -> Result<Self> {
    let books = store.list_all().await?;
    info!(count = books.len(), "loaded library");
    Ok(Self {
      store,
      library: Library::new(books),
    })
  }

  pub fn library(&self) -> &Library {
    &self.library
  }

  /// Validate, persist, then cache. Validation failures never reach the store.
  pub async fn add(&mut self, draft: &BookDraft) -> Result<&Book> {
    let new_book = draft.validate()?;
    let book = self.store.append(&new_book).await?;
    info!(id = %book.id, title = %book.title, "added book");
    self.library.insert(book);
    Ok(&self.library.books()[self.library.len() - 1])
  }

  /// Delete every book with this title from the store, then from the cache.
  /// Returns how many cached entries were dropped.
  pub async fn remove(&mut self, title: &str) -> Result<usize> {
    let deleted = self.store.delete_by_title(title).await?;
    let dropped = self.library.remove_title(title);
    info!(title, deleted, dropped, "removed books");
    Ok(dropped)
  }

  /// Rebuild the cache from a fresh listing.
  pub async fn refresh(&mut self) -> Result<()> {
    let books = self.store.list_all().await?;
    self.library = Library::new(books);
    Ok(())
  }
}
