//! Document stores that hold the book collection.
//!
//! Every backend exposes the same small contract: list the whole collection,
//! append one record, and delete every record with a given title. There are
//! no retries and no multi-record transactions; errors propagate to the caller.

pub mod firestore;
pub mod sqlite;

use color_eyre::Result;
use futures::future::BoxFuture;
use std::sync::Arc;

use crate::config::{Backend, Config};
use crate::library::{Book, NewBook};

pub use firestore::FirestoreStore;
pub use sqlite::SqliteStore;

/// Contract for a book collection.
pub trait BookStore: Send + Sync {
  /// Fetch every record in the collection. No ordering guarantee.
  fn list_all(&self) -> BoxFuture<'_, Result<Vec<Book>>>;

  /// Insert a record under a store-generated id and return it.
  fn append<'a>(&'a self, book: &'a NewBook) -> BoxFuture<'a, Result<Book>>;

  /// Delete every record whose title equals `title` exactly.
  /// Returns the number of deleted records; zero matches is not an error.
  fn delete_by_title<'a>(&'a self, title: &'a str) -> BoxFuture<'a, Result<usize>>;

  /// Where the collection lives, for display
  fn describe(&self) -> String;
}

/// Build the configured store. Called once at startup; the handle is shared.
pub fn open(config: &Config) -> Result<Arc<dyn BookStore>> {
  let store: Arc<dyn BookStore> = match config.backend {
    Backend::Firestore => Arc::new(FirestoreStore::new(config)?),
    Backend::Sqlite => Arc::new(SqliteStore::open(config)?),
  };
  tracing::info!(store = %store.describe(), "opened book store");
  Ok(store)
}
