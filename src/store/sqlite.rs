//! Book collection kept in a local SQLite file.

use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::BookStore;
use crate::config::Config;
use crate::library::{Book, NewBook};

/// SQLite-backed collection. Each record is one row; the rowid is the id.
pub struct SqliteStore {
  conn: Mutex<Connection>,
  table: String,
  location: String,
}

impl SqliteStore {
  /// Open the database named in the config, or the default data-dir file.
  pub fn open(config: &Config) -> Result<Self> {
    let path = match &config.sqlite.path {
      Some(p) => p.clone(),
      None => Self::default_path()?,
    };

    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create database directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open database at {}: {}", path.display(), e))?;

    Self::with_connection(conn, &config.collection, &path)
  }

  /// A throwaway in-memory collection named `library`.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;
    Self::with_connection(conn, "library", Path::new(":memory:"))
  }

  fn with_connection(conn: Connection, collection: &str, path: &Path) -> Result<Self> {
    let table = table_name(collection)?;
    let store = Self {
      conn: Mutex::new(conn),
      location: format!("sqlite:{}#{}", path.display(), table),
      table,
    };
    store.run_migrations()?;
    Ok(store)
  }

  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("bookshelf").join("library.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let schema = format!(
      "CREATE TABLE IF NOT EXISTS {table} (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           title TEXT NOT NULL DEFAULT '',
           author TEXT NOT NULL DEFAULT '',
           year INTEGER NOT NULL DEFAULT 0,
           genre TEXT NOT NULL DEFAULT '',
           read INTEGER NOT NULL DEFAULT 0,
           created_at TEXT NOT NULL DEFAULT (datetime('now'))
       );
       CREATE INDEX IF NOT EXISTS idx_{table}_title ON {table}(title);",
      table = self.table
    );

    conn
      .execute_batch(&schema)
      .map_err(|e| eyre!("Failed to run migrations: {}", e))?;

    Ok(())
  }

  fn list_rows(&self) -> Result<Vec<Book>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let mut stmt = conn
      .prepare(&format!(
        "SELECT id, title, author, year, genre, read FROM {} ORDER BY id",
        self.table
      ))
      .map_err(|e| eyre!("Failed to prepare query: {}", e))?;

    let books = stmt
      .query_map([], |row| {
        let id: i64 = row.get(0)?;
        let year: i64 = row.get(3)?;
        Ok(Book {
          id: id.to_string(),
          title: row.get(1)?,
          author: row.get(2)?,
          year: u32::try_from(year).unwrap_or(0),
          genre: row.get(4)?,
          read: row.get(5)?,
        })
      })
      .map_err(|e| eyre!("Failed to query books: {}", e))?
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read book row: {}", e))?;

    Ok(books)
  }

  fn insert_row(&self, book: &NewBook) -> Result<Book> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        &format!(
          "INSERT INTO {} (title, author, year, genre, read) VALUES (?, ?, ?, ?, ?)",
          self.table
        ),
        params![book.title, book.author, book.year, book.genre, book.read],
      )
      .map_err(|e| eyre!("Failed to insert book: {}", e))?;

    let id = conn.last_insert_rowid();
    Ok(book.clone().into_book(id.to_string()))
  }

  fn delete_rows_by_title(&self, title: &str) -> Result<usize> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        &format!("DELETE FROM {} WHERE title = ?", self.table),
        params![title],
      )
      .map_err(|e| eyre!("Failed to delete books titled '{}': {}", title, e))
  }

}

impl BookStore for SqliteStore {
  fn list_all(&self) -> BoxFuture<'_, Result<Vec<Book>>> {
    Box::pin(async move { self.list_rows() })
  }

  fn append<'a>(&'a self, book: &'a NewBook) -> BoxFuture<'a, Result<Book>> {
    Box::pin(async move { self.insert_row(book) })
  }

  fn delete_by_title<'a>(&'a self, title: &'a str) -> BoxFuture<'a, Result<usize>> {
    Box::pin(async move { self.delete_rows_by_title(title) })
  }

  fn describe(&self) -> String {
    self.location.clone()
  }
}

/// Collection names become table names, so only plain identifiers are allowed.
fn table_name(collection: &str) -> Result<String> {
  let mut chars = collection.chars();
  let valid = match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {
      chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
    _ => false,
  };

  if valid {
    Ok(collection.to_string())
  } else {
    Err(eyre!(
      "Collection name '{}' is not usable as a SQLite table name",
      collection
    ))
  }
}
