//! Non-interactive subcommands. Each one opens a session, runs one operation
//! and prints the result to stdout.

use crate::library::{Book, BookDraft, LibraryStats, SearchField, Session};
use crate::store::BookStore;
use clap::Subcommand;
use color_eyre::Result;
use std::sync::Arc;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
  /// Open the terminal UI (default)
  Tui,

  /// Print every book
  List,

  /// Add a book
  Add {
    #[arg(short, long)]
    title: String,

    #[arg(short, long)]
    author: String,

    /// Publication year
    #[arg(short, long, default_value_t = 0)]
    year: u32,

    #[arg(short, long, default_value = "")]
    genre: String,

    /// Mark the book as read
    #[arg(short, long)]
    read: bool,
  },

  /// Remove every book with exactly this title
  Remove { title: String },

  /// Find books whose author or title contains the query, ignoring case
  Search {
    query: String,

    /// Field to search: author or title
    #[arg(long, default_value = "author")]
    by: SearchField,
  },

  /// Print reading statistics
  Stats,
}

/// One book as a list line
pub fn format_book(book: &Book) -> String {
  format!(
    "- {} by {} ({}) - Genre: {} - Status: {}",
    book.title,
    book.author,
    book.year,
    book.genre,
    book.status_label()
  )
}

pub fn format_stats(stats: &LibraryStats) -> String {
  format!(
    "Total books: {}\nBooks read: {}\nRead percentage: {}",
    stats.total,
    stats.read,
    stats.percentage_label()
  )
}

fn print_books<'a>(books: impl IntoIterator<Item = &'a Book>, empty: &str) {
  let mut any = false;
  for book in books {
    println!("{}", format_book(book));
    any = true;
  }
  if !any {
    println!("{}", empty);
  }
}

/// Run a non-interactive command against the store
pub async fn run(command: Command, store: Arc<dyn BookStore>) -> Result<()> {
  let mut session = Session::open(store).await?;

  match command {
    // Handled by main
    Command::Tui => {}
    Command::List => print_books(session.library().books(), "Your library is empty."),
    Command::Add {
      title,
      author,
      year,
      genre,
      read,
    } => {
      let draft = BookDraft {
        title,
        author,
        year,
        genre,
        read,
      };
      let book = session.add(&draft).await?;
      println!("Added \"{}\" to your library.", book.title);
    }
    Command::Remove { title } => match session.remove(&title).await? {
      0 => println!("No book titled \"{}\" found.", title),
      1 => println!("Removed 1 book titled \"{}\".", title),
      n => println!("Removed {} books titled \"{}\".", n, title),
    },
    Command::Search { query, by } => {
      print_books(session.library().search(by, &query), "No book found.");
    }
    Command::Stats => println!("{}", format_stats(&session.library().stats())),
  }

  Ok(())
}
