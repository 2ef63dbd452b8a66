mod add_book;
mod book_list;
mod remove_book;
mod search;
mod stats;

pub use add_book::AddBookView;
pub use book_list::BookListView;
pub use remove_book::RemoveBookView;
pub use search::SearchView;
pub use stats::StatsView;
