pub mod footer;
pub mod header;
pub mod utils;

pub use footer::{draw_footer, StatusKind, StatusMessage};
pub use header::{draw_header, LibraryState};
pub use utils::{centered_overlay, input_line, read_color, top_left_overlay, truncate};
