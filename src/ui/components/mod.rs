mod book_form;
mod command_input;
mod confirm_prompt;
mod input;
mod key_result;

pub use book_form::{BookForm, FormEvent};
pub use command_input::{CommandEvent, CommandInput};
pub use confirm_prompt::{ConfirmEvent, ConfirmPrompt};
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
