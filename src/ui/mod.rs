pub mod keys;
pub mod list_view;
pub mod terminal;

pub use keys::{Key, KeySource};
pub use list_view::{Canvas, ListView, Style};
pub use terminal::Terminal;
