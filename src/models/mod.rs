pub mod catalogue;
pub mod language;
pub mod problem;

pub use catalogue::{Container, Entry, ViewStatus};
pub use language::Language;
pub use problem::{Problem, ProblemId};
