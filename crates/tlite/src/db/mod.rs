//! Query execution pipeline: path resolution, the external sqlite
//! process, and CSV result parsing.

mod exec;
mod parse;
mod path;

pub use exec::{Executor, Outcome};
pub use parse::{parse, ParseError, QueryResult};
pub use path::{resolve, PathError};
