//! Typed partition/folder/resource object sets and the JSON plumbing around
//! them, used by higher-level configuration compilers.

pub mod format;
pub mod path;
pub mod reader;
pub mod tree;
pub mod writer;

pub use format::{format_json, format_summary, format_text};
pub use path::{PathError, ResourcePath};
pub use reader::{parse, parse_file, value_kind, ReadError};
pub use tree::{Body, Folder, Located, ObjectSet, Partition};
pub use writer::{write, write_file, WriteError};
