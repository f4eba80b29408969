//! backmark-core - block-aware Markdown output primitives
//!
//! This crate provides the output-side building blocks used by `backmark`:
//! a [`BlockWriter`] that separates sibling Markdown blocks with blank
//! lines, an in-memory [`MarkdownTable`] with pipe-table and plain-text
//! renderers, and string alignment helpers.
//!
//! # Example
//!
//! ```rust
//! use backmark_core::{BlockWriter, MarkdownTable, TableCell};
//!
//! let mut out = BlockWriter::buffered();
//! out.write_block("# Title").unwrap();
//!
//! let mut table = MarkdownTable::new();
//! table.push_header_row(vec![TableCell::new("Name"), TableCell::new("Value")]);
//! table.push_body_row(vec![TableCell::new("answer"), TableCell::new("42")]);
//!
//! out.start_block().unwrap();
//! table.render(&mut out, false).unwrap();
//! out.end_block();
//!
//! let markdown = out.into_string();
//! assert!(markdown.starts_with("# Title\n\n| Name"));
//! ```

mod sink;
mod table;
mod util;

pub use sink::BlockWriter;
pub use table::{MarkdownTable, TableCell};
pub use util::{align, prepend_each_line, Alignment};
