//! # backmark
//!
//! Convert HTML DOM trees to Markdown.
//!
//! The converter walks a parser-agnostic [`Node`] tree and writes plain
//! Markdown, Markdown Extra, MultiMarkdown, or GitHub-flavored output,
//! selected through [`Options`] presets. HTML parsing and sanitization are
//! left to the caller; any parser can be adapted to the [`Node`]
//! structure (the default `html` feature bundles a `scraper`-based
//! adapter for convenience).
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use backmark::{convert, Element, Node, Options};
//!
//! let mut h1 = Element::new("h1");
//! h1.add_child(Node::text("Hello World"));
//!
//! let markdown = convert(&Node::Element(h1), &Options::markdown()).unwrap();
//! assert_eq!(markdown, "# Hello World");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use backmark::{convert, parse_html, Options};
//!
//! let node = parse_html("<p>Some <em>styled</em> text</p>");
//! let markdown = convert(&node, &Options::markdown_extra()).unwrap();
//! assert_eq!(markdown, "Some *styled* text");
//! ```
//!
//! ## Streaming
//!
//! [`convert_to`] writes into any [`std::io::Write`] sink instead of
//! returning a string; backing-stream failures surface as
//! [`Error::Output`].

mod cleaner;
mod converter;
mod handlers;
pub mod node;
mod options;

#[cfg(feature = "html")]
pub mod html;

pub use backmark_core::{align, Alignment, BlockWriter, MarkdownTable, TableCell};
pub use cleaner::TextCleaner;
pub use converter::{convert, convert_to, DocumentConverter};
#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{Element, Node, Siblings};
pub use options::{CodeBlockStyle, InWordEmphasis, Options, TableStyle};

/// Error type for conversion operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The output sink failed to accept a write. Conversions do not retry
    /// or suppress these; the document is abandoned mid-stream.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
