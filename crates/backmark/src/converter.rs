//! The document converter: walks a DOM tree and writes Markdown.
//!
//! A [`DocumentConverter`] owns all conversion-wide state: the resolved
//! options, the text cleaner derived from them, the tag dispatch tables,
//! the inline style depth counters, and the reference-link/abbreviation
//! registries that are flushed once the walk completes. One converter
//! performs one conversion; independent conversions share nothing mutable
//! and may run in parallel.

use std::io::Write;

use backmark_core::BlockWriter;
use indexmap::IndexMap;

use crate::cleaner::TextCleaner;
use crate::handlers::Dispatch;
use crate::node::{Element, Node, Siblings};
use crate::options::Options;
use crate::Result;

/// Convert a DOM tree to a Markdown string.
///
/// # Example
///
/// ```rust
/// use backmark::{convert, Node, Options};
///
/// let mut h1 = backmark::Element::new("h1");
/// h1.add_child(Node::text("Hello World"));
///
/// let markdown = convert(&Node::Element(h1), &Options::markdown()).unwrap();
/// assert_eq!(markdown, "# Hello World");
/// ```
pub fn convert(root: &Node, options: &Options) -> Result<String> {
    let mut buf = Vec::new();
    convert_to(root, options, &mut buf)?;
    Ok(String::from_utf8(buf).unwrap_or_default())
}

/// Convert a DOM tree, streaming the Markdown into `sink`.
///
/// The sink is flushed on completion. Write failures of the backing
/// stream abort the conversion and are returned as [`crate::Error::Output`].
pub fn convert_to<W: Write>(root: &Node, options: &Options, sink: W) -> Result<()> {
    DocumentConverter::new(options).run(root, sink)
}

/// Inline style depth counters, shared across the whole conversion.
#[derive(Debug, Default)]
pub(crate) struct StyleState {
    pub italic_depth: u32,
    pub bold_depth: u32,
}

/// Walks a DOM tree and dispatches each element to its handler.
pub struct DocumentConverter<'o> {
    pub(crate) options: &'o Options,
    pub(crate) cleaner: TextCleaner,
    dispatch: Dispatch,
    pub(crate) style: StyleState,
    /// Reference link definitions, keyed by URL, in first-seen order.
    pub(crate) link_ids: IndexMap<String, String>,
    /// Abbreviation definitions, keyed by the rendered abbreviation.
    pub(crate) abbreviations: IndexMap<String, String>,
    pub(crate) list_depth: usize,
}

impl<'o> DocumentConverter<'o> {
    /// Create a converter for a single conversion with `options`.
    pub fn new(options: &'o Options) -> Self {
        Self {
            options,
            cleaner: TextCleaner::new(options),
            dispatch: Dispatch::new(options),
            style: StyleState::default(),
            link_ids: IndexMap::new(),
            abbreviations: IndexMap::new(),
            list_depth: 0,
        }
    }

    /// Run the conversion, consuming the converter.
    pub fn run<W: Write>(mut self, root: &Node, sink: W) -> Result<()> {
        let mut out = BlockWriter::new(sink);
        self.walk_root(root, &mut out)?;
        self.flush_registries(&mut out)?;
        debug_assert_eq!(self.style.italic_depth, 0);
        debug_assert_eq!(self.style.bold_depth, 0);
        out.flush()?;
        Ok(())
    }

    fn walk_root<W: Write>(&mut self, root: &Node, out: &mut BlockWriter<W>) -> Result<()> {
        match root {
            Node::Element(el) => self.dispatch_block(el, Siblings::default(), out),
            Node::Text(text) => {
                let cleaned = self.cleaner.clean(text);
                if !cleaned.trim().is_empty() {
                    out.write(cleaned.trim())?;
                }
                Ok(())
            }
            Node::Comment(_) => Ok(()),
        }
    }

    /// Walk children in block context. Non-blank text and inline elements
    /// write straight through; the sink promotes them to their own block
    /// when no block is open.
    pub(crate) fn walk_block_children<W: Write>(
        &mut self,
        el: &Element,
        out: &mut BlockWriter<W>,
    ) -> Result<()> {
        let children = el.children();
        for (index, child) in children.iter().enumerate() {
            match child {
                Node::Text(text) => {
                    let cleaned = self.cleaner.clean(text);
                    if cleaned.trim().is_empty() {
                        continue;
                    }
                    if out.block_depth() == 0 {
                        out.write(cleaned.trim_start())?;
                    } else {
                        out.write(&cleaned)?;
                    }
                }
                Node::Comment(_) => {}
                Node::Element(child_el) => {
                    self.dispatch_block(child_el, Siblings::around(children, index), out)?;
                }
            }
        }
        Ok(())
    }

    /// Walk children in inline context, preserving whitespace-only text
    /// runs between siblings.
    pub(crate) fn walk_inline_children<W: Write>(
        &mut self,
        el: &Element,
        out: &mut BlockWriter<W>,
    ) -> Result<()> {
        let children = el.children();
        for (index, child) in children.iter().enumerate() {
            match child {
                Node::Text(text) => out.write(&self.cleaner.clean(text))?,
                Node::Comment(_) => {}
                Node::Element(child_el) => {
                    self.dispatch_inline(child_el, Siblings::around(children, index), out)?;
                }
            }
        }
        Ok(())
    }

    fn dispatch_block<W: Write>(
        &mut self,
        el: &Element,
        siblings: Siblings<'_>,
        out: &mut BlockWriter<W>,
    ) -> Result<()> {
        let tag = el.tag();
        if self.dispatch.is_ignored(tag) {
            return Ok(());
        }
        if let Some(handler) = self.dispatch.block_handler(tag) {
            handler.handle(self, el, out)
        } else if let Some(handler) = self.dispatch.inline_handler(tag) {
            handler.handle(self, el, siblings, out)
        } else {
            // Unknown container: walk through, the children decide their
            // own blocks.
            self.walk_block_children(el, out)
        }
    }

    fn dispatch_inline<W: Write>(
        &mut self,
        el: &Element,
        siblings: Siblings<'_>,
        out: &mut BlockWriter<W>,
    ) -> Result<()> {
        let tag = el.tag();
        if self.dispatch.is_ignored(tag) {
            return Ok(());
        }
        if let Some(handler) = self.dispatch.inline_handler(tag) {
            handler.handle(self, el, siblings, out)
        } else {
            if self.dispatch.block_handler(tag).is_some() {
                log::debug!("block element <{}> in inline context, degrading to inline", tag);
            }
            self.walk_inline_children(el, out)
        }
    }

    /// Render the inline content of an element into a string.
    pub(crate) fn inline_content(&mut self, el: &Element) -> Result<String> {
        let mut out = BlockWriter::buffered();
        self.walk_inline_children(el, &mut out)?;
        Ok(out.into_string().trim().to_string())
    }

    /// Render the block content of an element into a string, with blank
    /// lines between its child blocks.
    pub(crate) fn block_content(&mut self, el: &Element) -> Result<String> {
        let mut out = BlockWriter::buffered();
        self.walk_block_children(el, &mut out)?;
        Ok(out.into_string().trim().to_string())
    }

    /// The reference id for `url`, allocating one on first use.
    pub(crate) fn link_id_for(&mut self, url: &str, label: &str) -> String {
        if let Some(id) = self.link_ids.get(url) {
            return id.clone();
        }
        let mut id = if self.options.simple_link_ids {
            simplify_label(label)
        } else {
            String::new()
        };
        if id.is_empty() {
            id = (self.link_ids.len() + 1).to_string();
        }
        if self.link_ids.values().any(|existing| *existing == id) {
            let base = id;
            let mut n = 2;
            id = loop {
                let candidate = format!("{}-{}", base, n);
                if !self.link_ids.values().any(|existing| *existing == candidate) {
                    break candidate;
                }
                n += 1;
            };
        }
        self.link_ids.insert(url.to_string(), id.clone());
        id
    }

    /// Flush the reference-link and abbreviation registries collected
    /// during the walk as trailing blocks.
    fn flush_registries<W: Write>(&mut self, out: &mut BlockWriter<W>) -> Result<()> {
        if !self.options.inline_links && !self.link_ids.is_empty() {
            let lines: Vec<String> = self
                .link_ids
                .iter()
                .map(|(url, id)| format!("[{}]: {}", id, url))
                .collect();
            out.write_block(&lines.join("\n"))?;
        }
        if self.options.abbreviations && !self.abbreviations.is_empty() {
            let lines: Vec<String> = self
                .abbreviations
                .iter()
                .map(|(abbr, title)| format!("*[{}]: {}", abbr, title))
                .collect();
            out.write_block(&lines.join("\n"))?;
        }
        Ok(())
    }
}

fn simplify_label(label: &str) -> String {
    let filtered: String = label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}
