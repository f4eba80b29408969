//! Tag-to-handler dispatch.
//!
//! Each conversion builds a [`Dispatch`] from its options: two
//! insertion-ordered tables mapping tag names to handler values (one for
//! block context, one for inline context) plus the set of ignored tags.
//! Handlers are plain enum values so the converter can look one up and
//! then hand itself over mutably; options decide the conditional entries
//! (definition lists, abbreviations).

mod blocks;
mod inline;
mod table;

use std::collections::HashSet;
use std::io::Write;

use backmark_core::BlockWriter;
use indexmap::IndexMap;

use crate::converter::DocumentConverter;
use crate::node::{Element, Siblings};
use crate::options::Options;
use crate::Result;

/// Handlers for elements that form blocks of their own.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BlockHandler {
    Paragraph,
    Container,
    Heading,
    BlockQuote,
    List,
    DefinitionList,
    CodeBlock,
    HorizontalRule,
    Table,
}

impl BlockHandler {
    pub(crate) fn handle<W: Write>(
        self,
        conv: &mut DocumentConverter<'_>,
        el: &Element,
        out: &mut BlockWriter<W>,
    ) -> Result<()> {
        match self {
            BlockHandler::Paragraph => blocks::paragraph(conv, el, out),
            BlockHandler::Container => blocks::container(conv, el, out),
            BlockHandler::Heading => blocks::heading(conv, el, out),
            BlockHandler::BlockQuote => blocks::blockquote(conv, el, out),
            BlockHandler::List => blocks::list(conv, el, out),
            BlockHandler::DefinitionList => blocks::definition_list(conv, el, out),
            BlockHandler::CodeBlock => blocks::code_block(conv, el, out),
            BlockHandler::HorizontalRule => blocks::horizontal_rule(conv, el, out),
            BlockHandler::Table => table::table(conv, el, out),
        }
    }
}

/// Handlers for elements rendered within the flow of a block.
#[derive(Debug, Clone, Copy)]
pub(crate) enum InlineHandler {
    Style,
    Anchor,
    Image,
    Code,
    Break,
    Abbreviation,
}

impl InlineHandler {
    pub(crate) fn handle<W: Write>(
        self,
        conv: &mut DocumentConverter<'_>,
        el: &Element,
        siblings: Siblings<'_>,
        out: &mut BlockWriter<W>,
    ) -> Result<()> {
        match self {
            InlineHandler::Style => inline::style(conv, el, siblings, out),
            InlineHandler::Anchor => inline::anchor(conv, el, out),
            InlineHandler::Image => inline::image(conv, el, out),
            InlineHandler::Code => inline::code(conv, el, out),
            InlineHandler::Break => inline::line_break(conv, out),
            InlineHandler::Abbreviation => inline::abbreviation(conv, el, out),
        }
    }
}

/// The registered handler tables for one conversion.
pub(crate) struct Dispatch {
    block: IndexMap<&'static str, BlockHandler>,
    inline: IndexMap<&'static str, InlineHandler>,
    ignored: HashSet<String>,
}

impl Dispatch {
    pub(crate) fn new(options: &Options) -> Self {
        let mut block = IndexMap::new();
        block.insert("p", BlockHandler::Paragraph);
        block.insert("div", BlockHandler::Container);
        for tag in ["h1", "h2", "h3", "h4", "h5", "h6"] {
            block.insert(tag, BlockHandler::Heading);
        }
        block.insert("blockquote", BlockHandler::BlockQuote);
        block.insert("ul", BlockHandler::List);
        block.insert("ol", BlockHandler::List);
        block.insert("pre", BlockHandler::CodeBlock);
        block.insert("hr", BlockHandler::HorizontalRule);
        block.insert("table", BlockHandler::Table);
        if options.definition_lists {
            block.insert("dl", BlockHandler::DefinitionList);
        }

        let mut inline = IndexMap::new();
        for tag in ["em", "i", "strong", "b", "span", "font"] {
            inline.insert(tag, InlineHandler::Style);
        }
        inline.insert("a", InlineHandler::Anchor);
        inline.insert("img", InlineHandler::Image);
        inline.insert("code", InlineHandler::Code);
        inline.insert("tt", InlineHandler::Code);
        inline.insert("br", InlineHandler::Break);
        if options.abbreviations {
            inline.insert("abbr", InlineHandler::Abbreviation);
            inline.insert("acronym", InlineHandler::Abbreviation);
        }

        let mut ignored: HashSet<String> = [
            "head", "script", "style", "title", "meta", "link", "noscript",
        ]
        .iter()
        .map(|tag| tag.to_string())
        .collect();
        ignored.extend(options.ignored_elements.iter().map(|tag| tag.to_lowercase()));

        Self {
            block,
            inline,
            ignored,
        }
    }

    pub(crate) fn block_handler(&self, tag: &str) -> Option<BlockHandler> {
        self.block.get(tag).copied()
    }

    pub(crate) fn inline_handler(&self, tag: &str) -> Option<InlineHandler> {
        self.inline.get(tag).copied()
    }

    pub(crate) fn is_ignored(&self, tag: &str) -> bool {
        self.ignored.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditional_registration() {
        let plain = Dispatch::new(&Options::markdown());
        assert!(plain.block_handler("dl").is_none());
        assert!(plain.inline_handler("abbr").is_none());

        let extra = Dispatch::new(&Options::markdown_extra());
        assert!(extra.block_handler("dl").is_some());
        assert!(extra.inline_handler("abbr").is_some());
    }

    #[test]
    fn test_ignored_tags_are_lowercased() {
        let mut options = Options::markdown();
        options.ignored_elements.push("ASIDE".to_string());
        let dispatch = Dispatch::new(&options);
        assert!(dispatch.is_ignored("aside"));
        assert!(dispatch.is_ignored("script"));
        assert!(!dispatch.is_ignored("p"));
    }
}
