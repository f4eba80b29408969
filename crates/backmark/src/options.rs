//! Configuration options for a conversion.
//!
//! An [`Options`] value is a resolved, immutable snapshot: it is built once
//! (usually from one of the dialect presets) and only read for the lifetime
//! of a conversion.

/// How tables are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    /// Markdown Extra / GitHub-style pipe tables.
    #[default]
    Extra,
    /// MultiMarkdown pipe tables (enables the `||` colspan notation).
    MultiMarkdown,
    /// The target dialect has no table syntax.
    None,
}

impl TableStyle {
    /// True when tables are rendered as Markdown text rather than dropped
    /// or turned into code.
    pub fn converted_to_text(self) -> bool {
        !matches!(self, TableStyle::None)
    }
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use indented code blocks (4 spaces)
    #[default]
    Indented,
    /// Use fenced code blocks (``` or ~~~)
    Fenced,
}

/// What to do with emphasis that sits directly against word characters.
///
/// Most Markdown parsers only recognize emphasis markers surrounded by
/// whitespace, so `in<em>word</em>` emphasis needs special treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InWordEmphasis {
    /// Keep the markers as-is and accept that some parsers miss them.
    #[default]
    Normal,
    /// Drop the emphasis markers, keeping only the text.
    RemoveEmphasis,
    /// Keep the markers and insert a separating space on the joined side.
    AddSpacing,
}

impl InWordEmphasis {
    /// Whether emphasis markers are emitted at all.
    pub fn emphasis_preserved(self) -> bool {
        !matches!(self, InWordEmphasis::RemoveEmphasis)
    }

    /// Whether a single space is inserted around the emphasized content.
    pub fn spacing_added(self) -> bool {
        matches!(self, InWordEmphasis::AddSpacing)
    }
}

/// Options for HTML to Markdown conversion.
#[derive(Debug, Clone)]
pub struct Options {
    /// Table dialect.
    pub table_style: TableStyle,

    /// Render tables as a code block of space-aligned columns instead of
    /// pipe tables.
    pub table_rendered_as_code: bool,

    /// Expand `colspan` attributes into empty continuation cells.
    pub table_colspan_enabled: bool,

    /// Replace smart-quote HTML entities with plain quotes.
    pub reverse_html_smart_quotes: bool,

    /// Replace literal Unicode smart quotes with plain quotes.
    pub reverse_unicode_smart_quotes: bool,

    /// Replace dash/ellipsis HTML entities with their ASCII spellings.
    pub reverse_html_smart_punctuation: bool,

    /// Replace literal Unicode dashes/ellipses with their ASCII spellings.
    pub reverse_unicode_smart_punctuation: bool,

    /// Convert `<dl>` lists to Markdown Extra definition lists.
    pub definition_lists: bool,

    /// Collect `<abbr title>` elements into a Markdown Extra abbreviation
    /// block at the end of the document.
    pub abbreviations: bool,

    /// Render links whose text equals their URL as `<url>`.
    pub auto_links: bool,

    /// Use `[text](url)` links; when false, reference-style `[text][id]`
    /// links are used and the definitions are flushed after the document.
    pub inline_links: bool,

    /// Derive reference link ids from the link text instead of a counter.
    pub simple_link_ids: bool,

    /// Code block style (indented or fenced)
    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emit plain newlines for `<br>` instead of the two-space line break.
    pub hardwraps: bool,

    /// In-word emphasis policy.
    pub in_word_emphasis: InWordEmphasis,

    /// Additional tags to drop wholesale, merged with the built-in ignore
    /// set (head, script, style, title, meta, link, noscript).
    pub ignored_elements: Vec<String>,
}

impl Options {
    /// Plain Markdown: no tables (rendered as code), no extensions.
    pub fn markdown() -> Self {
        Self {
            table_style: TableStyle::None,
            table_rendered_as_code: true,
            table_colspan_enabled: false,
            reverse_html_smart_quotes: true,
            reverse_unicode_smart_quotes: true,
            reverse_html_smart_punctuation: true,
            reverse_unicode_smart_punctuation: true,
            definition_lists: false,
            abbreviations: false,
            auto_links: false,
            inline_links: true,
            simple_link_ids: false,
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            hardwraps: false,
            in_word_emphasis: InWordEmphasis::Normal,
            ignored_elements: Vec::new(),
        }
    }

    /// Markdown Extra: pipe tables, definition lists, abbreviations,
    /// tilde-fenced code blocks.
    pub fn markdown_extra() -> Self {
        Self {
            table_style: TableStyle::Extra,
            table_rendered_as_code: false,
            definition_lists: true,
            abbreviations: true,
            code_block_style: CodeBlockStyle::Fenced,
            fence: "~~~".to_string(),
            ..Self::markdown()
        }
    }

    /// MultiMarkdown: pipe tables with colspan support, definition lists,
    /// abbreviations.
    pub fn multi_markdown() -> Self {
        Self {
            table_style: TableStyle::MultiMarkdown,
            table_rendered_as_code: false,
            table_colspan_enabled: true,
            definition_lists: true,
            abbreviations: true,
            ..Self::markdown()
        }
    }

    /// GitHub-flavored Markdown: pipe tables, backtick fences, hard wraps,
    /// autolinks.
    pub fn github() -> Self {
        Self {
            table_style: TableStyle::Extra,
            table_rendered_as_code: false,
            auto_links: true,
            code_block_style: CodeBlockStyle::Fenced,
            fence: "```".to_string(),
            hardwraps: true,
            ..Self::markdown()
        }
    }

    /// True when pipe tables end up as plain Markdown text, which forces
    /// `|` into the escaped character set.
    pub(crate) fn tables_as_text(&self) -> bool {
        self.table_style.converted_to_text() && !self.table_rendered_as_code
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::markdown()
    }
}
