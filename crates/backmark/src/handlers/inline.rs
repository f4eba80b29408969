//! Handlers for inline elements: emphasis, links, images, code spans.

use std::io::Write;

use backmark_core::BlockWriter;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::converter::DocumentConverter;
use crate::node::{Element, Node, Siblings};
use crate::Result;

const ITALIC_WRAPPER: &str = "*";
const BOLD_WRAPPER: &str = "**";

static ITALIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)font-style:\s*italic").expect("valid italic pattern"));
static BOLD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)font-weight:\s*bold").expect("valid bold pattern"));

/// What the in-word emphasis policy decided for one element.
struct InWord {
    emphasis_preserved: bool,
    add_spacing: bool,
}

/// Which style dimensions this element contributes.
struct StyleFlags {
    italic: bool,
    bold: bool,
}

/// Render inline styling (`em`, `i`, `strong`, `b`, and `style`-attribute
/// driven spans).
///
/// The converter-wide depth counters prevent re-emitting markers for
/// nested identical styling: `<em>hello <em>world</em></em>` must render
/// as `*hello world*`, not `*hello *world**`.
pub(super) fn style<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    siblings: Siblings<'_>,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let in_word = check_in_word(conv, siblings);
    if in_word.emphasis_preserved {
        let flags = check_tag(conv, el);
        if flags.italic || flags.bold {
            if in_word.add_spacing {
                out.write(" ")?;
            }
            start(conv, &flags, out)?;
            conv.walk_inline_children(el, out)?;
            end(conv, &flags, out)?;
            if in_word.add_spacing {
                out.write(" ")?;
            }
        } else {
            conv.walk_inline_children(el, out)?;
        }
    } else {
        // Emphasis is disabled for this subtree. Mark both dimensions as
        // already open so nested styled elements stay suppressed too.
        conv.style.italic_depth += 1;
        conv.style.bold_depth += 1;
        conv.walk_inline_children(el, out)?;
        conv.style.italic_depth -= 1;
        conv.style.bold_depth -= 1;
    }
    Ok(())
}

/// Check whether this element touches a word character in an adjacent
/// text sibling, and what the configured policy wants done about it.
fn check_in_word(conv: &DocumentConverter<'_>, siblings: Siblings<'_>) -> InWord {
    let policy = conv.options.in_word_emphasis;
    let mut result = InWord {
        emphasis_preserved: true,
        add_spacing: false,
    };
    if policy.emphasis_preserved() && !policy.spacing_added() {
        return result;
    }
    let joins_prev = matches!(
        siblings.prev,
        Some(Node::Text(text)) if text.chars().last().is_some_and(is_word_char)
    );
    let joins_next = matches!(
        siblings.next,
        Some(Node::Text(text)) if text.chars().next().is_some_and(is_word_char)
    );
    if joins_prev || joins_next {
        result.emphasis_preserved = policy.emphasis_preserved();
        result.add_spacing = policy.spacing_added();
    }
    result
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A style dimension only counts when its depth is zero; nested identical
/// styling contributes no additional markers.
fn check_tag(conv: &DocumentConverter<'_>, el: &Element) -> StyleFlags {
    let mut flags = StyleFlags {
        italic: false,
        bold: false,
    };
    match el.tag() {
        "i" | "em" => flags.italic = conv.style.italic_depth == 0,
        "b" | "strong" => flags.bold = conv.style.bold_depth == 0,
        _ => {
            if let Some(style) = el.attr("style") {
                if ITALIC_PATTERN.is_match(style) {
                    flags.italic = conv.style.italic_depth == 0;
                }
                if BOLD_PATTERN.is_match(style) {
                    flags.bold = conv.style.bold_depth == 0;
                }
            }
        }
    }
    flags
}

fn start<W: Write>(
    conv: &mut DocumentConverter<'_>,
    flags: &StyleFlags,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    if flags.italic {
        if conv.style.italic_depth == 0 {
            out.write(ITALIC_WRAPPER)?;
        }
        conv.style.italic_depth += 1;
    }
    if flags.bold {
        if conv.style.bold_depth == 0 {
            out.write(BOLD_WRAPPER)?;
        }
        conv.style.bold_depth += 1;
    }
    Ok(())
}

/// Bold closes before italic so markers nest strictly.
fn end<W: Write>(
    conv: &mut DocumentConverter<'_>,
    flags: &StyleFlags,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    if flags.bold {
        conv.style.bold_depth -= 1;
        if conv.style.bold_depth == 0 {
            out.write(BOLD_WRAPPER)?;
        }
    }
    if flags.italic {
        conv.style.italic_depth -= 1;
        if conv.style.italic_depth == 0 {
            out.write(ITALIC_WRAPPER)?;
        }
    }
    Ok(())
}

pub(super) fn anchor<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let content = conv.inline_content(el)?;
    let href = el.attr("href").map(str::trim).unwrap_or("");
    if href.is_empty() {
        log::debug!("<a> without usable href, writing link text only");
        out.write(&content)?;
        return Ok(());
    }
    if conv.options.auto_links && el.text_content().trim() == href {
        out.write(&format!("<{}>", href))?;
        return Ok(());
    }
    let label = if content.is_empty() {
        conv.cleaner.clean(href)
    } else {
        content
    };
    if conv.options.inline_links {
        match el.attr("title").map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => out.write(&format!("[{}]({} \"{}\")", label, href, title))?,
            None => out.write(&format!("[{}]({})", label, href))?,
        }
    } else {
        let id = conv.link_id_for(href, &label);
        out.write(&format!("[{}][{}]", label, id))?;
    }
    Ok(())
}

pub(super) fn image<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let src = el.attr("src").map(str::trim).unwrap_or("");
    let alt = conv.cleaner.clean(el.attr("alt").unwrap_or("").trim());
    if src.is_empty() {
        log::debug!("<img> without src, writing alt text only");
        if !alt.is_empty() {
            out.write(&alt)?;
        }
        return Ok(());
    }
    match el.attr("title").map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => out.write(&format!("![{}]({} \"{}\")", alt, src, title))?,
        None => out.write(&format!("![{}]({})", alt, src))?,
    }
    Ok(())
}

pub(super) fn code<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let text = el.text_content();
    if text.is_empty() {
        return Ok(());
    }
    out.write(&conv.cleaner.clean_inline_code(&text))?;
    Ok(())
}

pub(super) fn line_break<W: Write>(
    conv: &mut DocumentConverter<'_>,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    out.write(if conv.options.hardwraps { "\n" } else { "  \n" })?;
    Ok(())
}

/// Register the abbreviation for the trailing definition block and write
/// the plain text in place.
pub(super) fn abbreviation<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let cleaned = conv.cleaner.clean(el.text_content().trim());
    if let Some(title) = el.attr("title").map(str::trim).filter(|t| !t.is_empty()) {
        if !cleaned.is_empty() && !conv.abbreviations.contains_key(&cleaned) {
            let title = title.to_string();
            conv.abbreviations.insert(cleaned.clone(), title);
        }
    }
    out.write(&cleaned)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::converter::convert;
    use crate::node::{Element, Node};
    use crate::options::{InWordEmphasis, Options};

    fn el(tag: &str, children: Vec<Node>) -> Node {
        let mut element = Element::new(tag);
        for child in children {
            element.add_child(child);
        }
        Node::Element(element)
    }

    fn el_attrs(tag: &str, attrs: &[(&str, &str)], children: Vec<Node>) -> Node {
        let mut element = Element::with_attrs(tag, attrs);
        for child in children {
            element.add_child(child);
        }
        Node::Element(element)
    }

    fn text(s: &str) -> Node {
        Node::text(s)
    }

    fn md(root: &Node) -> String {
        convert(root, &Options::markdown()).unwrap()
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(md(&el("em", vec![text("x")])), "*x*");
        assert_eq!(md(&el("i", vec![text("x")])), "*x*");
        assert_eq!(md(&el("strong", vec![text("x")])), "**x**");
        assert_eq!(md(&el("b", vec![text("x")])), "**x**");
    }

    #[test]
    fn test_nested_identical_emphasis_collapses() {
        let root = el(
            "em",
            vec![text("a"), el("em", vec![text("b")]), text("c")],
        );
        assert_eq!(md(&root), "*abc*");
    }

    #[test]
    fn test_deeply_nested_emphasis_collapses() {
        let root = el(
            "em",
            vec![
                text("hello "),
                el("em", vec![el("i", vec![text("world")])]),
            ],
        );
        assert_eq!(md(&root), "*hello world*");
    }

    #[test]
    fn test_bold_closes_before_italic() {
        let root = el("em", vec![el("strong", vec![text("x")])]);
        assert_eq!(md(&root), "***x***");
    }

    #[test]
    fn test_bold_inside_italic_text() {
        let root = el(
            "em",
            vec![text("a "), el("b", vec![text("bold")]), text(" z")],
        );
        assert_eq!(md(&root), "*a **bold** z*");
    }

    #[test]
    fn test_style_attribute_italic() {
        let root = el_attrs(
            "span",
            &[("style", "font-style: italic")],
            vec![text("x")],
        );
        assert_eq!(md(&root), "*x*");
    }

    #[test]
    fn test_style_attribute_bold_and_italic() {
        let root = el_attrs(
            "span",
            &[("style", "font-weight:BOLD; font-style:italic")],
            vec![text("x")],
        );
        assert_eq!(md(&root), "***x***");
    }

    #[test]
    fn test_plain_span_passes_through() {
        let root = el("p", vec![text("a "), el("span", vec![text("b")]), text(" c")]);
        assert_eq!(md(&root), "a b c");
    }

    #[test]
    fn test_nested_style_span_collapses_with_em() {
        let root = el(
            "em",
            vec![el_attrs(
                "span",
                &[("style", "font-style:italic")],
                vec![text("x")],
            )],
        );
        assert_eq!(md(&root), "*x*");
    }

    fn in_word_tree() -> Node {
        // gre<em>at</em>ness
        el(
            "p",
            vec![text("gre"), el("em", vec![text("at")]), text("ness")],
        )
    }

    #[test]
    fn test_in_word_emphasis_normal_keeps_markers() {
        assert_eq!(md(&in_word_tree()), "gre*at*ness");
    }

    #[test]
    fn test_in_word_emphasis_removed() {
        let mut options = Options::markdown();
        options.in_word_emphasis = InWordEmphasis::RemoveEmphasis;
        assert_eq!(convert(&in_word_tree(), &options).unwrap(), "greatness");
    }

    #[test]
    fn test_in_word_emphasis_removal_suppresses_nested_styles() {
        let mut options = Options::markdown();
        options.in_word_emphasis = InWordEmphasis::RemoveEmphasis;
        let root = el(
            "p",
            vec![
                text("gre"),
                el("em", vec![el("strong", vec![text("at")])]),
                text("ness"),
            ],
        );
        assert_eq!(convert(&root, &options).unwrap(), "greatness");
    }

    #[test]
    fn test_in_word_emphasis_spacing() {
        let mut options = Options::markdown();
        options.in_word_emphasis = InWordEmphasis::AddSpacing;
        assert_eq!(
            convert(&in_word_tree(), &options).unwrap(),
            "gre *at* ness"
        );
    }

    #[test]
    fn test_word_boundary_emphasis_is_untouched_by_policy() {
        let mut options = Options::markdown();
        options.in_word_emphasis = InWordEmphasis::RemoveEmphasis;
        let root = el(
            "p",
            vec![text("a "), el("em", vec![text("b")]), text(" c")],
        );
        assert_eq!(convert(&root, &options).unwrap(), "a *b* c");
    }

    #[test]
    fn test_empty_emphasis_still_balances_depth() {
        let root = el("p", vec![el("em", vec![]), text("after")]);
        assert_eq!(md(&root), "**after");
    }

    #[test]
    fn test_tt_is_inline_code() {
        let root = el("tt", vec![text("x")]);
        assert_eq!(md(&root), "`x`");
    }
}
