//! HTML parsing support.
//!
//! This module converts HTML strings into the [`Node`] tree consumed by
//! the converter. It is a convenience adapter, not a sanitizer: feed it
//! trusted or pre-cleaned markup.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::{Element, Node};

/// Parse an HTML string into a [`Node`] tree.
///
/// # Example
///
/// ```rust
/// use backmark::{convert, parse_html, Options};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>");
/// let markdown = convert(&node, &Options::markdown()).unwrap();
/// assert_eq!(markdown, "# Hello *World*");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    element_to_node(document.root_element())
}

fn element_to_node(element: ElementRef) -> Node {
    let mut node = Element::new(element.value().name());
    for (name, value) in element.value().attrs() {
        node.set_attr(name, value);
    }
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => node.add_child(Node::text(&text.text)),
            ScraperNode::Comment(comment) => node.add_child(Node::comment(&comment.comment)),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(element_to_node(child_element));
                }
            }
            _ => {}
        }
    }
    Node::Element(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::convert;
    use crate::options::Options;

    fn md(html: &str) -> String {
        convert(&parse_html(html), &Options::markdown()).unwrap()
    }

    #[test]
    fn test_parse_simple_html() {
        let node = parse_html("<p>Hello World</p>");
        assert!(node.is_element());
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(md("<p>one</p><p>two</p>"), "one\n\ntwo");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(
            md("<p>Hello <strong>World</strong></p>"),
            "Hello **World**"
        );
    }

    #[test]
    fn test_attributes_survive_parsing() {
        assert_eq!(
            md(r#"<a href="https://example.com">Link</a>"#),
            "[Link](https://example.com)"
        );
    }

    #[test]
    fn test_comments_are_carried_and_skipped() {
        assert_eq!(md("<p>a<!-- hidden -->b</p>"), "ab");
    }

    #[test]
    fn test_nested_emphasis_from_markup() {
        assert_eq!(md("<em>a<em>b</em>c</em>"), "*abc*");
    }
}
