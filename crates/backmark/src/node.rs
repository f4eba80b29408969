//! DOM node structure for HTML to Markdown conversion.
//!
//! This module provides a minimal, parser-agnostic DOM tree. Any HTML
//! parser can convert its output to this structure; the crate never
//! mutates it during a conversion. Tag and attribute names are normalized
//! to lowercase at construction time.

use indexmap::IndexMap;

/// A node in the DOM tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An element with tag name, attributes and children.
    Element(Element),
    /// A text run.
    Text(String),
    /// A comment. Comments are skipped during conversion.
    Comment(String),
}

impl Node {
    /// Create a new element node.
    pub fn element(tag: &str) -> Self {
        Node::Element(Element::new(tag))
    }

    /// Create a new element node with attributes.
    pub fn element_with_attrs(tag: &str, attrs: &[(&str, &str)]) -> Self {
        Node::Element(Element::with_attrs(tag, attrs))
    }

    /// Create a new text node.
    pub fn text(content: &str) -> Self {
        Node::Text(content.to_string())
    }

    /// Create a new comment node.
    pub fn comment(content: &str) -> Self {
        Node::Comment(content.to_string())
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// The element, if this is an element node.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// The text, if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    /// All text content from this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Comment(_) => String::new(),
            Node::Element(el) => el.text_content(),
        }
    }
}

/// An element node: lowercase tag name, attribute map, ordered children.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: IndexMap<String, String>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create an element with attributes.
    pub fn with_attrs(tag: &str, attrs: &[(&str, &str)]) -> Self {
        let mut element = Self::new(tag);
        for (name, value) in attrs {
            element.set_attr(name, value);
        }
        element
    }

    /// The lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value by (case-insensitive) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Check if an attribute exists.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(&name.to_lowercase())
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_lowercase(), value.to_string());
    }

    /// Append a child node.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// The ordered child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Only the element children, in order.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// All text content from this element's descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) => text.push_str(t),
                Node::Element(el) => text.push_str(&el.text_content()),
                Node::Comment(_) => {}
            }
        }
        text
    }
}

/// The immediate neighbors of a node inside its parent's child list.
///
/// The walker owns the child slice during traversal, so sibling navigation
/// is provided as this borrowed view instead of parent pointers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Siblings<'a> {
    /// The previous sibling, if any.
    pub prev: Option<&'a Node>,
    /// The next sibling, if any.
    pub next: Option<&'a Node>,
}

impl<'a> Siblings<'a> {
    /// The siblings of `children[index]`.
    pub fn around(children: &'a [Node], index: usize) -> Self {
        Self {
            prev: index.checked_sub(1).and_then(|i| children.get(i)),
            next: children.get(index + 1),
        }
    }
}
