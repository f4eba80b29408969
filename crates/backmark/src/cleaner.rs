//! Text cleaning and escaping.
//!
//! [`TextCleaner`] turns raw DOM text into Markdown-safe plain text:
//! Markdown metacharacters are backslash-escaped, HTML entities are
//! reversed to their plain-text equivalents, and (per options) smart
//! quotes and punctuation are replaced both in entity and literal Unicode
//! form. Code text goes through a separate path that decodes every entity
//! and escapes nothing, since Markdown code spans would otherwise
//! double-encode them.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::options::Options;

/// Whitespace runs ending in a newline collapse to a single space; prose
/// text never keeps newlines.
static LINEBREAK_REMOVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s*\n)+").expect("valid linebreak pattern"));

struct Escape {
    pattern: Regex,
    replacement: String,
}

/// Cleans up plain text fields based on the configured options.
pub struct TextCleaner {
    /// Replacement targets keyed by entity (lowercase) or literal character.
    replacements: HashMap<String, String>,
    entity_pattern: Regex,
    unicode_pattern: Option<Regex>,
    escapes: Vec<Escape>,
}

impl TextCleaner {
    /// Build the replacement tables and escape rules for `options`.
    pub fn new(options: &Options) -> Self {
        let mut replacements = HashMap::new();
        let entity_pattern = build_entity_pattern(options, &mut replacements);
        let unicode_pattern = build_unicode_pattern(options, &mut replacements);
        Self {
            replacements,
            entity_pattern,
            unicode_pattern,
            escapes: build_escapes(options),
        }
    }

    /// Clean normal prose text: collapse newlines, escape Markdown
    /// metacharacters, then reverse entities and configured Unicode
    /// characters.
    pub fn clean(&self, input: &str) -> String {
        let mut text = LINEBREAK_REMOVER.replace_all(input, " ").into_owned();
        for escape in &self.escapes {
            text = escape
                .pattern
                .replace_all(&text, escape.replacement.as_str())
                .into_owned();
        }
        let text = self.replace_entities(&text);
        match &self.unicode_pattern {
            Some(pattern) => self.replace_unicode(&text, pattern),
            None => text,
        }
    }

    /// Clean code text: decode all HTML entities once, escape nothing,
    /// keep newlines.
    ///
    /// `&apos;` is replaced up front since HTML4 entity decoders do not
    /// always cover it.
    pub fn clean_code(&self, input: &str) -> String {
        let input = input.replace("&apos;", "'");
        html_escape::decode_html_entities(&input).into_owned()
    }

    /// Clean inline code and wrap it in a backtick delimiter sized to the
    /// content.
    ///
    /// The delimiter is one backtick longer than the longest backtick run
    /// in the text; a single padding space is added on a side whose first
    /// or last character is itself a backtick. Newlines become spaces.
    pub fn clean_inline_code(&self, input: &str) -> String {
        let output = self.clean_code(input).replace('\n', " ");
        if output.contains('`') {
            let prepend = if output.starts_with('`') { " " } else { "" };
            let append = if output.ends_with('`') { " " } else { "" };
            let delim = "`".repeat(longest_backtick_run(&output) + 1);
            format!("{}{}{}{}{}", delim, prepend, output, append, delim)
        } else {
            format!("`{}`", output)
        }
    }

    fn replace_entities(&self, input: &str) -> String {
        self.entity_pattern
            .replace_all(input, |caps: &Captures| {
                let whole = caps.get(0).map_or("", |m| m.as_str());
                match self.replacements.get(&whole.to_lowercase()) {
                    Some(replacement) => replacement.clone(),
                    // A double-encoded entity: emit an escaped ampersand
                    // and keep the trailing entity text verbatim.
                    None => format!("\\&{}", caps.get(1).map_or("", |m| m.as_str())),
                }
            })
            .into_owned()
    }

    fn replace_unicode(&self, input: &str, pattern: &Regex) -> String {
        pattern
            .replace_all(input, |caps: &Captures| {
                let whole = caps.get(0).map_or("", |m| m.as_str());
                self.replacements
                    .get(whole)
                    .cloned()
                    .unwrap_or_else(|| whole.to_string())
            })
            .into_owned()
    }
}

/// Build the case-insensitive entity pattern. The first alternative
/// handles double-encoded entities: `&amp;` directly followed by another
/// entity reference must keep that trailing reference as literal text.
fn build_entity_pattern(options: &Options, replacements: &mut HashMap<String, String>) -> Regex {
    let mut names = Vec::new();
    let mut add = |entity: &str, replacement: &str, names: &mut Vec<String>| {
        replacements.insert(entity.to_string(), replacement.to_string());
        names.push(entity[1..entity.len() - 1].to_string());
    };

    add("&amp;", "&", &mut names);
    add("&lt;", "<", &mut names);
    add("&gt;", ">", &mut names);
    add("&quot;", "\"", &mut names);
    if options.reverse_html_smart_quotes {
        add("&ldquo;", "\"", &mut names);
        add("&rdquo;", "\"", &mut names);
        add("&lsquo;", "'", &mut names);
        add("&rsquo;", "'", &mut names);
        add("&apos;", "'", &mut names);
        add("&laquo;", "<<", &mut names);
        add("&raquo;", ">>", &mut names);
    }
    if options.reverse_html_smart_punctuation {
        add("&ndash;", "--", &mut names);
        add("&mdash;", "---", &mut names);
        add("&hellip;", "...", &mut names);
    }

    let pattern = format!(
        r"(?i)&(?:amp;([#a-z0-9]+;)|(?:{});)",
        names.join("|")
    );
    Regex::new(&pattern).expect("valid entity pattern")
}

/// Build the literal-character class for the second replacement pass, if
/// any Unicode reversal is enabled.
fn build_unicode_pattern(
    options: &Options,
    replacements: &mut HashMap<String, String>,
) -> Option<Regex> {
    if !options.reverse_unicode_smart_quotes && !options.reverse_unicode_smart_punctuation {
        return None;
    }
    let mut class = String::from("[");
    let mut add = |c: char, replacement: &str, class: &mut String| {
        replacements.insert(c.to_string(), replacement.to_string());
        class.push_str(&regex::escape(&c.to_string()));
    };

    if options.reverse_unicode_smart_quotes {
        add('\u{201c}', "\"", &mut class); // left double quote: “
        add('\u{201d}', "\"", &mut class); // right double quote: ”
        add('\u{2018}', "'", &mut class); // left single quote: ‘
        add('\u{2019}', "'", &mut class); // right single quote: ’
        add('\u{00ab}', "<<", &mut class); // left angle quote: «
        add('\u{00bb}', ">>", &mut class); // right angle quote: »
    }
    if options.reverse_unicode_smart_punctuation {
        add('\u{2013}', "--", &mut class); // en-dash: –
        add('\u{2014}', "---", &mut class); // em-dash: —
        add('\u{2026}', "...", &mut class); // ellipsis: …
    }
    class.push(']');
    Some(Regex::new(&class).expect("valid unicode pattern"))
}

fn build_escapes(options: &Options) -> Vec<Escape> {
    let mut escapes = Vec::new();

    // Single backslashes become double backslashes.
    escapes.push(Escape {
        pattern: Regex::new(r"\\").expect("valid backslash pattern"),
        replacement: r"\\".to_string(),
    });

    // Characters that are always escaped, plus the pipe when tables are
    // rendered as Markdown text.
    let mut class = String::from(r"([`*_{}\[\]#");
    if options.tables_as_text() {
        class.push('|');
    }
    class.push_str("])");
    escapes.push(Escape {
        pattern: Regex::new(&class).expect("valid escape class"),
        replacement: r"\${1}".to_string(),
    });

    // Characters only escaped in leading position, after at most one
    // space: list markers, and the definition marker when definition
    // lists are enabled.
    let mut leading = String::from("^( ?)([-+");
    if options.definition_lists {
        leading.push(':');
    }
    leading.push_str("])");
    escapes.push(Escape {
        pattern: Regex::new(&leading).expect("valid leading escape"),
        replacement: r"${1}\${2}".to_string(),
    });

    escapes
}

fn longest_backtick_run(input: &str) -> usize {
    let mut max = 0;
    let mut run = 0;
    for c in input.chars() {
        if c == '`' {
            run += 1;
            max = max.max(run);
        } else {
            run = 0;
        }
    }
    max
}
