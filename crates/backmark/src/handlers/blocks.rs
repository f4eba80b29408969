//! Handlers for block-level elements.

use std::io::Write;

use backmark_core::{prepend_each_line, BlockWriter};

use crate::converter::DocumentConverter;
use crate::node::Element;
use crate::options::CodeBlockStyle;
use crate::Result;

pub(super) fn paragraph<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let content = conv.inline_content(el)?;
    if content.is_empty() {
        return Ok(());
    }
    out.write_block(&content)?;
    Ok(())
}

/// Generic block container (`div`): the children are converted into a
/// block of their own, so sibling containers stay separated while their
/// internal blocks keep normal spacing.
pub(super) fn container<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let content = conv.block_content(el)?;
    if content.is_empty() {
        return Ok(());
    }
    out.write_block(&content)?;
    Ok(())
}

pub(super) fn heading<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let level: usize = el.tag()[1..].parse().unwrap_or(1);
    let content = conv.inline_content(el)?;
    if content.is_empty() {
        return Ok(());
    }
    out.write_block(&format!("{} {}", "#".repeat(level), content))?;
    Ok(())
}

pub(super) fn blockquote<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let content = conv.block_content(el)?;
    if content.is_empty() {
        return Ok(());
    }
    let quoted: Vec<String> = content
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect();
    out.write_block(&quoted.join("\n"))?;
    Ok(())
}

pub(super) fn list<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let items: Vec<&Element> = el.element_children().filter(|c| c.tag() == "li").collect();
    if items.is_empty() {
        log::debug!("skipping <{}> without <li> children", el.tag());
        return Ok(());
    }
    let ordered = el.tag() == "ol";
    let start: usize = el
        .attr("start")
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(1);

    // A top-level list is a block of its own; a nested list attaches to
    // its parent item with a plain newline.
    if conv.list_depth == 0 {
        out.start_block()?;
    } else {
        out.write("\n")?;
    }
    conv.list_depth += 1;
    for (index, item) in items.iter().enumerate() {
        let content = conv.block_content(item)?.replace('\n', "\n    ");
        let prefix = if ordered {
            format!("{}.  ", start + index)
        } else {
            "*   ".to_string()
        };
        if index > 0 {
            out.write("\n")?;
        }
        out.write(&prefix)?;
        out.write(&content)?;
    }
    conv.list_depth -= 1;
    if conv.list_depth == 0 {
        out.end_block();
    }
    Ok(())
}

/// Markdown Extra definition lists: the term on its own line, each
/// definition prefixed with `: `.
pub(super) fn definition_list<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let mut text = String::new();
    for child in el.element_children() {
        match child.tag() {
            "dt" => {
                if !text.is_empty() {
                    text.push_str("\n\n");
                }
                text.push_str(&conv.inline_content(child)?);
            }
            "dd" => {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(": ");
                text.push_str(&conv.block_content(child)?.replace('\n', "\n  "));
            }
            other => {
                log::debug!("skipping <{}> inside <dl>", other);
            }
        }
    }
    if text.is_empty() {
        return Ok(());
    }
    out.write_block(&text)?;
    Ok(())
}

pub(super) fn code_block<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let code_el = el.element_children().find(|c| c.tag() == "code");
    let raw = match code_el {
        Some(code) => code.text_content(),
        None => el.text_content(),
    };
    let code = conv.cleaner.clean_code(&raw);
    let code = code.trim_matches('\n');
    if code.trim().is_empty() {
        return Ok(());
    }
    let language = code_el
        .and_then(|code| code.attr("class"))
        .and_then(|class| {
            class
                .split_whitespace()
                .find(|name| name.starts_with("language-"))
                .map(|name| name["language-".len()..].to_string())
        })
        .unwrap_or_default();
    write_code_block(conv, code, &language, out)
}

/// Emit `code` as a code block, fenced or indented per options. Shared
/// with the table handler's rendered-as-code mode.
pub(super) fn write_code_block<W: Write>(
    conv: &DocumentConverter<'_>,
    code: &str,
    language: &str,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    match conv.options.code_block_style {
        CodeBlockStyle::Fenced => {
            let fence = &conv.options.fence;
            out.write_block(&format!("{}{}\n{}\n{}", fence, language, code, fence))?;
        }
        CodeBlockStyle::Indented => {
            out.write_block(&prepend_each_line(code, "    "))?;
        }
    }
    Ok(())
}

pub(super) fn horizontal_rule<W: Write>(
    _conv: &mut DocumentConverter<'_>,
    _el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    out.write_block("---")?;
    Ok(())
}
