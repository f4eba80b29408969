//! The `<table>` handler: builds a [`MarkdownTable`] from the DOM subtree
//! and renders it per the table options.

use std::io::Write;

use backmark_core::{Alignment, BlockWriter, MarkdownTable, TableCell};
use once_cell::sync::Lazy;
use regex::Regex;

use super::blocks::write_code_block;
use crate::converter::DocumentConverter;
use crate::node::Element;
use crate::Result;

static STYLE_ALIGNMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)text-align:\s*([a-z]+)").expect("valid alignment pattern"));

pub(super) fn table<W: Write>(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    out: &mut BlockWriter<W>,
) -> Result<()> {
    let mut model = MarkdownTable::new();
    let mut has_header = false;
    process_table(conv, el, &mut model, &mut has_header)?;
    if model.is_empty() {
        log::debug!("skipping <table> without any rows");
        return Ok(());
    }

    let options = conv.options;
    if options.table_rendered_as_code {
        let plain = model.render_plain(options.table_colspan_enabled);
        write_code_block(conv, &plain, "", out)
    } else if options.table_style.converted_to_text() {
        out.start_block()?;
        model.render(out, options.table_colspan_enabled)?;
        out.end_block();
        Ok(())
    } else {
        log::debug!("dropping <table>: target dialect has no table syntax");
        Ok(())
    }
}

/// Walk the table's sections. `thead` rows become header rows; `tbody`
/// and `tfoot` are searched recursively; a stray `tr` whose first cell is
/// a `th` is promoted to the header when none exists yet.
fn process_table(
    conv: &mut DocumentConverter<'_>,
    el: &Element,
    model: &mut MarkdownTable,
    has_header: &mut bool,
) -> Result<()> {
    for child in el.element_children() {
        match child.tag() {
            "thead" => {
                *has_header = true;
                for row in child.element_children() {
                    let cells = process_row(conv, row)?;
                    if !cells.is_empty() {
                        model.push_header_row(cells);
                    }
                }
            }
            "tbody" | "tfoot" => process_table(conv, child, model, has_header)?,
            "tr" => {
                let cells = process_row(conv, child)?;
                if cells.is_empty() {
                    log::debug!("skipping <tr> without cells");
                    continue;
                }
                let leads_with_th = child
                    .element_children()
                    .next()
                    .is_some_and(|cell| cell.tag() == "th");
                if leads_with_th && !*has_header {
                    *has_header = true;
                    model.push_header_row(cells);
                } else {
                    model.push_body_row(cells);
                }
            }
            other => {
                log::debug!("skipping <{}> inside <table>", other);
            }
        }
    }
    Ok(())
}

fn process_row(conv: &mut DocumentConverter<'_>, row: &Element) -> Result<Vec<TableCell>> {
    let mut cells = Vec::new();
    for cell in row.element_children() {
        if cell.tag() != "td" && cell.tag() != "th" {
            continue;
        }
        // Cell content is inline; a newline would break the pipe table.
        let contents = conv.inline_content(cell)?.replace('\n', " ");
        cells.push(TableCell::spanning(
            contents,
            cell_alignment(cell),
            cell_colspan(cell),
        ));
    }
    Ok(cells)
}

/// Alignment from the `align` attribute, or a `text-align` declaration in
/// the `style` attribute. Anything unrecognized is left-aligned.
fn cell_alignment(cell: &Element) -> Alignment {
    let value = cell
        .attr("align")
        .map(|align| align.to_lowercase())
        .or_else(|| {
            cell.attr("style")
                .and_then(|style| STYLE_ALIGNMENT_PATTERN.captures(style))
                .map(|caps| caps[1].to_lowercase())
        });
    match value.as_deref() {
        Some("center") => Alignment::Center,
        Some("right") => Alignment::Right,
        _ => Alignment::Left,
    }
}

/// A colspan that fails to parse as a positive integer counts as 1.
fn cell_colspan(cell: &Element) -> usize {
    match cell.attr("colspan") {
        None => 1,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::debug!("ignoring unparsable colspan {:?}", raw);
            1
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::converter::convert;
    use crate::node::{Element, Node};
    use crate::options::Options;

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

    fn cell(tag: &str, text: &str) -> Node {
        el(tag, vec![Node::text(text)])
    }

    fn simple_table() -> Node {
        el(
            "table",
            vec![
                el("thead", vec![el("tr", vec![cell("th", "Name"), cell("th", "Age")])]),
                el(
                    "tbody",
                    vec![
                        el("tr", vec![cell("td", "Ada"), cell("td", "36")]),
                        el("tr", vec![cell("td", "Grace"), cell("td", "85")]),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_pipe_table() {
        let markdown = convert(&simple_table(), &Options::markdown_extra()).unwrap();
        assert_eq!(
            markdown,
            "| Name  | Age |\n| ----- | --- |\n| Ada   | 36  |\n| Grace | 85  |"
        );
    }

    #[test]
    fn test_header_promotion_from_th_row() {
        let table = el(
            "table",
            vec![
                el("tr", vec![cell("th", "H")]),
                el("tr", vec![cell("td", "b")]),
            ],
        );
        let markdown = convert(&table, &Options::markdown_extra()).unwrap();
        assert_eq!(markdown, "| H   |\n| --- |\n| b   |");
    }

    #[test]
    fn test_second_th_row_is_a_body_row() {
        let table = el(
            "table",
            vec![
                el("tr", vec![cell("th", "H")]),
                el("tr", vec![cell("th", "x")]),
            ],
        );
        let markdown = convert(&table, &Options::markdown_extra()).unwrap();
        assert_eq!(markdown, "| H   |\n| --- |\n| x   |");
    }

    #[test]
    fn test_headerless_table_gets_blank_header() {
        let table = el("table", vec![el("tr", vec![cell("td", "only")])]);
        let markdown = convert(&table, &Options::markdown_extra()).unwrap();
        assert_eq!(markdown, "|      |\n| ---- |\n| only |");
    }

    #[test]
    fn test_alignment_attributes() {
        let table = el(
            "table",
            vec![el(
                "tr",
                vec![
                    el_attrs("td", &[("align", "center")], vec![Node::text("c")]),
                    el_attrs(
                        "td",
                        &[("style", "text-align: right; color: red")],
                        vec![Node::text("r")],
                    ),
                ],
            )],
        );
        let markdown = convert(&table, &Options::markdown_extra()).unwrap();
        assert_eq!(markdown, "|     |     |\n| :-: | --: |\n|  c  |   r |");
    }

    #[test]
    fn test_colspan_expansion() {
        let table = el(
            "table",
            vec![
                el("tr", vec![cell("th", "A"), cell("th", "B")]),
                el(
                    "tr",
                    vec![el_attrs("td", &[("colspan", "2")], vec![Node::text("wide")])],
                ),
            ],
        );
        let markdown = convert(&table, &Options::multi_markdown()).unwrap();
        assert_eq!(markdown, "| A    | B   |\n| ---- | --- |\n| wide ||");
    }

    #[test]
    fn test_invalid_colspan_falls_back_to_one() {
        let table = el(
            "table",
            vec![el(
                "tr",
                vec![
                    el_attrs("td", &[("colspan", "potato")], vec![Node::text("a")]),
                    cell("td", "b"),
                ],
            )],
        );
        let markdown = convert(&table, &Options::multi_markdown()).unwrap();
        assert_eq!(markdown, "|     |     |\n| --- | --- |\n| a   | b   |");
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let table = el(
            "table",
            vec![el("tr", vec![]), el("tr", vec![cell("td", "x")])],
        );
        let markdown = convert(&table, &Options::markdown_extra()).unwrap();
        assert_eq!(markdown, "|     |\n| --- |\n| x   |");
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let table = el("table", vec![]);
        let markdown = convert(&table, &Options::markdown_extra()).unwrap();
        assert_eq!(markdown, "");
    }

    #[test]
    fn test_table_rendered_as_code() {
        let markdown = convert(&simple_table(), &Options::markdown()).unwrap();
        assert_eq!(
            markdown,
            "    Name   Age\n    -----  ---\n    Ada    36\n    Grace  85"
        );
    }

    #[test]
    fn test_table_dropped_without_dialect_support() {
        let mut options = Options::markdown();
        options.table_rendered_as_code = false;
        let markdown = convert(&simple_table(), &options).unwrap();
        assert_eq!(markdown, "");
    }

    #[test]
    fn test_cell_content_is_inline_converted() {
        let table = el(
            "table",
            vec![el(
                "tr",
                vec![el("td", vec![el("strong", vec![Node::text("bold")])])],
            )],
        );
        let markdown = convert(&table, &Options::markdown_extra()).unwrap();
        assert_eq!(markdown, "|          |\n| -------- |\n| **bold** |");
    }

    #[test]
    fn test_pipes_in_cell_text_are_escaped() {
        let table = el("table", vec![el("tr", vec![cell("td", "a|b")])]);
        let markdown = convert(&table, &Options::markdown_extra()).unwrap();
        assert_eq!(markdown, "|      |\n| ---- |\n| a\\|b |");
    }
}
