//! In-memory Markdown table model and renderer.
//!
//! A [`MarkdownTable`] collects header and body rows of [`TableCell`]s and
//! renders them as a pipe table, or as plain space-aligned columns for
//! dialects without table support.
//!
//! Pipe tables have no native colspan syntax. When colspan rendering is
//! enabled, a spanning cell is followed by `colspan - 1` empty continuation
//! cells emitted as immediately-adjacent pipes (`| span || next |`), the
//! MultiMarkdown column-spanning notation.

use std::io::{self, Write};

use crate::sink::BlockWriter;
use crate::util::{align, Alignment};

/// One logical table cell.
#[derive(Debug, Clone)]
pub struct TableCell {
    text: String,
    alignment: Alignment,
    colspan: usize,
}

impl TableCell {
    /// Create a left-aligned cell spanning a single column.
    pub fn new(text: impl Into<String>) -> Self {
        Self::spanning(text, Alignment::Left, 1)
    }

    /// Create a cell with an explicit alignment.
    pub fn aligned(text: impl Into<String>, alignment: Alignment) -> Self {
        Self::spanning(text, alignment, 1)
    }

    /// Create a cell spanning `colspan` columns. Spans below 1 are clamped.
    pub fn spanning(text: impl Into<String>, alignment: Alignment, colspan: usize) -> Self {
        Self {
            text: text.into(),
            alignment,
            colspan: colspan.max(1),
        }
    }

    /// The cell's rendered text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The cell's alignment.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// The number of columns this cell spans.
    pub fn colspan(&self) -> usize {
        self.colspan
    }
}

/// A table under construction: ordered header rows plus ordered body rows.
#[derive(Debug, Default)]
pub struct MarkdownTable {
    header: Vec<Vec<TableCell>>,
    body: Vec<Vec<TableCell>>,
}

/// A cell placed on the expanded display grid.
#[derive(Debug)]
struct DisplayCell<'a> {
    text: &'a str,
    continuation: bool,
}

impl MarkdownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header row.
    pub fn push_header_row(&mut self, row: Vec<TableCell>) {
        self.header.push(row);
    }

    /// Append a body row.
    pub fn push_body_row(&mut self, row: Vec<TableCell>) {
        self.body.push(row);
    }

    /// True when the table holds no rows at all.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.body.is_empty()
    }

    /// The rendered column count: the maximum colspan sum over all rows.
    pub fn column_count(&self) -> usize {
        self.header
            .iter()
            .chain(self.body.iter())
            .map(|row| row.iter().map(TableCell::colspan).sum())
            .max()
            .unwrap_or(0)
    }

    /// Render as a Markdown pipe table.
    ///
    /// Emits one or more header rows (a synthetic blank header if the table
    /// has none, since pipe-table syntax mandates one), the alignment
    /// marker row, and the body rows, each line written through `out`.
    pub fn render<W: Write>(
        &self,
        out: &mut BlockWriter<W>,
        colspan_enabled: bool,
    ) -> io::Result<()> {
        let cols = self.column_count();
        if cols == 0 {
            return Ok(());
        }
        let layout = self.layout(cols, colspan_enabled);

        let mut first = true;
        if layout.header.is_empty() {
            render_pipe_row(out, &blank_row(cols), &layout, &mut first)?;
        }
        for row in &layout.header {
            render_pipe_row(out, row, &layout, &mut first)?;
        }
        render_marker_row(out, &layout)?;
        for row in &layout.body {
            render_pipe_row(out, row, &layout, &mut first)?;
        }
        Ok(())
    }

    /// Render as plain space-aligned columns without pipes, for embedding
    /// in a code block when the target dialect has no table syntax.
    pub fn render_plain(&self, colspan_enabled: bool) -> String {
        let cols = self.column_count();
        if cols == 0 {
            return String::new();
        }
        let layout = self.layout(cols, colspan_enabled);

        let mut lines = Vec::new();
        for row in &layout.header {
            lines.push(plain_line(row, &layout.widths, &layout.alignments));
        }
        if !layout.header.is_empty() {
            let dashes: Vec<String> = layout.widths.iter().map(|w| "-".repeat(*w)).collect();
            lines.push(dashes.join("  "));
        }
        for row in &layout.body {
            lines.push(plain_line(row, &layout.widths, &layout.alignments));
        }
        lines.join("\n")
    }

    fn layout(&self, cols: usize, colspan_enabled: bool) -> Layout<'_> {
        let header = expand_rows(&self.header, cols, colspan_enabled);
        let body = expand_rows(&self.body, cols, colspan_enabled);

        // Minimum width 3 keeps room for the marker row (---, :--, :-:, --:).
        let mut widths = vec![3usize; cols];
        for row in header.iter().chain(body.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.text.chars().count());
            }
        }

        // Column alignment: last-seen wins, header rows scanned first.
        let mut alignments = vec![Alignment::Left; cols];
        for row in self.header.iter().chain(self.body.iter()) {
            let mut col = 0;
            for cell in row {
                if col >= cols {
                    break;
                }
                alignments[col] = cell.alignment;
                col += if colspan_enabled { cell.colspan } else { 1 };
            }
        }

        Layout {
            header,
            body,
            widths,
            alignments,
        }
    }
}

/// Emit one table row, each cell padded to its column width per the
/// column's alignment. Continuation cells collapse to a bare pipe.
fn render_pipe_row<W: Write>(
    out: &mut BlockWriter<W>,
    row: &[DisplayCell<'_>],
    layout: &Layout<'_>,
    first: &mut bool,
) -> io::Result<()> {
    if !*first {
        out.write("\n")?;
    }
    *first = false;
    out.write("|")?;
    for (i, cell) in row.iter().enumerate() {
        if cell.continuation {
            out.write("|")?;
        } else {
            out.write(" ")?;
            out.write(&align(cell.text, layout.widths[i], ' ', layout.alignments[i]))?;
            out.write(" |")?;
        }
    }
    Ok(())
}

fn render_marker_row<W: Write>(out: &mut BlockWriter<W>, layout: &Layout<'_>) -> io::Result<()> {
    out.write("\n|")?;
    for (width, alignment) in layout.widths.iter().zip(layout.alignments.iter()) {
        let marker = match alignment {
            Alignment::Left => "-".repeat(*width),
            Alignment::Center => format!(":{}:", "-".repeat(width.saturating_sub(2))),
            Alignment::Right => format!("{}:", "-".repeat(width.saturating_sub(1))),
        };
        out.write(" ")?;
        out.write(&marker)?;
        out.write(" |")?;
    }
    Ok(())
}

struct Layout<'a> {
    header: Vec<Vec<DisplayCell<'a>>>,
    body: Vec<Vec<DisplayCell<'a>>>,
    widths: Vec<usize>,
    alignments: Vec<Alignment>,
}

/// Expand logical rows onto the display grid: optionally unroll colspans
/// into continuation cells, then pad or truncate to the column count.
fn expand_rows(rows: &[Vec<TableCell>], cols: usize, colspan_enabled: bool) -> Vec<Vec<DisplayCell<'_>>> {
    rows.iter()
        .map(|row| {
            let mut expanded = Vec::with_capacity(cols);
            for cell in row {
                expanded.push(DisplayCell {
                    text: cell.text(),
                    continuation: false,
                });
                if colspan_enabled {
                    for _ in 1..cell.colspan() {
                        expanded.push(DisplayCell {
                            text: "",
                            continuation: true,
                        });
                    }
                }
            }
            while expanded.len() < cols {
                expanded.push(DisplayCell {
                    text: "",
                    continuation: false,
                });
            }
            expanded.truncate(cols);
            expanded
        })
        .collect()
}

fn blank_row(cols: usize) -> Vec<DisplayCell<'static>> {
    (0..cols)
        .map(|_| DisplayCell {
            text: "",
            continuation: false,
        })
        .collect()
}

fn plain_line(row: &[DisplayCell<'_>], widths: &[usize], alignments: &[Alignment]) -> String {
    let cells: Vec<String> = row
        .iter()
        .enumerate()
        .map(|(i, cell)| align(cell.text, widths[i], ' ', alignments[i]))
        .collect();
    cells.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: &MarkdownTable, colspan_enabled: bool) -> String {
        let mut out = BlockWriter::buffered();
        table.render(&mut out, colspan_enabled).unwrap();
        out.into_string()
    }

    #[test]
    fn test_simple_table() {
        let mut table = MarkdownTable::new();
        table.push_header_row(vec![TableCell::new("A"), TableCell::new("B")]);
        table.push_body_row(vec![TableCell::new("1"), TableCell::new("2")]);
        assert_eq!(
            render(&table, false),
            "| A   | B   |\n| --- | --- |\n| 1   | 2   |"
        );
    }

    #[test]
    fn test_column_widths_follow_longest_cell() {
        let mut table = MarkdownTable::new();
        table.push_header_row(vec![TableCell::new("Name")]);
        table.push_body_row(vec![TableCell::new("a longer value")]);
        assert_eq!(
            render(&table, false),
            "| Name           |\n| -------------- |\n| a longer value |"
        );
    }

    #[test]
    fn test_colspan_forces_column_count() {
        let mut table = MarkdownTable::new();
        table.push_header_row(vec![TableCell::new("A"), TableCell::new("B")]);
        table.push_body_row(vec![TableCell::spanning("x", Alignment::Left, 3)]);
        assert_eq!(table.column_count(), 3);
        // Header is padded with an extra empty cell; the spanning body cell
        // is followed by two continuation pipes.
        assert_eq!(
            render(&table, true),
            "| A   | B   |     |\n| --- | --- | --- |\n| x   |||"
        );
    }

    #[test]
    fn test_colspan_disabled_pads_instead() {
        let mut table = MarkdownTable::new();
        table.push_body_row(vec![TableCell::spanning("x", Alignment::Left, 2)]);
        table.push_body_row(vec![TableCell::new("a"), TableCell::new("b")]);
        assert_eq!(
            render(&table, false),
            "|     |     |\n| --- | --- |\n| x   |     |\n| a   | b   |"
        );
    }

    #[test]
    fn test_synthetic_header_for_headerless_table() {
        let mut table = MarkdownTable::new();
        table.push_body_row(vec![TableCell::new("1"), TableCell::new("2")]);
        assert_eq!(
            render(&table, false),
            "|     |     |\n| --- | --- |\n| 1   | 2   |"
        );
    }

    #[test]
    fn test_alignment_marker_row_and_cell_padding() {
        let mut table = MarkdownTable::new();
        table.push_header_row(vec![
            TableCell::aligned("l", Alignment::Left),
            TableCell::aligned("c", Alignment::Center),
            TableCell::aligned("r", Alignment::Right),
        ]);
        assert_eq!(
            render(&table, false),
            "| l   |  c  |   r |\n| --- | :-: | --: |"
        );
    }

    #[test]
    fn test_alignment_disagreement_last_seen_wins() {
        let mut table = MarkdownTable::new();
        table.push_header_row(vec![TableCell::aligned("h", Alignment::Center)]);
        table.push_body_row(vec![TableCell::aligned("b", Alignment::Right)]);
        let rendered = render(&table, false);
        assert!(rendered.contains("--:"));
        assert!(!rendered.contains(":-:"));
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let table = MarkdownTable::new();
        assert_eq!(render(&table, false), "");
        assert_eq!(table.render_plain(false), "");
    }

    #[test]
    fn test_render_plain() {
        let mut table = MarkdownTable::new();
        table.push_header_row(vec![TableCell::new("A"), TableCell::new("B")]);
        table.push_body_row(vec![TableCell::new("1"), TableCell::new("2")]);
        assert_eq!(
            table.render_plain(false),
            "A    B\n---  ---\n1    2"
        );
    }

    #[test]
    fn test_render_plain_without_header_has_no_separator() {
        let mut table = MarkdownTable::new();
        table.push_body_row(vec![TableCell::new("1")]);
        assert_eq!(table.render_plain(false), "1");
    }

    #[test]
    fn test_cell_colspan_is_clamped() {
        let cell = TableCell::spanning("x", Alignment::Left, 0);
        assert_eq!(cell.colspan(), 1);
    }
}
