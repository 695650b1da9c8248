//! Table grid model for WordprocessingML `<w:tbl>` elements.
//! Parses table markup into a rectangular grid of text cells and serializes
//! rebuilt tables back to markup.

use crate::error::TableditError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::match_xml_events;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::name::QName;

// XML tag names for parsing WordprocessingML tables
const TAG_TABLE: QName = QName(b"w:tbl");            // Table element
const TAG_ROW: QName = QName(b"w:tr");               // Table row
const TAG_CELL: QName = QName(b"w:tc");              // Table cell
const TAG_PARAGRAPH: QName = QName(b"w:p");          // Paragraph within a cell
const TAG_TEXT: QName = QName(b"w:t");               // Text run content
const TAG_TABLE_STYLE: QName = QName(b"w:tblStyle"); // Named table style reference

/// Named style assigned to rebuilt tables, single grid lines on every edge
pub const GRID_STYLE: &str = "TableGrid";

/// A single text-bearing unit at a (row, column) coordinate within a table
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
}

/// A rectangular grid of cells parsed from, or destined for, a `<w:tbl>` element.
///
/// A parsed table keeps its source markup and round-trips byte-for-byte while
/// unmodified; any mutation drops the source, and the table then serializes to
/// generated markup carrying text content only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    /// Cell grid, row-major; every row has the same length
    grid: Vec<Vec<Cell>>,
    /// Named table style, if any
    style: Option<String>,
    /// Whether explicit single-line borders are written on serialization
    grid_borders: bool,
    /// Original markup, kept until the table is modified
    source: Option<String>,
}

impl Table {
    /// Creates an all-empty table of the given dimensions
    pub fn blank(rows: usize, cols: usize) -> Table {
        Table {
            grid: vec![vec![Cell::default(); cols]; rows],
            style: None,
            grid_borders: false,
            source: None,
        }
    }

    /// Parses a complete `<w:tbl>` element into a table
    ///
    /// Rows are `<w:tr>` children and cells `<w:tc>` children; cell text is
    /// the concatenation of `<w:t>` runs with a newline between paragraphs.
    /// Tables nested inside a cell are skipped. Short rows are padded with
    /// empty cells so the grid stays rectangular.
    pub(crate) fn parse(xml: &str) -> Result<Table, TableditError> {
        let mut reader = XmlReader::new(xml.as_bytes());
        let mut grid = Vec::<Vec<Cell>>::new();
        let mut style = None::<String>;
        let mut table_depth = 0usize;
        let mut in_cell = false;
        let mut in_text = false;
        let mut first_paragraph = true;
        let mut text = String::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_TABLE => table_depth += 1,
            Event::End(event) if event.name() == TAG_TABLE => table_depth -= 1,
            _ if table_depth != 1 => (), // nested table content belongs to its own grid
            Event::Start(event) if event.name() == TAG_ROW => grid.push(Vec::new()),
            Event::Start(event) if event.name() == TAG_CELL => {
                in_cell = true;
                first_paragraph = true;
                text.clear();
            }
            Event::End(event) if event.name() == TAG_CELL => {
                in_cell = false;
                if let Some(row) = grid.last_mut() {
                    row.push(Cell { text: std::mem::take(&mut text) });
                }
            }
            Event::Start(event) if in_cell && event.name() == TAG_PARAGRAPH => {
                if first_paragraph {
                    first_paragraph = false;
                } else {
                    text.push('\n');
                }
            }
            Event::Start(event) if in_cell && event.name() == TAG_TEXT => in_text = true,
            Event::End(event) if event.name() == TAG_TEXT => in_text = false,
            Event::Text(event) if in_text => text.push_bytes_text(&event)?,
            Event::CData(event) if in_text => text.push_str(&event.xml_content()?),
            Event::GeneralRef(event) if in_text => text.push_bytes_ref(&event)?,
            Event::Start(event) if event.name() == TAG_TABLE_STYLE => {
                style = event.get_attribute_value("w:val")?.map(|value| value.to_string());
            }
        });

        let cols = grid.iter().map(|row| row.len()).max().unwrap_or(0);
        for row in &mut grid {
            row.resize(cols, Cell::default());
        }

        Ok(Table {
            grid,
            style,
            grid_borders: false,
            source: Some(xml.to_owned()),
        })
    }

    /// Number of rows in the table
    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    /// Number of columns in the table
    pub fn cols(&self) -> usize {
        self.grid.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Gets the cell at 0-based (row, col), if in range
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.get(row)?.get(col)
    }

    /// Gets the text of the cell at 0-based (row, col), if in range
    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.cell(row, col).map(|cell| cell.text.as_str())
    }

    /// Name of the table style assigned to this table, if any
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Sets the text of the cell at 0-based (row, col).
    /// Out-of-range coordinates are ignored rather than faulting.
    pub fn set_text(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if let Some(cell) = self.grid.get_mut(row).and_then(|cells| cells.get_mut(col)) {
            cell.text = text.into();
            self.source = None;
        }
    }

    /// Assigns the standard grid border style to the table.
    /// Idempotent; affects visual rendering only, never cell content.
    pub fn apply_grid_borders(&mut self) {
        self.style = Some(GRID_STYLE.to_owned());
        self.grid_borders = true;
        self.source = None;
    }

    /// Serializes the table back to a `<w:tbl>` element
    pub(crate) fn to_xml(&self) -> String {
        if let Some(source) = &self.source {
            return source.clone();
        }

        let mut xml = String::new();
        xml.push_str("<w:tbl><w:tblPr>");
        if let Some(style) = &self.style {
            xml.push_str(&format!("<w:tblStyle w:val=\"{}\"/>", escape(style)));
        }
        xml.push_str("<w:tblW w:w=\"0\" w:type=\"auto\"/>");
        if self.grid_borders {
            xml.push_str("<w:tblBorders>");
            for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
                xml.push_str(&format!(
                    "<w:{} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
                    edge
                ));
            }
            xml.push_str("</w:tblBorders>");
        }
        xml.push_str("</w:tblPr><w:tblGrid>");
        for _ in 0..self.cols() {
            xml.push_str("<w:gridCol/>");
        }
        xml.push_str("</w:tblGrid>");
        for row in &self.grid {
            xml.push_str("<w:tr>");
            for cell in row {
                xml.push_str("<w:tc>");
                if cell.text.is_empty() {
                    xml.push_str("<w:p/>"); // a cell must hold at least one paragraph
                } else {
                    for line in cell.text.split('\n') {
                        if line.is_empty() {
                            xml.push_str("<w:p/>");
                        } else {
                            xml.push_str(&format!(
                                "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                                escape(line)
                            ));
                        }
                    }
                }
                xml.push_str("</w:tc>");
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_xml(text: &str) -> String {
        format!("<w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc>", text)
    }

    fn table_xml(rows: &[&[&str]]) -> String {
        let mut xml = String::from("<w:tbl><w:tblPr><w:tblStyle w:val=\"TableGrid\"/></w:tblPr>");
        for row in rows {
            xml.push_str("<w:tr>");
            for text in *row {
                xml.push_str(&cell_xml(text));
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
        xml
    }

    #[test]
    fn parse_grid() {
        let xml = table_xml(&[&["A", "B"], &["C", "D"]]);
        let table = Table::parse(&xml).unwrap();

        assert_eq!(table.rows(), 2);
        assert_eq!(table.cols(), 2);
        assert_eq!(table.text(0, 0), Some("A"));
        assert_eq!(table.text(0, 1), Some("B"));
        assert_eq!(table.text(1, 0), Some("C"));
        assert_eq!(table.text(1, 1), Some("D"));
        assert_eq!(table.style(), Some("TableGrid"));
    }

    #[test]
    fn parse_round_trips_source_verbatim() {
        let xml = table_xml(&[&["A", "B"]]);
        let table = Table::parse(&xml).unwrap();

        assert_eq!(table.to_xml(), xml);
    }

    #[test]
    fn parse_joins_paragraphs_with_newline() {
        let xml = "<w:tbl><w:tr><w:tc>\
                   <w:p><w:r><w:t>first</w:t></w:r></w:p>\
                   <w:p><w:r><w:t>second</w:t></w:r></w:p>\
                   </w:tc></w:tr></w:tbl>";
        let table = Table::parse(xml).unwrap();

        assert_eq!(table.text(0, 0), Some("first\nsecond"));
    }

    #[test]
    fn parse_resolves_entities() {
        let xml = "<w:tbl><w:tr><w:tc>\
                   <w:p><w:r><w:t>a &amp; b &#x41;</w:t></w:r></w:p>\
                   </w:tc></w:tr></w:tbl>";
        let table = Table::parse(xml).unwrap();

        assert_eq!(table.text(0, 0), Some("a & b A"));
    }

    #[test]
    fn parse_skips_nested_tables() {
        let xml = "<w:tbl><w:tr><w:tc>\
                   <w:p><w:r><w:t>outer</w:t></w:r></w:p>\
                   <w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
                   </w:tc></w:tr></w:tbl>";
        let table = Table::parse(xml).unwrap();

        assert_eq!(table.rows(), 1);
        assert_eq!(table.cols(), 1);
        assert_eq!(table.text(0, 0), Some("outer"));
    }

    #[test]
    fn parse_pads_short_rows() {
        let xml = format!(
            "<w:tbl><w:tr>{}{}</w:tr><w:tr>{}</w:tr></w:tbl>",
            cell_xml("A"),
            cell_xml("B"),
            cell_xml("C"),
        );
        let table = Table::parse(&xml).unwrap();

        assert_eq!(table.rows(), 2);
        assert_eq!(table.cols(), 2);
        assert_eq!(table.text(1, 1), Some(""));
    }

    #[test]
    fn blank_dimensions() {
        let table = Table::blank(3, 2);

        assert_eq!(table.rows(), 3);
        assert_eq!(table.cols(), 2);
        assert_eq!(table.text(2, 1), Some(""));
        assert_eq!(table.text(3, 0), None);
    }

    #[test]
    fn set_text_ignores_out_of_range() {
        let mut table = Table::blank(1, 1);
        table.set_text(5, 5, "ignored");

        assert_eq!(table.text(0, 0), Some(""));
    }

    #[test]
    fn generated_markup_escapes_text() {
        let mut table = Table::blank(1, 1);
        table.set_text(0, 0, "a < b & c");

        assert!(table.to_xml().contains("a &lt; b &amp; c"));
    }

    #[test]
    fn generated_markup_splits_lines_into_paragraphs() {
        let mut table = Table::blank(1, 1);
        table.set_text(0, 0, "first\nsecond");
        let xml = table.to_xml();

        assert!(xml.contains("<w:p><w:r><w:t xml:space=\"preserve\">first</w:t></w:r></w:p>"));
        assert!(xml.contains("<w:p><w:r><w:t xml:space=\"preserve\">second</w:t></w:r></w:p>"));
    }

    #[test]
    fn grid_borders_are_idempotent() {
        let mut once = Table::blank(2, 2);
        once.apply_grid_borders();
        let mut twice = once.clone();
        twice.apply_grid_borders();

        assert_eq!(once.to_xml(), twice.to_xml());
        assert!(once.to_xml().contains("<w:tblStyle w:val=\"TableGrid\"/>"));
        assert!(once.to_xml().contains("<w:tblBorders>"));
    }

    #[test]
    fn mutation_drops_source_markup() {
        let xml = table_xml(&[&["A"]]);
        let mut table = Table::parse(&xml).unwrap();
        table.set_text(0, 0, "changed");

        assert_ne!(table.to_xml(), xml);
        assert!(table.to_xml().contains("changed"));
    }
}
