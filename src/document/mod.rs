//! # Document Module
//!
//! In-memory model of the main document part (`word/document.xml`) of a DOCX
//! package. The body is kept as an ordered sequence of blocks; tables are
//! parsed into editable grids while every other block is preserved verbatim,
//! so untouched content round-trips byte-for-byte.

pub mod docx;
pub mod table;

use crate::error::TableditError;
use crate::helpers::xml::XmlReader;
use crate::match_xml_events;
use quick_xml::events::Event;
use quick_xml::name::QName;
use thiserror::Error;

pub use table::Cell;
pub use table::Table;

/// XML element name for the document body
const TAG_BODY: QName = QName(b"w:body");
/// XML element name for a table
const TAG_TABLE: QName = QName(b"w:tbl");

/// Errors specific to document parsing and mutation
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Input file does not exist
    #[error("Input file not found: '{0}'")]
    FileNotFound(String),

    /// A required package part is missing from the archive
    #[error("Missing '{0}' part in the document package")]
    MissingPart(String),

    /// The document part has no (or an unterminated) `<w:body>` element
    #[error("Missing or unterminated <w:body> element in the document part")]
    MissingBody,

    /// The body block at the given index is not a table
    #[error("Original table not found at body block {0}")]
    TableNotFound(usize),
}

/// A top-level content block of the document body
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// A table, parsed into an editable grid
    Table(Table),
    /// Any other body content (paragraphs, bookmarks, section breaks),
    /// preserved byte-for-byte
    Raw(String),
}

/// The main document part: an ordered body sequence framed by the markup
/// around it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Markup up to and including the `<w:body>` open tag
    prolog: String,
    /// Body blocks in document order
    blocks: Vec<Block>,
    /// Markup from `</w:body>` to the end of the part
    epilog: String,
}

/// Classification of a scanned body-level event, captured as owned data so
/// the reader can advance while the event is handled
enum Scan {
    /// Start of a container element with the given qualified name
    Element(Vec<u8>),
    /// A self-contained event (empty element, text, comment)
    Leaf,
    /// The body close tag
    BodyEnd,
}

impl Document {
    /// Parses the content of `word/document.xml` into a document model
    ///
    /// Walks the body children once, tracking byte offsets: `<w:tbl>` elements
    /// are parsed into [`Table`] grids, everything else is captured as a raw
    /// slice of the source text.
    ///
    /// # Arguments
    /// * `xml` - Complete text of the document part
    ///
    /// # Returns
    /// * `Result<Document, TableditError>` - Parsed document or an error
    pub fn parse(xml: &str) -> Result<Document, TableditError> {
        let mut reader = XmlReader::scanner(xml.as_bytes());

        let mut prolog_end = None::<usize>;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_BODY => {
                prolog_end = Some(reader.position());
                break;
            }
        });
        let prolog_end = prolog_end.ok_or(DocumentError::MissingBody)?;

        let mut blocks = Vec::<Block>::new();
        let mut epilog_start = None::<usize>;
        loop {
            let start = reader.position();
            let scan = match reader.next()? {
                None => break,
                Some(Event::Start(event)) => Scan::Element(event.name().as_ref().to_vec()),
                Some(Event::End(_)) => Scan::BodyEnd,
                Some(_) => Scan::Leaf,
            };
            match scan {
                Scan::Element(name) => {
                    reader.skip_to_end(QName(&name))?;
                    let slice = &xml[start..reader.position()];
                    if name == TAG_TABLE.as_ref() {
                        blocks.push(Block::Table(Table::parse(slice)?));
                    } else {
                        blocks.push(Block::Raw(slice.to_owned()));
                    }
                }
                Scan::Leaf => blocks.push(Block::Raw(xml[start..reader.position()].to_owned())),
                Scan::BodyEnd => {
                    epilog_start = Some(start);
                    break;
                }
            }
        }
        let epilog_start = epilog_start.ok_or(DocumentError::MissingBody)?;

        Ok(Document {
            prolog: xml[..prolog_end].to_owned(),
            blocks,
            epilog: xml[epilog_start..].to_owned(),
        })
    }

    /// Serializes the document back to the text of `word/document.xml`
    pub fn to_xml(&self) -> String {
        let blocks_len: usize = self.blocks.iter()
            .map(|block| match block {
                Block::Raw(raw) => raw.len(),
                Block::Table(_) => 0,
            })
            .sum();
        let mut xml = String::with_capacity(self.prolog.len() + blocks_len + self.epilog.len());
        xml.push_str(&self.prolog);
        for block in &self.blocks {
            match block {
                Block::Table(table) => xml.push_str(&table.to_xml()),
                Block::Raw(raw) => xml.push_str(raw),
            }
        }
        xml.push_str(&self.epilog);
        xml
    }

    /// Iterates over the tables of the body with their block indexes
    pub fn tables(&self) -> impl Iterator<Item = (usize, &Table)> {
        self.blocks.iter().enumerate().filter_map(|(index, block)| match block {
            Block::Table(table) => Some((index, table)),
            Block::Raw(_) => None,
        })
    }

    /// Number of tables in the body
    pub fn table_count(&self) -> usize {
        self.tables().count()
    }

    /// Gets the table at the given body block index, if that block is a table
    pub fn table_at(&self, index: usize) -> Option<&Table> {
        match self.blocks.get(index) {
            Some(Block::Table(table)) => Some(table),
            _ => None,
        }
    }

    /// Replaces the table at the given body block index with a new table.
    /// The old table leaves the body atomically; no transitional state with
    /// both tables exists.
    ///
    /// # Errors
    /// [`DocumentError::TableNotFound`] if the block at `index` is not a table.
    pub fn replace_table_at(&mut self, index: usize, table: Table) -> Result<(), DocumentError> {
        match self.blocks.get_mut(index) {
            Some(block @ Block::Table(_)) => {
                *block = Block::Table(table);
                Ok(())
            }
            _ => Err(DocumentError::TableNotFound(index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
        <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
        <w:body>\
        <w:p><w:r><w:t>Intro paragraph</w:t></w:r></w:p>\
        <w:tbl><w:tr>\
        <w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc>\
        <w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc>\
        </w:tr></w:tbl>\
        <w:p/>\
        <w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/></w:sectPr>\
        </w:body></w:document>";

    #[test]
    fn parse_splits_body_blocks() {
        let document = Document::parse(DOCUMENT).unwrap();

        assert_eq!(document.blocks.len(), 4);
        assert_eq!(document.table_count(), 1);
        let (index, table) = document.tables().next().unwrap();
        assert_eq!(index, 1);
        assert_eq!(table.rows(), 1);
        assert_eq!(table.cols(), 2);
        assert_eq!(table.text(0, 0), Some("A"));
    }

    #[test]
    fn parse_round_trips_verbatim() {
        let document = Document::parse(DOCUMENT).unwrap();

        assert_eq!(document.to_xml(), DOCUMENT);
    }

    #[test]
    fn parse_rejects_missing_body() {
        let result = Document::parse("<w:document></w:document>");

        assert!(matches!(
            result,
            Err(TableditError::DocumentError(DocumentError::MissingBody))
        ));
    }

    #[test]
    fn replace_table_swaps_block_in_place() {
        let mut document = Document::parse(DOCUMENT).unwrap();
        let mut table = Table::blank(1, 1);
        table.set_text(0, 0, "replaced");
        document.replace_table_at(1, table).unwrap();

        assert_eq!(document.table_count(), 1);
        assert_eq!(document.table_at(1).unwrap().text(0, 0), Some("replaced"));
        let xml = document.to_xml();
        assert!(xml.contains("replaced"));
        assert!(xml.contains("Intro paragraph")); // surrounding blocks untouched
        assert!(!xml.contains(">A<"));
    }

    #[test]
    fn replace_table_rejects_non_table_block() {
        let mut document = Document::parse(DOCUMENT).unwrap();
        let result = document.replace_table_at(0, Table::blank(1, 1));

        assert!(matches!(result, Err(DocumentError::TableNotFound(0))));
    }

    #[test]
    fn table_at_is_none_for_raw_blocks() {
        let document = Document::parse(DOCUMENT).unwrap();

        assert!(document.table_at(0).is_none());
        assert!(document.table_at(1).is_some());
        assert!(document.table_at(9).is_none());
    }
}
