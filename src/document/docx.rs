//! DOCX package access.
//!
//! A `.docx` file is a ZIP archive whose main part is `word/document.xml`.
//! Saving writes a fresh archive: every entry of the source package is copied
//! through unchanged except the document part, which is regenerated from the
//! in-memory [`Document`].

use crate::document::Document;
use crate::document::DocumentError;
use crate::error::TableditError;
use crate::helpers::zip::ZipHelper;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;

/// Archive path of the main document part
const DOCUMENT_PART: &str = "word/document.xml";

/// A DOCX package opened for reading and rewriting
pub struct DocxFile<RS: Read + Seek> {
    /// Display name of the package (file path for on-disk packages)
    name: String,
    /// ZIP archive containing the package parts
    zip: ZipArchive<RS>,
}

impl DocxFile<BufReader<File>> {
    /// Opens a DOCX package from a file path
    ///
    /// # Arguments
    /// * `path` - Path to the `.docx` file
    ///
    /// # Returns
    /// * `Result<Self, TableditError>` - Package handle or an error; a missing
    ///   file is reported as [`DocumentError::FileNotFound`]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TableditError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|error| match error.kind() {
            std::io::ErrorKind::NotFound => {
                TableditError::from(DocumentError::FileNotFound(name.clone()))
            }
            _ => TableditError::from(error),
        })?;
        Self::from_reader(&name, BufReader::new(file))
    }
}

impl<RS: Read + Seek> DocxFile<RS> {
    /// Opens a DOCX package from any seekable byte source
    pub fn from_reader(name: &str, reader: RS) -> Result<Self, TableditError> {
        Ok(DocxFile {
            name: name.to_owned(),
            zip: ZipArchive::new(reader)?,
        })
    }

    /// Display name of the package
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extracts and parses the main document part
    pub fn document(&mut self) -> Result<Document, TableditError> {
        let xml = self.zip.text(DOCUMENT_PART)?
            .ok_or_else(|| DocumentError::MissingPart(DOCUMENT_PART.to_owned()))?;
        let document = Document::parse(&xml)?;
        tracing::debug!(package = %self.name, tables = document.table_count(), "document part parsed");
        Ok(document)
    }

    /// Writes a new package to the given sink, carrying over every entry of
    /// the source archive except the document part, which is regenerated from
    /// `document`
    pub fn save<W: Write + Seek>(
        &mut self,
        document: &Document,
        writer: W,
    ) -> Result<(), TableditError> {
        let mut zip_writer = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for index in 0..self.zip.len() {
            let mut entry = self.zip.by_index(index)?;
            let entry_name = entry.name().to_owned();
            if entry_name.eq_ignore_ascii_case(DOCUMENT_PART) {
                continue;
            }
            let mut content = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut content)?;
            zip_writer.start_file(entry_name, options)?;
            zip_writer.write_all(&content)?;
        }
        zip_writer.start_file(DOCUMENT_PART, options)?;
        zip_writer.write_all(document.to_xml().as_bytes())?;
        zip_writer.finish()?;
        Ok(())
    }

    /// Writes a new package to a file path
    pub fn save_as(
        &mut self,
        document: &Document,
        path: impl AsRef<Path>,
    ) -> Result<(), TableditError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.save(document, BufWriter::new(file))?;
        tracing::info!(package = %path.display(), "document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Table;
    use std::io::Cursor;

    const DOCUMENT_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
        <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
        <w:body>\
        <w:tbl><w:tr>\
        <w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc>\
        <w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc>\
        </w:tr></w:tbl>\
        </w:body></w:document>";

    const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
        <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"/>";

    /// Builds a minimal in-memory package around the given document part
    fn build_package(document_xml: &str) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(CONTENT_TYPES.as_bytes()).unwrap();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn document_parses_package_part() {
        let mut docx = DocxFile::from_reader("test.docx", build_package(DOCUMENT_XML)).unwrap();
        let document = docx.document().unwrap();

        assert_eq!(document.table_count(), 1);
    }

    #[test]
    fn missing_document_part_is_an_error() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("[Content_Types].xml", SimpleFileOptions::default()).unwrap();
        writer.write_all(CONTENT_TYPES.as_bytes()).unwrap();
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);

        let mut docx = DocxFile::from_reader("test.docx", cursor).unwrap();
        assert!(matches!(
            docx.document(),
            Err(TableditError::DocumentError(DocumentError::MissingPart(_)))
        ));
    }

    #[test]
    fn save_carries_other_entries_and_rewrites_document() {
        let mut docx = DocxFile::from_reader("test.docx", build_package(DOCUMENT_XML)).unwrap();
        let mut document = docx.document().unwrap();
        let mut table = Table::blank(1, 1);
        table.set_text(0, 0, "rebuilt");
        document.replace_table_at(0, table).unwrap();

        let mut output = Cursor::new(Vec::new());
        docx.save(&document, &mut output).unwrap();
        output.set_position(0);

        let mut saved = DocxFile::from_reader("saved.docx", output).unwrap();
        assert!(saved.zip.text("[Content_Types].xml").unwrap().unwrap().contains("content-types"));
        let reread = saved.document().unwrap();
        assert_eq!(reread.table_count(), 1);
        assert_eq!(reread.table_at(0).unwrap().text(0, 0), Some("rebuilt"));
    }
}
