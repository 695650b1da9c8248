//! ZIP archive helper utilities for the DOCX package format
//! Provides convenient methods for accessing parts within ZIP archives

use crate::error::TableditError;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

/// Helper trait for ZIP archive operations on document packages
pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Gets a file from the ZIP archive by name (case-insensitive, path separator agnostic)
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, TableditError>;

    /// Reads a file within the ZIP archive into a UTF-8 string
    fn text(&mut self, name: &str) -> Result<Option<String>, TableditError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    /// Gets a file from the ZIP archive by name with case-insensitive matching
    /// and path separator normalization (backslash to forward slash)
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, TableditError> {
        let pattern = name.replace('\\', "/");
        let path = self.file_names()
            .find(|file_name| pattern.eq_ignore_ascii_case(*file_name))
            .map(|file_name| file_name.to_owned());
        match path.map(|file_name| self.by_name(&file_name)).transpose() {
            Ok(Some(file)) => Ok(Some(file)),
            Ok(None) | Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }

    /// Reads a file within the ZIP archive into a UTF-8 string
    fn text(&mut self, name: &str) -> Result<Option<String>, TableditError> {
        let mut content = String::new();
        match self.file(name)? {
            Some(mut file) => {
                file.read_to_string(&mut content)?;
                Ok(Some(content))
            }
            None => Ok(None),
        }
    }
}
