use std::io::{Cursor, Read};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::application::ports::FileLoaderError;

/// An Office Open XML package held in memory.
pub struct OoxmlPackage {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl OoxmlPackage {
    pub fn open(data: Vec<u8>) -> Result<Self, FileLoaderError> {
        let archive = ZipArchive::new(Cursor::new(data)).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("not a valid Office document: {e}"))
        })?;
        Ok(Self { archive })
    }

    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Reads a part as UTF-8. A missing part is `Ok(None)`.
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>, FileLoaderError> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(FileLoaderError::ExtractionFailed(format!(
                    "failed to open {name}: {e}"
                )));
            }
        };

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to read {name}: {e}")))?;
        Ok(Some(xml))
    }

    pub fn require_part(&mut self, name: &str) -> Result<String, FileLoaderError> {
        self.read_part(name)?
            .ok_or_else(|| FileLoaderError::ExtractionFailed(format!("missing part {name}")))
    }
}
