use crate::error::SheetMapperError;
use crate::options::Source;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::sync::Arc;

/// A unified reader over workbook bytes on disk or already in memory
pub(crate) enum SourceReader {
    /// Local file reader
    Local(BufReader<File>),
    /// In-memory workbook shared with the originating `Source`
    Memory(Cursor<Arc<[u8]>>),
}

impl SourceReader {
    /// Opens the workbook behind a source handle
    ///
    /// # Arguments
    /// * `source` - Path or in-memory bytes of the workbook
    ///
    /// # Returns
    /// * `Result<SourceReader, SheetMapperError>` - Reader positioned at the first byte
    pub(crate) fn new(source: &Source) -> Result<SourceReader, SheetMapperError> {
        match source {
            Source::Path(path) => {
                let file = File::open(path)?;
                Ok(SourceReader::Local(BufReader::new(file)))
            }
            Source::Bytes(bytes) => Ok(SourceReader::Memory(Cursor::new(Arc::clone(bytes)))),
        }
    }
}

impl Read for SourceReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            SourceReader::Local(reader) => reader.read(buf),
            SourceReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for SourceReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            SourceReader::Local(reader) => reader.seek(pos),
            SourceReader::Memory(reader) => reader.seek(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_local_file() {
        let result = SourceReader::new(&Source::from("Cargo.toml"));
        assert!(result.is_ok(), "Failed to open local file: {:?}", result.err());

        let result = SourceReader::new(&Source::from("non_existent_file.xlsx"));
        assert!(result.is_err(), "Should fail to open non-existent file");
    }

    #[test]
    fn test_read_memory_source() {
        let source = Source::from(b"PK\x03\x04".to_vec());
        let mut reader = SourceReader::new(&source).unwrap();
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, b"PK\x03\x04");

        reader.seek(std::io::SeekFrom::Start(2)).unwrap();
        bytes.clear();
        reader.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, b"\x03\x04");
    }
}
