use crate::error::LoaderError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum UnifiedReaderError {
    #[error("No data from remote workbook: '{0}'")]
    RemoteFileNoDataError(String),
}

/// Seekable source of workbook bytes, either a local file or a downloaded blob
pub(crate) enum UnifiedReader {
    /// Local file reader
    Local(BufReader<File>),
    /// Remote URL reader (in-memory buffer)
    Remote(Cursor<Vec<u8>>),
}

impl UnifiedReader {
    /// Opens a workbook from either a local path or remote URL.
    /// Remote workbooks are downloaded whole through DuckDB's `read_blob`,
    /// which knows the http, s3 and gs protocols and their credentials.
    pub(crate) fn new(location: &str) -> Result<UnifiedReader, LoaderError> {
        if Self::is_remote_url(location) {
            Self::read_blob_with_duckdb(location)
        } else {
            let file = File::open(Path::new(location))?;
            Ok(UnifiedReader::Local(BufReader::new(file)))
        }
    }

    /// Checks if a location names a remote URL rather than a local path
    pub(crate) fn is_remote_url(location: &str) -> bool {
        if let Ok(url) = Url::parse(location) {
            matches!(url.scheme(), "http" | "https" | "s3" | "gs")
        } else {
            false
        }
    }

    fn read_blob_with_duckdb(location: &str) -> Result<UnifiedReader, LoaderError> {
        let connection = duckdb::Connection::open_in_memory()?;
        let result: Result<Vec<u8>, _> = connection.query_row("SELECT content FROM read_blob(?)", [location], |row| row.get(0));
        connection.close().map_err(|(_, e)| e)?;

        let bytes = result?;
        if bytes.is_empty() {
            Err(UnifiedReaderError::RemoteFileNoDataError(location.to_owned()))?;
        }

        tracing::debug!(location, bytes = bytes.len(), "Downloaded remote workbook");
        Ok(UnifiedReader::Remote(Cursor::new(bytes)))
    }
}

impl Read for UnifiedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            UnifiedReader::Local(reader) => reader.read(buf),
            UnifiedReader::Remote(reader) => reader.read(buf),
        }
    }
}

impl Seek for UnifiedReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            UnifiedReader::Local(reader) => reader.seek(pos),
            UnifiedReader::Remote(reader) => reader.seek(pos),
        }
    }
}
