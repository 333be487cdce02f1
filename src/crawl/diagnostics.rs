// src/crawl/diagnostics.rs
// =============================================================================
// The diagnostic log: a plain text file listing every page that could not be
// parsed, with the URL and the reason.
//
// It is opened when a crawl starts and closed explicitly when the crawl ends,
// so buffered entries are flushed and any write error is reported instead of
// being lost when the value is dropped.
// =============================================================================

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

pub const LOG_FILE: &str = "log.txt";

pub struct DiagnosticLog {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl DiagnosticLog {
    // Creates (or truncates) log.txt inside `dir`
    //
    // Parameters:
    //   dir: the output directory; created if missing
    //
    // Returns: the open log, or the I/O error that stopped it being created
    pub fn open(dir: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE);
        let file = File::create(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    // A failed write is only worth a warning; the crawl goes on
    pub fn record(&self, url: &str, kind: &str, error: &dyn std::error::Error) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{} ({}):\n{}", kind, url, error) {
            warn!(path = %self.path.display(), error = %e, "could not write diagnostic entry");
        }
    }

    pub fn close(self) -> io::Result<()> {
        let mut writer = self.writer.into_inner().unwrap_or_else(PoisonError::into_inner);
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    #[test]
    fn test_entries_flushed_on_close() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::open(dir.path()).unwrap();
        log.record("http://a.ics.uci.edu/empty", "EmptyDocument", &ExtractError::EmptyDocument);
        log.close().unwrap();

        let contents = std::fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert_eq!(
            contents,
            "EmptyDocument (http://a.ics.uci.edu/empty):\ndocument is empty\n"
        );
    }

    #[test]
    fn test_open_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("run1");
        let log = DiagnosticLog::open(&nested).unwrap();
        assert!(nested.join(LOG_FILE).exists());
        log.close().unwrap();
    }
}
