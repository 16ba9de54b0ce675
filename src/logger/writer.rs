//! File writer shared by every event the file layer formats

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::LoggerError;

#[derive(Clone)]
pub struct LogFileWriter {
    file: Arc<Mutex<File>>,
}

impl LogFileWriter {
    /// Opens `path`, creating parent directories as needed.
    pub fn open(path: &Path, append: bool) -> Result<Self, LoggerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileGuard {
            writer: self.clone(),
        }
    }
}

pub struct LogFileGuard {
    writer: LogFileWriter,
}

impl Write for LogFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.lock()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.lock()?.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_reach_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/app.log");
        let writer = LogFileWriter::open(&path, true).unwrap();

        let mut guard = writer.make_writer();
        guard.write_all(b"first line\n").unwrap();
        guard.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first line\n");
    }

    #[test]
    fn test_truncate_mode_discards_old_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "stale\n").unwrap();

        let writer = LogFileWriter::open(&path, false).unwrap();
        writer.make_writer().write_all(b"fresh\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }
}
