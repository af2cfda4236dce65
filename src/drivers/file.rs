//! File driver implementation

use crate::core::format::text_record;
use crate::core::{ChannelConfig, Driver, Entry, FileConfig, LoggerError, Result, TimestampFormat};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends text records to a single file.
///
/// Each record is written with one `write_all` under the driver's lock, so
/// records from concurrent callers never interleave.
pub struct FileDriver {
    file: Mutex<Option<File>>,
    path: PathBuf,
    timestamp_format: TimestampFormat,
}

impl FileDriver {
    /// Open `path` for appending with default settings
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(&FileConfig::new(path))
    }

    /// Build from a channel definition; the `file` section is required
    pub fn from_config(config: &ChannelConfig) -> Result<Self> {
        let settings = config
            .file
            .as_ref()
            .ok_or_else(|| LoggerError::config("file driver", "file configuration is required"))?;
        Self::with_config(settings)
    }

    pub fn with_config(config: &FileConfig) -> Result<Self> {
        let timestamp_format = TimestampFormat::from_pattern(&config.date_format);
        if !timestamp_format.is_valid() {
            return Err(LoggerError::config(
                "file driver",
                format!("invalid date format {:?}", config.date_format),
            ));
        }

        let path = if config.path.as_os_str().is_empty() {
            FileConfig::default().path
        } else {
            config.path.clone()
        };

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    format!("cannot create {}", dir.display()),
                    e,
                )
            })?;
        }

        let file = open_append(&path, config.mode()?).map_err(|e| {
            LoggerError::io_operation(
                "opening log file",
                format!("cannot open {}", path.display()),
                e,
            )
        })?;

        Ok(Self {
            file: Mutex::new(Some(file)),
            path,
            timestamp_format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.file.lock().is_none()
    }
}

#[cfg(unix)]
fn open_append(path: &Path, mode: Option<u32>) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    if let Some(mode) = mode {
        options.mode(mode);
    }
    options.open(path)
}

#[cfg(not(unix))]
fn open_append(path: &Path, _mode: Option<u32>) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Driver for FileDriver {
    fn log(&self, entry: &Entry) -> Result<()> {
        let record = text_record(entry, &self.timestamp_format);

        let mut guard = self.file.lock();
        let file = guard
            .as_mut()
            .ok_or_else(|| LoggerError::driver_closed(self.name()))?;

        file.write_all(record.as_bytes()).map_err(|e| {
            LoggerError::io_operation(
                "writing log record",
                format!("cannot write to {}", self.path.display()),
                e,
            )
        })
    }

    fn close(&self) -> Result<()> {
        // Dropping the handle closes it; a second close finds nothing to do.
        if let Some(file) = self.file.lock().take() {
            file.sync_all()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn flush(&self) -> Result<()> {
        if let Some(ref file) = *self.file.lock() {
            file.sync_all()?;
        }
        Ok(())
    }
}
