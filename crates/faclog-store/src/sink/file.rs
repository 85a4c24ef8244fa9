//! Daily log file sink
//!
//! One file per calendar day, `<dir>/log-YYYY-MM-DD.<ext>`. Rollover is a side
//! effect of the name; nothing ever renames or truncates a file.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use chrono::NaiveDate;
use faclog_core::{LogConfig, LogEvent, LogSink};
use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Permissions applied after each append: owner read/write, world readable
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Appends one formatted line per event to the day's log file
pub struct FileSink {
    dir: PathBuf,
    extension: String,
    date_format: String,
    header: Option<String>,
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(
        dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        date_format: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            date_format: date_format.into(),
            header: None,
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &LogConfig) -> Self {
        let sink = Self::new(
            &config.log_path,
            &config.file_extension,
            &config.date_format,
        );
        match &config.file_header {
            Some(header) => sink.with_header(header),
            None => sink,
        }
    }

    /// Preamble written once, when a day's file is first created
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that receives events stamped on `date`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "log-{}.{}",
            date.format("%Y-%m-%d"),
            self.extension
        ))
    }

    /// `<timestamp> <L>/<facility>[/<tag>]: <message>\n`
    ///
    /// Line breaks in the facility, tag and message are escaped so every event
    /// stays on a single line.
    pub fn format_line(&self, event: &LogEvent) -> String {
        let mut line = String::new();
        if write!(line, "{}", event.timestamp.format(&self.date_format)).is_err() {
            line.clear();
            line.push_str(&event.timestamp.to_rfc3339());
        }
        line.push(' ');
        line.push(event.level.initial());
        line.push('/');
        line.push_str(&escape_line_breaks(&event.facility));
        if let Some(tag) = &event.tag {
            line.push('/');
            line.push_str(&escape_line_breaks(tag));
        }
        line.push_str(": ");
        line.push_str(&escape_line_breaks(&event.message));
        line.push('\n');
        line
    }

    /// Header (for a still empty file) and line go out in one `write_all`
    fn append_locked(&self, file: &mut File, line: &str) -> Result<()> {
        let empty = file
            .metadata()
            .map_err(|e| io_error("stat_log_file", e))?
            .len()
            == 0;

        let mut buffer = String::with_capacity(line.len());
        if let Some(header) = self.header.as_deref().filter(|_| empty) {
            buffer.push_str(header.trim_end_matches('\n'));
            buffer.push_str("\n\n");
        }
        buffer.push_str(line);

        file.write_all(buffer.as_bytes())
            .map_err(|e| io_error("append_log_line", e))
    }
}

fn escape_line_breaks(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}

impl LogSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn write(&self, event: &LogEvent) -> Result<()> {
        let path = self.path_for(event.timestamp.date_naive());
        let line = self.format_line(event);

        // Held for the append only; a panicked writer leaves nothing to repair
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        fs::create_dir_all(&self.dir).map_err(|e| io_error("create_log_dir", e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error("open_log_file", e))?;

        // The mutex covers this process; the OS lock covers other writers
        file.lock().map_err(|e| io_error("lock_log_file", e))?;
        let appended = self.append_locked(&mut file, &line);
        let released = file.unlock().map_err(|e| io_error("unlock_log_file", e));
        drop(file);
        appended?;
        released?;

        set_permissions(&path);
        Ok(())
    }
}

#[cfg(unix)]
fn set_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(FILE_MODE));
}

#[cfg(not(unix))]
fn set_permissions(_path: &Path) {}
