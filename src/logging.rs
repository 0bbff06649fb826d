//! Tracing setup
//!
//! stderr gets the usual ANSI output; when a log directory is given, a second
//! plain-text layer appends to `arxiv-digest-<date>.log` there so CI can
//! upload it on failure. The file follows the local date, so a long-lived
//! `schedule` process starts a new file each day.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{DigestError, Result};

/// `arxiv-digest-<YYYY-MM-DD>.log`
pub fn log_file_name(date: NaiveDate) -> String {
    format!("arxiv-digest-{}.log", date)
}

/// Full path of the run log inside `dir`
pub fn log_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(log_file_name(date))
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Position in the run log where a run started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMark {
    pub path: PathBuf,
    pub offset: u64,
}

struct DailyLogState {
    date: NaiveDate,
    file: File,
}

/// Run log that rolls over to a new dated file when the local date changes
#[derive(Clone)]
pub struct DailyLog {
    dir: PathBuf,
    state: Arc<Mutex<DailyLogState>>,
}

impl DailyLog {
    /// Open today's log in `dir`, creating the directory if needed
    pub fn open(dir: &Path) -> Result<Self> {
        Self::open_on(dir, Local::now().date_naive())
    }

    pub fn open_on(dir: &Path, date: NaiveDate) -> Result<Self> {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
        let file = open_append(&log_file_path(dir, date))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            state: Arc::new(Mutex::new(DailyLogState { date, file })),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        log_file_path(&self.dir, self.lock().date)
    }

    /// Mark the end of today's log; a run's output starts here
    pub fn mark(&self) -> Result<LogMark> {
        self.mark_on(Local::now().date_naive())
    }

    pub fn mark_on(&self, date: NaiveDate) -> Result<LogMark> {
        let mut state = self.lock();
        self.roll(&mut state, date)?;
        state.file.flush()?;
        Ok(LogMark {
            path: log_file_path(&self.dir, date),
            offset: state.file.metadata()?.len(),
        })
    }

    fn write_on(&self, date: NaiveDate, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.lock();
        self.roll(&mut state, date)?;
        state.file.write(buf)
    }

    fn roll(&self, state: &mut DailyLogState, date: NaiveDate) -> io::Result<()> {
        if state.date != date {
            state.file = open_append(&log_file_path(&self.dir, date))?;
            state.date = date;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, DailyLogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Writer handed out per event by [`DailyLog`]
pub struct DailyLogWriter<'a> {
    log: &'a DailyLog,
}

impl Write for DailyLogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.log.write_on(Local::now().date_naive(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.log.lock().file.flush()
    }
}

impl<'a> MakeWriter<'a> for DailyLog {
    type Writer = DailyLogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        DailyLogWriter { log: self }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// Returns the run log handle when `log_dir` is given.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<Option<DailyLog>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let daily = log_dir.map(DailyLog::open).transpose()?;
    let file_layer = daily.clone().map(|log| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(log)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| DigestError::ConfigError {
            reason: format!("Failed to initialize logging: {}", e),
        })?;

    Ok(daily)
}
