//! # JSONL Channel Recorder
//!
//! Writes one JSON object per tick:
//!
//! ```text
//! {"timestamp":"2026-10-16T10:15:00.123+00:00","seq":1,"mode":"keyboard_process","channels":[1600,1500,1000,1000,1000,1000,1500,1500]}
//! ```
//!
//! Files are named `channels_<start time>_<sequence>.jsonl`. A new file is
//! started after `max_records_per_file` records, and only the newest
//! `max_files_to_keep` files are kept in the directory. Existing files are
//! never reopened: a recorder started in the same millisecond as an earlier
//! one on the same directory skips ahead to the next free sequence number.

use chrono::Utc;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::TelemetryConfig;
use crate::display::ChannelSink;
use crate::error::Result;
use crate::mixer::protocol::NUM_CHANNELS;
use crate::mixer::{ChannelVector, ProcessMode};

const FILE_PREFIX: &str = "channels_";
const FILE_EXTENSION: &str = "jsonl";

/// One recorded tick
#[derive(Debug, Serialize)]
pub struct ChannelRecord<'a> {
    pub timestamp: String,
    pub seq: u64,
    pub mode: &'a str,
    pub channels: [u16; NUM_CHANNELS],
}

/// Rotating JSONL writer for channel vectors
#[derive(Debug)]
pub struct JsonlRecorder {
    dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    session: String,
    writer: Option<BufWriter<File>>,
    file_index: u32,
    records_in_file: usize,
    seq: u64,
}

impl JsonlRecorder {
    /// Creates the recorder, creating `dir` if needed. No file is opened
    /// until the first record.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory cannot be created
    pub fn new<P: AsRef<Path>>(dir: P, max_records_per_file: usize, max_files_to_keep: usize) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            max_records_per_file: max_records_per_file.max(1),
            max_files_to_keep: max_files_to_keep.max(1),
            session: Utc::now().format("%Y%m%dT%H%M%S%3f").to_string(),
            writer: None,
            file_index: 0,
            records_in_file: 0,
            seq: 0,
        })
    }

    /// Creates the recorder from the `[telemetry]` section
    ///
    /// # Errors
    ///
    /// Returns `Io` if the log directory cannot be created
    pub fn from_config(config: &TelemetryConfig) -> Result<Self> {
        Self::new(&config.log_dir, config.max_records_per_file, config.max_files_to_keep)
    }

    /// Appends one record, rotating files as needed
    ///
    /// # Errors
    ///
    /// Returns `Io` or `Telemetry` on write or serialization failure
    pub fn record(&mut self, mode: ProcessMode, channels: &ChannelVector) -> Result<()> {
        if self.writer.is_none() || self.records_in_file >= self.max_records_per_file {
            self.rotate()?;
        }

        self.seq += 1;
        let record = ChannelRecord {
            timestamp: Utc::now().to_rfc3339(),
            seq: self.seq,
            mode: mode.name(),
            channels: *channels.as_array(),
        };

        if let Some(writer) = self.writer.as_mut() {
            serde_json::to_writer(&mut *writer, &record)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        self.records_in_file += 1;
        Ok(())
    }

    /// Number of records written
    #[must_use]
    pub fn records_written(&self) -> u64 {
        self.seq
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }

        let (path, file) = self.create_next_file()?;
        info!("Recording channels to {}", path.display());

        self.writer = Some(BufWriter::new(file));
        self.records_in_file = 0;
        self.prune()
    }

    fn create_next_file(&mut self) -> Result<(PathBuf, File)> {
        loop {
            self.file_index += 1;
            let path = self.dir.join(format!(
                "{}{}_{:06}.{}",
                FILE_PREFIX, self.session, self.file_index, FILE_EXTENSION
            ));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!("{} already exists, trying next sequence", path.display());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Deletes the oldest record files beyond `max_files_to_keep`
    fn prune(&self) -> Result<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_record_file(path))
            .collect();

        if files.len() <= self.max_files_to_keep {
            return Ok(());
        }

        // Names embed start time and sequence, so lexical order is age order
        files.sort();
        let excess = files.len() - self.max_files_to_keep;
        for path in files.into_iter().take(excess) {
            debug!("Removing old channel record {}", path.display());
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

fn is_record_file(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(FILE_PREFIX));
    let ext_ok = path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION);
    name_ok && ext_ok
}

impl ChannelSink for JsonlRecorder {
    fn publish(&mut self, mode: ProcessMode, channels: &ChannelVector) -> Result<()> {
        self.record(mode, channels)
    }
}
