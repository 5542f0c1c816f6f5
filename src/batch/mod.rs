//! Size-capped batches of renamed submissions, each compressed into a zip
//! archive once full.
//!
//! Files are placed greedily in input order: a file that would push the
//! current batch past the capacity closes that batch and starts the next
//! one, so a batch only ever exceeds the cap when a single file is larger
//! than the cap on its own.

pub mod archive;

use crate::roster::RosterRow;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const MB: u64 = 1024 * 1024;
pub const DEFAULT_MAX_BATCH_MB: u64 = 100;

/// Name the submission platform expects for an uploaded file.
pub fn submission_file_name(row: &RosterRow, original: &str) -> String {
    format!(
        "{}_{}_assignsubmission_file_{}",
        row.display_name, row.identifier, original
    )
}

/// The batch directory currently receiving files.
#[derive(Debug)]
pub struct Batch {
    pub number: u32,
    pub dir: PathBuf,
    pub bytes: u64,
    pub files: usize,
}

impl Batch {
    fn open(base: &Path, number: u32) -> Result<Self> {
        let dir = archive::with_suffix(base, &format!("_{}", number));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        Ok(Batch {
            number,
            dir,
            bytes: 0,
            files: 0,
        })
    }

    fn compress(&self) -> Result<FinishedBatch> {
        Ok(FinishedBatch {
            number: self.number,
            archive: archive::zip_dir(&self.dir)?,
            bytes: self.bytes,
            files: self.files,
        })
    }
}

/// A compressed batch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FinishedBatch {
    pub number: u32,
    pub archive: PathBuf,
    pub bytes: u64,
    pub files: usize,
}

/// Copies files into `{base}_{n}` directories, rolling over to a new one
/// when the next file would exceed `capacity` bytes.
pub struct BatchPacker {
    base: PathBuf,
    capacity: u64,
    current: Batch,
    finished: Vec<FinishedBatch>,
}

impl BatchPacker {
    /// Start packing; the first batch directory is created right away.
    pub fn new<P: AsRef<Path>>(base: P, capacity: u64) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        let current = Batch::open(&base, 1)?;
        Ok(BatchPacker {
            base,
            capacity,
            current,
            finished: Vec::new(),
        })
    }

    pub fn current(&self) -> &Batch {
        &self.current
    }

    /// Copy `source` into the current batch as `dest_name`, closing the
    /// batch first if the file does not fit. Returns the destination path.
    pub fn add(&mut self, source: &Path, dest_name: &str) -> Result<PathBuf> {
        let size = std::fs::metadata(source)
            .with_context(|| format!("Failed to read metadata: {}", source.display()))?
            .len();

        if self.current.files > 0 && self.current.bytes + size > self.capacity {
            log::info!(
                "Batch {} full (~{:.1}MB). Zipping...",
                self.current.number,
                self.current.bytes as f64 / 1e6
            );
            let next = Batch::open(&self.base, self.current.number + 1)?;
            let full = std::mem::replace(&mut self.current, next);
            self.finished.push(full.compress()?);
        }

        let dest = self.current.dir.join(dest_name);
        std::fs::copy(source, &dest).with_context(|| {
            format!("Failed to copy {} to {}", source.display(), dest.display())
        })?;
        self.current.bytes += size;
        self.current.files += 1;
        Ok(dest)
    }

    /// Compress the last batch if it holds anything and return every archive
    /// written, in order.
    pub fn finish(mut self) -> Result<Vec<FinishedBatch>> {
        if self.current.files > 0 {
            log::info!("Finalizing last batch ({})...", self.current.number);
            self.finished.push(self.current.compress()?);
        }
        Ok(self.finished)
    }
}
