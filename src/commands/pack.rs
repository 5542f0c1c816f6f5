use crate::batch::{submission_file_name, BatchPacker, FinishedBatch, MB};
use crate::error::soft_fail;
use crate::files::FileIndex;
use crate::roster::{DelimiterSource, Roster};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

pub struct PackOptions {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub roster: PathBuf,
    pub delimiter: Option<String>,
    pub max_batch_mb: u64,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct PackReport {
    pub files_processed: usize,
    pub batches: Vec<FinishedBatch>,
    pub missing: Vec<String>,
}

pub fn run(options: &PackOptions) -> Result<()> {
    let Some(report) = soft_fail(pack(options))? else {
        return Ok(());
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "-".repeat(35));
        println!("SUCCESS: {} files processed.", report.files_processed);
        println!("OUTPUT: {} zip file(s) created.", report.batches.len());
        for batch in &report.batches {
            println!(
                "  {} ({} files, {:.1}MB)",
                batch.archive.display(),
                batch.files,
                batch.bytes as f64 / 1e6
            );
        }
    }
    Ok(())
}

/// Rename every roster student's file into size-capped batches and zip them.
pub fn pack(options: &PackOptions) -> Result<PackReport> {
    let files = FileIndex::scan(&options.source)?;
    let (roster, source) = Roster::load(&options.roster, options.delimiter.as_deref())?;
    if source == DelimiterSource::Detected {
        log::info!(
            "Auto-detected CSV delimiter: '{}'",
            char::from(roster.delimiter)
        );
    }
    log::debug!("Roster columns: {}", roster.headers.join(", "));

    let mut packer = BatchPacker::new(&options.dest, options.max_batch_mb.saturating_mul(MB))?;
    log::info!("Initial batch folder: {}", packer.current().dir.display());

    let mut files_processed = 0;
    let mut missing = Vec::new();
    for row in &roster.rows {
        let Some(original) = files.find_prefix(&row.surname()) else {
            log::warn!("[MISSING] No local file found for student: {}", row.display_name);
            missing.push(row.display_name.clone());
            continue;
        };

        let dest_name = submission_file_name(row, original);
        let dest = packer.add(&files.path_of(original), &dest_name)?;
        log::debug!("{} -> {}", original, dest.display());
        files_processed += 1;
    }

    Ok(PackReport {
        files_processed,
        batches: packer.finish()?,
        missing,
    })
}
