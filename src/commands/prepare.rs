use crate::error::soft_fail;
use crate::files::FileIndex;
use crate::pdf::booklet::{split_booklet, SplitOutcome};
use crate::roster::{self, names::strip_accents};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

pub struct PrepareOptions {
    pub roster: PathBuf,
    pub source: PathBuf,
    pub dest: PathBuf,
    pub exclude: Vec<String>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct PreparedExam {
    pub scan: String,
    pub output: PathBuf,
    #[serde(flatten)]
    pub outcome: SplitOutcome,
}

#[derive(Debug, Default, Serialize)]
pub struct PrepareReport {
    pub prepared: Vec<PreparedExam>,
    pub excluded: Vec<String>,
    /// Students left without a scan once the scans ran out.
    pub missing: Vec<String>,
    /// Roster lines with no name field.
    pub invalid_lines: Vec<usize>,
}

pub fn run(options: &PrepareOptions) -> Result<()> {
    let Some(report) = soft_fail(prepare(options))? else {
        return Ok(());
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let split = report.prepared.iter().filter(|p| p.outcome.is_split()).count();
        println!(
            "Prepared {} exam(s) into {} ({} split, {} copied, {} excluded)",
            report.prepared.len(),
            options.dest.display(),
            split,
            report.prepared.len() - split,
            report.excluded.len()
        );
        if !report.missing.is_empty() {
            println!("No scan left for: {}", report.missing.join(", "));
        }
    }
    Ok(())
}

/// Assign sorted scans to roster students in order, splitting A3 scans into
/// A4 pages and copying the others, as `surname.firstname.pdf`.
pub fn prepare(options: &PrepareOptions) -> Result<PrepareReport> {
    let rows = roster::load_positional(&options.roster)?;
    let scans = FileIndex::scan(&options.source)?;

    if !options.dest.exists() {
        std::fs::create_dir_all(&options.dest).with_context(|| {
            format!("Failed to create directory: {}", options.dest.display())
        })?;
        log::info!("Created destination directory: {}", options.dest.display());
    }

    let exclude: Vec<String> = options
        .exclude
        .iter()
        .map(|name| strip_accents(&name.to_lowercase()))
        .collect();

    let mut report = PrepareReport::default();
    let mut remaining = scans.names().iter();
    for row in rows {
        let Some(name) = row.name else {
            log::warn!("Roster line {} has no name field, skipping", row.line);
            report.invalid_lines.push(row.line);
            continue;
        };
        let label = format!("{}, {}", name.surname, name.first_name);

        if exclude.iter().any(|e| e.contains(&name.surname)) {
            log::info!("  skipping: {}", label);
            report.excluded.push(label);
            continue;
        }

        let Some(scan) = remaining.next() else {
            log::warn!("No scan left for: {}", label);
            report.missing.push(label);
            continue;
        };

        log::info!("Working on: {}", label);
        let input = scans.path_of(scan);
        let output = options.dest.join(name.file_name());
        let outcome = split_booklet(&input, &output)?;
        if !outcome.is_split() {
            std::fs::copy(&input, &output).with_context(|| {
                format!("Failed to copy {} to {}", input.display(), output.display())
            })?;
        }
        report.prepared.push(PreparedExam {
            scan: scan.clone(),
            output,
            outcome,
        });
    }

    let unused = remaining.len();
    if unused > 0 {
        log::warn!("{} of {} scan(s) were not assigned", unused, scans.len());
    }
    Ok(report)
}
