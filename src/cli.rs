use crate::batch::DEFAULT_MAX_BATCH_MB;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "exampack")]
#[command(about = "Prepare scanned exams for grading and package graded copies for upload")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split A3 scans into A4 pages and name them after the class list
    #[command(alias = "prep")]
    Prepare {
        /// CSV class list (`number;NAME Firstname;...`)
        #[arg(short, long)]
        group: PathBuf,

        /// Folder containing the source PDF scans
        #[arg(short, long, default_value = "scans")]
        source: PathBuf,

        /// Folder where prepared PDFs are saved
        #[arg(short, long, default_value = "ready_to_grade")]
        dest: PathBuf,

        /// Last names to exclude (e.g. `-e dupont richard`)
        #[arg(short, long, num_args = 0..)]
        exclude: Vec<String>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename graded files for upload and pack them into size-capped zips
    #[command(alias = "moodle")]
    Pack {
        /// Folder containing the graded files
        #[arg(short, long, default_value = "marked")]
        source: PathBuf,

        /// Base name of the batch folders (`{dest}_1`, `{dest}_2`, ...)
        #[arg(short, long, default_value = "moodle")]
        dest: PathBuf,

        /// CSV export with student names and identifiers
        #[arg(short = 'f', long = "file")]
        roster: PathBuf,

        /// CSV delimiter (e.g. ',' or ';'), detected when omitted
        #[arg(short = 't', long)]
        delimiter: Option<String>,

        /// Maximum size of one batch in MB
        #[arg(short, long, default_value_t = DEFAULT_MAX_BATCH_MB)]
        max_batch_mb: u64,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Split a single A3 landscape scan into A4 portrait pages
    Split {
        /// PDF scan to split
        path: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}
