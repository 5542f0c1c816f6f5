use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// `dir` with `suffix` appended to its final component (`moodle` -> `moodle_1`).
pub fn with_suffix(dir: &Path, suffix: &str) -> PathBuf {
    let mut s = dir.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Compress the files of `dir` into `{dir}.zip` beside it. Entry names are
/// relative to `dir`. Returns the archive path.
pub fn zip_dir(dir: &Path) -> Result<PathBuf> {
    let archive_path = with_suffix(dir, ".zip");
    let file = File::create(&archive_path)
        .with_context(|| format!("Failed to create archive: {}", archive_path.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry
            .path()
            .strip_prefix(dir)
            .with_context(|| format!("Unexpected entry outside {}", dir.display()))?
            .to_string_lossy()
            .replace('\\', "/");

        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add {} to archive", name))?;
        let mut source = File::open(entry.path())
            .with_context(|| format!("Failed to open {}", entry.path().display()))?;
        std::io::copy(&mut source, &mut zip)
            .with_context(|| format!("Failed to compress {}", entry.path().display()))?;
        log::debug!("Added {} to {}", name, archive_path.display());
    }

    zip.finish()
        .with_context(|| format!("Failed to finish archive: {}", archive_path.display()))?;
    Ok(archive_path)
}
