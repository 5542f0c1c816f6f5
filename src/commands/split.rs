use crate::pdf::booklet::{split_booklet, SplitOutcome};
use anyhow::{Context, Result};
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    match split_booklet(input, output)? {
        SplitOutcome::Split { pages } => {
            println!("Split {} into {} pages: {}", input.display(), pages, output.display());
        }
        SplitOutcome::Unchanged => {
            std::fs::copy(input, output).with_context(|| {
                format!("Failed to copy {} to {}", input.display(), output.display())
            })?;
            println!("Not landscape, copied {} to {}", input.display(), output.display());
        }
    }

    Ok(())
}
