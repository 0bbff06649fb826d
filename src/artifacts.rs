//! Failure-log preservation
//!
//! Mirrors the CI artifact step locally: when a run fails, the log output of
//! that run is copied into `<dest_root>/<run-id>/` so it survives later runs.
//! Only what was written since the run's [`LogMark`] is copied, so earlier
//! runs in the same dated file are not duplicated.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::logging::LogMark;

pub use crate::util::constants::ARTIFACT_NAME;

/// Copy the run's log output into `dest_root/run_id/`
///
/// `mark` is where the run started; `current` is the file being written now.
/// They differ when the run crossed midnight, in which case the new file is
/// copied whole. Returns the written paths; when the run wrote nothing, no
/// directory is created and the result is empty.
pub fn collect_run_log(
    mark: &LogMark,
    current: &Path,
    dest_root: &Path,
    run_id: &str,
) -> Result<Vec<PathBuf>> {
    let mut sources = vec![(mark.path.as_path(), mark.offset)];
    if current != mark.path.as_path() {
        sources.push((current, 0));
    }

    let dest_dir = dest_root.join(run_id);
    let mut copied = Vec::new();

    for (path, offset) in sources {
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };

        let bytes = fs::read(path)?;
        // A file shorter than the mark was replaced; keep all of it
        let start = usize::try_from(offset)
            .ok()
            .filter(|&start| start <= bytes.len())
            .unwrap_or(0);
        let slice = &bytes[start..];
        if slice.is_empty() {
            continue;
        }

        fs::create_dir_all(&dest_dir)?;
        let target = dest_dir.join(name);
        fs::write(&target, slice)?;
        debug!(
            from = %path.display(),
            to = %target.display(),
            bytes = slice.len(),
            "Preserved log"
        );
        copied.push(target);
    }

    if !copied.is_empty() {
        info!(
            count = copied.len(),
            dir = %dest_dir.display(),
            "Saved {} logs",
            ARTIFACT_NAME
        );
    }
    Ok(copied)
}
