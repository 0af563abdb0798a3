//! All-or-nothing file output.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Write `bytes` to `path` so readers see either the old file or the
/// complete new one.
///
/// Data goes to a temporary file in the destination directory, is synced,
/// and then renamed over `path`. If any step fails the temporary file is
/// removed and `path` is left as it was.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let to_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(to_error)?;
    file.write_all(bytes).map_err(to_error)?;
    file.as_file().sync_all().map_err(to_error)?;
    file.persist(path).map_err(|e| to_error(e.error))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}
