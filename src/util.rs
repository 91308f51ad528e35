use anyhow::{anyhow, Result};
use std::fs::File;
use std::path::Path;
use tracing::warn;

/// Opens `path` for reading, annotating failures with the kind of file being
/// opened (e.g., "project").
pub fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

/// Creates `dir` and any missing ancestors. A no-op if it already exists.
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Reads a text file. Bytes that aren't valid UTF-8 (e.g. a Big5-encoded
/// manuscript) become U+FFFD instead of failing the read.
pub fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!("`{}` is not valid UTF-8; replacing invalid bytes", path.display());
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    })
}
