use codec::{CodecError, Header};
use config::BuildConfig;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of persisted filters.
pub const FILTER_EXTENSION: &str = "bf";

/// One `.bf` file and what its header says, or why it could not be read.
#[derive(Debug)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub header: Result<Header, CodecError>,
}

impl CatalogEntry {
    /// File name for display.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Lists every `.bf` file directly inside `dir`, sorted by path, probing
/// each header. A file whose header fails to decode is still listed, with
/// the error in place of the header.
///
/// # Errors
///
/// Only a failure to read the directory itself is returned.
pub fn scan_dir<P: AsRef<Path>>(dir: P, cfg: &BuildConfig) -> Result<Vec<CatalogEntry>, CodecError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(FILTER_EXTENSION))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let header = codec::probe_file(&path, cfg);
            if let Err(ref e) = header {
                warn!("skipping unreadable filter {}: {}", path.display(), e);
            }
            CatalogEntry { path, header }
        })
        .collect())
}
