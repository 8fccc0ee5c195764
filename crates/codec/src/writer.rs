use bloom::BloomFilter;
use log::info;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::format::{Header, HEADER_BYTES};
use crate::CodecError;

/// Bytes handed to the writer per call when streaming the bit array.
const WRITE_CHUNK: usize = 64 * 1024;

/// Size of the encoded file: header plus `ceil(m / 8)` bytes.
#[must_use]
pub fn encoded_len(bf: &BloomFilter) -> usize {
    HEADER_BYTES + bf.bits().byte_len()
}

/// Encodes `bf` into a fresh buffer.
#[must_use]
pub fn encode(bf: &BloomFilter) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(bf));
    buf.extend_from_slice(&Header::from_parameters(bf.parameters()).to_bytes());
    buf.extend_from_slice(bf.bits().as_bytes());
    buf
}

/// Streams the encoded form of `bf` into `w`.
pub fn write_to<W: Write>(bf: &BloomFilter, w: &mut W) -> io::Result<()> {
    Header::from_parameters(bf.parameters()).write_to(w)?;
    for chunk in bf.bits().as_bytes().chunks(WRITE_CHUNK) {
        w.write_all(chunk)?;
    }
    Ok(())
}

/// Writes `bf` to `path`.
///
/// # Crash Safety
///
/// Writes to `<path>.tmp`, calls `sync_all()`, then atomically renames over
/// `path`. If the write fails the temp file is removed and `path` is left
/// untouched.
pub fn save<P: AsRef<Path>>(path: P, bf: &BloomFilter) -> Result<(), CodecError> {
    let path = path.as_ref();
    let tmp_path = tmp_path_for(path);

    let result = write_file(&tmp_path, bf).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    info!(
        "saved bloom filter to {} ({} bytes)",
        path.display(),
        encoded_len(bf)
    );
    Ok(())
}

fn write_file(tmp_path: &Path, bf: &BloomFilter) -> io::Result<()> {
    let raw_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(tmp_path)?;
    let mut file = BufWriter::new(raw_file);
    write_to(bf, &mut file)?;
    let raw_file = file.into_inner().map_err(|e| e.into_error())?;
    raw_file.sync_all()
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
