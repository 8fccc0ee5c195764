use bloom::{BitArray, BloomFilter};
use config::BuildConfig;
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::format::{read_full, Header};
use crate::{CodecError, FormatError};

/// Bytes pulled from the reader per step while reading the bit array.
const READ_CHUNK: usize = 64 * 1024;

/// Decodes a complete filter file held in memory.
///
/// # Errors
///
/// [`FormatError`] for a bad magic, unsupported version, invalid header,
/// or a body that is shorter or longer than `ceil(m / 8)`.
pub fn decode(bytes: &[u8], cfg: &BuildConfig) -> Result<BloomFilter, CodecError> {
    let mut cursor = bytes;
    read_from(&mut cursor, cfg)
}

/// Decodes a filter from `r`, consuming it to EOF.
///
/// The body is read in fixed-size chunks after the header has been fully
/// validated, so a corrupt header never triggers a large allocation.
pub fn read_from<R: Read>(r: &mut R, cfg: &BuildConfig) -> Result<BloomFilter, CodecError> {
    let header = Header::read_from(r, cfg.max_bits)?;
    let expected = header.body_len();
    let expected_len = usize::try_from(expected).map_err(|_| FormatError::InvalidHeader {
        field: "num_bits",
        reason: format!("{} bytes cannot be addressed on this platform", expected),
    })?;

    let mut bits = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK.min(expected_len)];
    while bits.len() < expected_len {
        let want = (expected_len - bits.len()).min(READ_CHUNK);
        let n = read_full(r, &mut chunk[..want])?;
        bits.extend_from_slice(&chunk[..n]);
        if n < want {
            return Err(FormatError::TruncatedBody {
                expected,
                found: bits.len() as u64,
            }
            .into());
        }
    }

    let extra = io::copy(r, &mut io::sink())?;
    if extra > 0 {
        return Err(FormatError::OversizedBody {
            expected,
            found: expected + extra,
        }
        .into());
    }

    let invalid = |e: bloom::BloomError| FormatError::InvalidHeader {
        field: "num_bits",
        reason: e.to_string(),
    };
    let bits = BitArray::from_bytes(bits, header.num_bits).map_err(invalid)?;
    let bf = BloomFilter::from_parts(header.parameters(), bits).map_err(invalid)?;
    debug!(
        "decoded bloom filter: m={} k={} n={} body={}B",
        header.num_bits, header.num_hashes, header.num_items, expected
    );
    Ok(bf)
}

/// Reads and validates only the header, leaving the body unread.
pub fn read_header<R: Read>(r: &mut R, cfg: &BuildConfig) -> Result<Header, CodecError> {
    Header::read_from(r, cfg.max_bits)
}

/// Loads a filter file from disk through a buffered reader.
pub fn load<P: AsRef<Path>>(path: P, cfg: &BuildConfig) -> Result<BloomFilter, CodecError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut rdr = BufReader::with_capacity(READ_CHUNK, file);
    let bf = read_from(&mut rdr, cfg)?;
    debug!("loaded {}", path.display());
    Ok(bf)
}

/// Opens a filter file and decodes just its header.
pub fn probe_file<P: AsRef<Path>>(path: P, cfg: &BuildConfig) -> Result<Header, CodecError> {
    let mut file = File::open(path)?;
    read_header(&mut file, cfg)
}
