//! # Config - BloomSuite settings
//!
//! Every knob the engine and the shell understand, gathered into plain
//! immutable values. Nothing in the `bloom`, `codec` or `analyzer` crates
//! reads the environment; the binary builds a [`Config`] once at startup and
//! passes the relevant part into each operation.
//!
//! ## Environment variables
//!
//! ```text
//! BLOOMSUITE_ERROR_RATE      default false-positive rate   (default: 1e-14)
//! BLOOMSUITE_MAX_BITS        bit-array ceiling             (default: 2^35)
//! BLOOMSUITE_PARALLEL_MIN    parallel insert threshold     (default: 100000)
//! BLOOMSUITE_HEX_WIDTH       hex dump bytes per line       (default: 16)
//! BLOOMSUITE_HEX_OFFSETS     hex dump offset column        (default: "true")
//! BLOOMSUITE_ASCII_LEN       ASCII preview length          (default: 64)
//! BLOOMSUITE_DUMP_LIMIT      hex dump byte limit, 0 = all  (default: 1048576)
//! BLOOMSUITE_COIN            BTC or ETH                    (default: "BTC")
//! BLOOMSUITE_PREFIXES        comma-separated exclusions    (default: "bc1")
//! BLOOMSUITE_STRIP_BALANCES  drop text after first tab     (default: "true")
//! BLOOMSUITE_REMOVE_EMPTY    drop blank lines              (default: "true")
//! ```

use log::warn;
use std::fmt;
use std::str::FromStr;

/// Default ceiling on the bit-array length: 2^35 bits (4 GiB of storage).
pub const DEFAULT_MAX_BITS: u64 = 1 << 35;

/// Default element count from which creation switches to parallel insertion.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 100_000;

/// Default target false-positive rate used by the shell when none is given.
pub const DEFAULT_ERROR_RATE: f64 = 1e-14;

/// Settings that bound filter construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Largest `m` a filter may have. Parameter computation and decoding both
    /// refuse anything above it.
    pub max_bits: u64,
    /// Element count at or above which insertion runs on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_bits: DEFAULT_MAX_BITS,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Rendering settings for the analysis views.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeConfig {
    /// Bytes shown on each hex dump line.
    pub bytes_per_line: usize,
    /// Prefix every hex dump line with its byte offset.
    pub show_offsets: bool,
    /// Number of leading bytes rendered by the ASCII preview.
    pub ascii_preview_len: usize,
    /// Substitute for non-printable bytes.
    pub placeholder: char,
    /// Most bytes a hex dump renders; `0` renders the whole array.
    pub dump_limit: usize,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            bytes_per_line: 16,
            show_offsets: true,
            ascii_preview_len: 64,
            placeholder: '.',
            dump_limit: 1024 * 1024,
        }
    }
}

/// Address family of the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coin {
    Btc,
    Eth,
}

impl FromStr for Coin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BTC" => Ok(Coin::Btc),
            "ETH" => Ok(Coin::Eth),
            other => Err(format!("unknown coin type: {}", other)),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coin::Btc => f.write_str("BTC"),
            Coin::Eth => f.write_str("ETH"),
        }
    }
}

/// How raw text lines are cleaned before they become filter elements.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessConfig {
    pub coin: Coin,
    /// Lines starting with any of these are dropped entirely.
    pub excluded_prefixes: Vec<String>,
    /// Keep only the text before the first tab (address without balance).
    pub strip_balances: bool,
    pub remove_empty: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            coin: Coin::Btc,
            excluded_prefixes: vec!["bc1".to_string()],
            strip_balances: true,
            remove_empty: true,
        }
    }
}

/// Top-level configuration handed around by the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// False-positive rate used by `CREATE` when the command omits one.
    pub error_rate: f64,
    pub build: BuildConfig,
    pub analyze: AnalyzeConfig,
    pub preprocess: PreprocessConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_rate: DEFAULT_ERROR_RATE,
            build: BuildConfig::default(),
            analyze: AnalyzeConfig::default(),
            preprocess: PreprocessConfig::default(),
        }
    }
}

impl Config {
    /// Reads the configuration from `BLOOMSUITE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Missing keys take their default. Keys that are present but fail to
    /// parse also take their default, with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Config::default();

        let error_rate = parse_or(&lookup, "BLOOMSUITE_ERROR_RATE", d.error_rate);
        let build = BuildConfig {
            max_bits: parse_or(&lookup, "BLOOMSUITE_MAX_BITS", d.build.max_bits),
            parallel_threshold: parse_or(
                &lookup,
                "BLOOMSUITE_PARALLEL_MIN",
                d.build.parallel_threshold,
            ),
        };

        let mut bytes_per_line = parse_or(&lookup, "BLOOMSUITE_HEX_WIDTH", d.analyze.bytes_per_line);
        if bytes_per_line == 0 {
            warn!("BLOOMSUITE_HEX_WIDTH must be > 0, using {}", d.analyze.bytes_per_line);
            bytes_per_line = d.analyze.bytes_per_line;
        }
        let analyze = AnalyzeConfig {
            bytes_per_line,
            show_offsets: parse_or(&lookup, "BLOOMSUITE_HEX_OFFSETS", d.analyze.show_offsets),
            ascii_preview_len: parse_or(&lookup, "BLOOMSUITE_ASCII_LEN", d.analyze.ascii_preview_len),
            placeholder: d.analyze.placeholder,
            dump_limit: parse_or(&lookup, "BLOOMSUITE_DUMP_LIMIT", d.analyze.dump_limit),
        };

        let excluded_prefixes = match lookup("BLOOMSUITE_PREFIXES") {
            Some(raw) => split_prefixes(&raw),
            None => d.preprocess.excluded_prefixes,
        };
        let preprocess = PreprocessConfig {
            coin: parse_or(&lookup, "BLOOMSUITE_COIN", d.preprocess.coin),
            excluded_prefixes,
            strip_balances: parse_or(
                &lookup,
                "BLOOMSUITE_STRIP_BALANCES",
                d.preprocess.strip_balances,
            ),
            remove_empty: parse_or(&lookup, "BLOOMSUITE_REMOVE_EMPTY", d.preprocess.remove_empty),
        };

        Self {
            error_rate,
            build,
            analyze,
            preprocess,
        }
    }
}

/// Splits a comma-separated prefix list, dropping blank entries.
pub fn split_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!("ignoring unparseable {}={:?}, using default", key, raw);
                default
            }
        },
        None => default,
    }
}
