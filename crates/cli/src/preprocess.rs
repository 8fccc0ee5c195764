//! Turns raw address lists into filter elements.
//!
//! Per line, in order:
//!
//! 1. trim surrounding whitespace
//! 2. drop the line early if blank (`remove_empty`)
//! 3. ETH only: strip a leading `0x` / `0X`
//! 4. drop the line if it starts with an excluded prefix
//! 5. keep only the text before the first tab (`strip_balances`)
//! 6. drop the line if that left it blank
//!
//! An empty string never becomes an element, whatever `remove_empty` says;
//! the flag only decides whether blank lines skip the remaining steps.
//! Input bytes that are not valid UTF-8 are replaced, never rejected.

use config::{Coin, PreprocessConfig};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Cleans one line, returning `None` if it should not become an element.
pub fn clean_line(line: &str, cfg: &PreprocessConfig) -> Option<String> {
    let mut addr = line.trim();
    if cfg.remove_empty && addr.is_empty() {
        return None;
    }

    if cfg.coin == Coin::Eth {
        if let Some(head) = addr.get(..2) {
            if head.eq_ignore_ascii_case("0x") {
                addr = addr[2..].trim();
            }
        }
    }

    if cfg
        .excluded_prefixes
        .iter()
        .any(|p| addr.starts_with(p.as_str()))
    {
        return None;
    }

    if cfg.strip_balances {
        if let Some((head, _balance)) = addr.split_once('\t') {
            addr = head.trim();
        }
    }

    if addr.is_empty() {
        return None;
    }
    Some(addr.to_string())
}

/// Cleans every line of `rdr`.
pub fn preprocess<R: BufRead>(mut rdr: R, cfg: &PreprocessConfig) -> io::Result<Vec<String>> {
    let mut elements = Vec::new();
    let mut buf = Vec::with_capacity(128);
    loop {
        buf.clear();
        if rdr.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if let Some(e) = clean_line(&String::from_utf8_lossy(&buf), cfg) {
            elements.push(e);
        }
    }
    Ok(elements)
}

/// Reads and cleans a text file.
pub fn read_elements<P: AsRef<Path>>(path: P, cfg: &PreprocessConfig) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    preprocess(BufReader::new(file), cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn btc() -> PreprocessConfig {
        PreprocessConfig::default()
    }

    fn eth() -> PreprocessConfig {
        PreprocessConfig {
            coin: Coin::Eth,
            excluded_prefixes: Vec::new(),
            ..PreprocessConfig::default()
        }
    }

    #[test]
    fn trims_and_drops_blank_lines() {
        assert_eq!(
            clean_line("  1BoatSLRHtKNngkdXEeobR76b53LETtpyT \r\n", &btc()).as_deref(),
            Some("1BoatSLRHtKNngkdXEeobR76b53LETtpyT")
        );
        assert_eq!(clean_line("   \n", &btc()), None);
    }

    #[test]
    fn excluded_prefixes_drop_the_line() {
        assert_eq!(clean_line("bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh", &btc()), None);
        assert!(clean_line("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy", &btc()).is_some());
    }

    #[test]
    fn balances_are_stripped() {
        assert_eq!(clean_line("1abc\t0.5 BTC", &btc()).as_deref(), Some("1abc"));

        let keep = PreprocessConfig {
            strip_balances: false,
            ..btc()
        };
        assert_eq!(clean_line("1abc\t0.5", &keep).as_deref(), Some("1abc\t0.5"));
    }

    #[test]
    fn eth_strips_hex_prefix() {
        assert_eq!(
            clean_line("0xAbC123\t42", &eth()).as_deref(),
            Some("AbC123")
        );
        assert_eq!(clean_line("0XdeadBEEF", &eth()).as_deref(), Some("deadBEEF"));
        assert_eq!(clean_line("0x", &eth()), None);
        // BTC lines keep a leading 0x.
        let btc_no_prefixes = PreprocessConfig {
            excluded_prefixes: Vec::new(),
            ..btc()
        };
        assert_eq!(clean_line("0xabc", &btc_no_prefixes).as_deref(), Some("0xabc"));
    }

    #[test]
    fn eth_prefix_check_respects_char_boundaries() {
        assert_eq!(clean_line("é", &eth()).as_deref(), Some("é"));
    }

    #[test]
    fn empty_elements_never_produced() {
        let keep_empty = PreprocessConfig {
            remove_empty: false,
            ..btc()
        };
        assert_eq!(clean_line("", &keep_empty), None);
        let eth_keep_empty = PreprocessConfig {
            remove_empty: false,
            ..eth()
        };
        assert_eq!(clean_line(" 0x ", &eth_keep_empty), None);
        assert_eq!(clean_line("1abc", &keep_empty).as_deref(), Some("1abc"));

        let elements = preprocess(&b"1a\n\n \n1b\n"[..], &keep_empty).unwrap();
        assert_eq!(elements, vec!["1a", "1b"]);
    }

    #[test]
    fn preprocess_reads_lossily() {
        let input: &[u8] = b"1aaa\n\nbc1zzz\n1b\xffb\t7\n1ccc";
        let elements = preprocess(input, &btc()).unwrap();
        assert_eq!(elements, vec!["1aaa", "1b\u{fffd}b", "1ccc"]);
    }
}
