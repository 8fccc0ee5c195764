use analyzer::{CatalogEntry, HeaderView, Stats};
use anyhow::{anyhow, bail, Context, Result};
use bloom::BloomFilter;
use config::Config;
use log::info;
use std::path::{Path, PathBuf};

use crate::preprocess::read_elements;

/// The filter the shell is working on and where it came from.
struct Current {
    filter: BloomFilter,
    path: Option<PathBuf>,
}

/// Shell state: the configuration and at most one open filter.
pub struct Session {
    cfg: Config,
    current: Option<Current>,
}

impl Session {
    pub fn new(cfg: Config) -> Self {
        Self { cfg, current: None }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Builds `<stem>.bf` next to `txt` from its cleaned lines and makes it
    /// the open filter.
    ///
    /// Refuses to replace an existing output unless `force` is set.
    pub fn create(&mut self, txt: &Path, error_rate: Option<f64>, force: bool) -> Result<PathBuf> {
        let p = error_rate.unwrap_or(self.cfg.error_rate);
        let out = txt.with_extension("bf");
        if out.exists() && !force {
            bail!("{} already exists (append FORCE to overwrite)", out.display());
        }

        let elements = read_elements(txt, &self.cfg.preprocess)
            .with_context(|| format!("reading {}", txt.display()))?;
        info!("{} elements after preprocessing {}", elements.len(), txt.display());

        let filter = BloomFilter::create(&elements, p, &self.cfg.build)?;
        codec::save(&out, &filter)?;

        self.current = Some(Current {
            filter,
            path: Some(out.clone()),
        });
        Ok(out)
    }

    /// Loads `path` and makes it the open filter.
    pub fn load(&mut self, path: &Path) -> Result<&BloomFilter> {
        let filter = codec::load(path, &self.cfg.build)
            .with_context(|| format!("loading {}", path.display()))?;
        let current = self.current.insert(Current {
            filter,
            path: Some(path.to_path_buf()),
        });
        Ok(&current.filter)
    }

    pub fn list(&self, dir: &Path) -> Result<Vec<CatalogEntry>> {
        analyzer::scan_dir(dir, &self.cfg.build)
            .with_context(|| format!("listing {}", dir.display()))
    }

    pub fn query(&self, element: &str) -> Result<bool> {
        Ok(self.filter()?.may_contain(element.as_bytes()))
    }

    /// Inserts into the open filter and returns the new element count.
    pub fn add(&mut self, element: &str) -> Result<u64> {
        let current = self.current.as_mut().ok_or_else(no_filter)?;
        current.filter.insert(element.as_bytes());
        Ok(current.filter.num_items())
    }

    /// Writes the open filter to `path`, or back to where it came from.
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let current = self.current.as_mut().ok_or_else(no_filter)?;
        let target = match (path, &current.path) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(p)) => p.clone(),
            (None, None) => bail!("no file name: use SAVE <file>"),
        };
        codec::save(&target, &current.filter)?;
        current.path = Some(target.clone());
        Ok(target)
    }

    pub fn stats(&self) -> Result<Stats> {
        Ok(analyzer::stats(self.filter()?, &self.cfg.analyze))
    }

    pub fn hex_dump(&self) -> Result<String> {
        let bytes = self.filter()?.bits().as_bytes();
        Ok(analyzer::hex_dump_limited(bytes, &self.cfg.analyze))
    }

    pub fn ascii_preview(&self) -> Result<String> {
        let a = &self.cfg.analyze;
        let bytes = self.filter()?.bits().as_bytes();
        Ok(analyzer::ascii_preview(bytes, a.ascii_preview_len, a.placeholder))
    }

    pub fn header(&self) -> Result<HeaderView> {
        Ok(analyzer::interpret_header(self.filter()?))
    }

    pub fn raw_hex(&self) -> Result<String> {
        let bytes = self.filter()?.bits().as_bytes();
        let limit = self.cfg.analyze.dump_limit;
        if limit == 0 || bytes.len() <= limit {
            return Ok(analyzer::raw_hex(bytes));
        }
        Ok(format!(
            "{}\n... ({} more bytes)",
            analyzer::raw_hex(&bytes[..limit]),
            bytes.len() - limit
        ))
    }

    pub fn filter(&self) -> Result<&BloomFilter> {
        self.current
            .as_ref()
            .map(|c| &c.filter)
            .ok_or_else(no_filter)
    }

    pub fn path(&self) -> Option<&Path> {
        self.current.as_ref().and_then(|c| c.path.as_deref())
    }
}

fn no_filter() -> anyhow::Error {
    anyhow!("no filter loaded (use LOAD <file> or CREATE <txt>)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn session() -> Session {
        Session::new(Config::default())
    }

    #[test]
    fn create_writes_filter_next_to_input() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("btc.txt");
        fs::write(&txt, "1aaa\t0.1\n1bbb\nbc1skip\n\n3ccc\n").unwrap();

        let mut s = session();
        let out = s.create(&txt, Some(0.01), false).unwrap();

        assert_eq!(out, dir.path().join("btc.bf"));
        let bf = codec::load(&out, &s.config().build).unwrap();
        assert_eq!(bf.num_items(), 3);
        assert!(bf.may_contain(b"1aaa"));
        assert!(s.query("3ccc").unwrap());
        assert_eq!(s.path(), Some(out.as_path()));
    }

    #[test]
    fn create_refuses_to_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("list.txt");
        fs::write(&txt, "1aaa\n").unwrap();
        fs::write(dir.path().join("list.bf"), b"keep me").unwrap();

        let mut s = session();
        assert!(s.create(&txt, None, false).is_err());
        assert_eq!(fs::read(dir.path().join("list.bf")).unwrap(), b"keep me");

        s.create(&txt, None, true).unwrap();
        assert!(s.query("1aaa").unwrap());
        assert_eq!(s.filter().unwrap().false_positive_rate(), 1e-14);
    }

    #[test]
    fn create_from_empty_input_fails() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("empty.txt");
        fs::write(&txt, "\n\n").unwrap();
        let err = session().create(&txt, None, false).unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn commands_need_an_open_filter() {
        let mut s = session();
        assert!(s.query("x").is_err());
        assert!(s.add("x").is_err());
        assert!(s.stats().is_err());
        assert!(s.save(None).is_err());
    }

    #[test]
    fn add_then_save_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.bf");
        let bf = BloomFilter::create(&["one"], 0.01, &Default::default()).unwrap();
        codec::save(&path, &bf).unwrap();

        let mut s = session();
        s.load(&path).unwrap();
        assert_eq!(s.add("two").unwrap(), 2);
        assert_eq!(s.save(None).unwrap(), path);

        let mut fresh = session();
        let loaded = fresh.load(&path).unwrap();
        assert_eq!(loaded.num_items(), 2);
        assert!(loaded.may_contain(b"two"));
    }

    #[test]
    fn hex_dump_matches_stats_view() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.bf");
        let bf = BloomFilter::create(&["a", "b", "c"], 0.001, &Default::default()).unwrap();
        codec::save(&path, &bf).unwrap();

        let mut cfg = Config::default();
        cfg.analyze.dump_limit = 2;
        let mut s = Session::new(cfg);
        s.load(&path).unwrap();

        let dump = s.hex_dump().unwrap();
        assert_eq!(dump, s.stats().unwrap().hex_dump);
        assert!(dump.ends_with(&format!("... ({} more bytes)", bf.bits().byte_len() - 2)));
    }

    #[test]
    fn raw_hex_respects_dump_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.bf");
        let bf = BloomFilter::new(1000, 0.01, &Default::default()).unwrap();
        codec::save(&path, &bf).unwrap();

        let mut cfg = Config::default();
        cfg.analyze.dump_limit = 4;
        let mut s = Session::new(cfg);
        s.load(&path).unwrap();
        let raw = s.raw_hex().unwrap();
        assert!(raw.starts_with("00000000\n... ("));
    }
}
