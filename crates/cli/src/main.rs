//! # CLI - BloomSuite Interactive Shell
//!
//! A REPL-style command-line interface for building, inspecting and querying
//! bloom filters. Reads commands from stdin, runs them against the open
//! filter, and prints results to stdout. Works interactively or scripted
//! (pipe commands via stdin).
//!
//! ## Commands
//!
//! ```text
//! CREATE txt [p] [FORCE]  Build <stem>.bf from a text file of elements
//! LOAD file               Open a persisted filter
//! LIST [dir]              List .bf files with their parameters
//! QUERY element           Membership test ("maybe" or "no")
//! ADD element             Insert into the open filter
//! SAVE [file]             Persist the open filter
//! STATS                   Statistics, header, hex dump and ASCII preview
//! HEX | ASCII | HEADER | RAW
//!                         Individual views of the open filter
//! HELP                    Print this command list
//! EXIT / QUIT             Leave the shell
//! ```
//!
//! An element is the rest of the line after the command, so it may contain
//! spaces.
//!
//! ## Configuration
//!
//! `BLOOMSUITE_*` environment variables, see the `config` crate. Log output
//! goes to stderr and is controlled by `RUST_LOG`.
//!
//! ## Example
//!
//! ```text
//! $ cargo run -p cli
//! BloomSuite started (p=1e-14, max_bits=34359738368, coin=BTC)
//! > CREATE addresses.txt 0.001
//! OK addresses.bf (n=3 m=44 k=10)
//! > QUERY 1BoatSLRHtKNngkdXEeobR76b53LETtpyT
//! maybe
//! > EXIT
//! bye
//! ```

mod preprocess;
mod session;

use anyhow::Result;
use config::Config;
use session::Session;
use std::io::{self, BufRead, Write};
use std::path::Path;

const HELP: &str = "\
Commands: CREATE txt [p] [FORCE] | LOAD file | LIST [dir] | QUERY element
          ADD element | SAVE [file] | STATS | HEX | ASCII | HEADER | RAW
          HELP | EXIT";

/// Splits a line into its command and the untouched remainder.
fn split_command(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    })
}

/// Parses `txt [p] [FORCE]`.
fn parse_create(args: &str) -> Result<(&str, Option<f64>, bool), String> {
    let mut parts = args.split_whitespace();
    let txt = parts.next().ok_or("usage: CREATE txt [p] [FORCE]")?;
    let mut rate = None;
    let mut force = false;
    for arg in parts {
        if arg.eq_ignore_ascii_case("FORCE") {
            force = true;
        } else {
            let p = arg
                .parse::<f64>()
                .map_err(|_| format!("invalid error rate: {}", arg))?;
            rate = Some(p);
        }
    }
    Ok((txt, rate, force))
}

fn main() -> Result<()> {
    env_logger::init();

    let cfg = Config::from_env();
    println!(
        "BloomSuite started (p={:e}, max_bits={}, coin={})",
        cfg.error_rate, cfg.build.max_bits, cfg.preprocess.coin
    );
    println!("{}", HELP);
    print!("> ");
    io::stdout().flush().ok();

    let mut session = Session::new(cfg);
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        if let Some((cmd, args)) = split_command(&line) {
            match cmd.to_uppercase().as_str() {
                "CREATE" => match parse_create(args) {
                    Ok((txt, rate, force)) => {
                        match session.create(Path::new(txt), rate, force) {
                            Ok(out) => {
                                let bf = session.filter()?;
                                println!(
                                    "OK {} (n={} m={} k={})",
                                    out.display(),
                                    bf.num_items(),
                                    bf.num_bits(),
                                    bf.num_hashes()
                                );
                            }
                            Err(e) => println!("ERR create failed: {:#}", e),
                        }
                    }
                    Err(msg) => println!("ERR {}", msg),
                },
                "LOAD" => {
                    if args.is_empty() {
                        println!("ERR usage: LOAD file");
                    } else {
                        match session.load(Path::new(args)) {
                            Ok(bf) => println!(
                                "OK (n={} m={} k={} p={:e})",
                                bf.num_items(),
                                bf.num_bits(),
                                bf.num_hashes(),
                                bf.false_positive_rate()
                            ),
                            Err(e) => println!("ERR load failed: {:#}", e),
                        }
                    }
                }
                "LIST" => {
                    let dir = if args.is_empty() { "." } else { args };
                    match session.list(Path::new(dir)) {
                        Ok(entries) => {
                            if entries.is_empty() {
                                println!("(empty)");
                            } else {
                                for entry in &entries {
                                    match &entry.header {
                                        Ok(h) => println!(
                                            "{} -> m={} k={} n={} p={:e}",
                                            entry.name(),
                                            h.num_bits,
                                            h.num_hashes,
                                            h.num_items,
                                            h.false_positive_rate
                                        ),
                                        Err(e) => println!("{} -> ? ({})", entry.name(), e),
                                    }
                                }
                                println!("({} filters)", entries.len());
                            }
                        }
                        Err(e) => println!("ERR list failed: {:#}", e),
                    }
                }
                "QUERY" => {
                    if args.is_empty() {
                        println!("ERR usage: QUERY element");
                    } else {
                        match session.query(args) {
                            Ok(true) => println!("maybe"),
                            Ok(false) => println!("no"),
                            Err(e) => println!("ERR query failed: {}", e),
                        }
                    }
                }
                "ADD" => {
                    if args.is_empty() {
                        println!("ERR usage: ADD element");
                    } else {
                        match session.add(args) {
                            Ok(n) => println!("OK (n={})", n),
                            Err(e) => println!("ERR add failed: {}", e),
                        }
                    }
                }
                "SAVE" => {
                    let target = (!args.is_empty()).then(|| Path::new(args));
                    match session.save(target) {
                        Ok(path) => println!("OK {}", path.display()),
                        Err(e) => println!("ERR save failed: {:#}", e),
                    }
                }
                "STATS" => match session.stats() {
                    Ok(s) => println!("{}", s),
                    Err(e) => println!("ERR stats failed: {}", e),
                },
                "HEX" => match session.hex_dump() {
                    Ok(dump) => println!("{}", dump),
                    Err(e) => println!("ERR hex failed: {}", e),
                },
                "ASCII" => match session.ascii_preview() {
                    Ok(preview) => println!("{}", preview),
                    Err(e) => println!("ERR ascii failed: {}", e),
                },
                "HEADER" => match session.header() {
                    Ok(view) => println!("{}", view),
                    Err(e) => println!("ERR header failed: {}", e),
                },
                "RAW" => match session.raw_hex() {
                    Ok(raw) => println!("{}", raw),
                    Err(e) => println!("ERR raw failed: {}", e),
                },
                "HELP" => println!("{}", HELP),
                "EXIT" | "QUIT" => {
                    println!("bye");
                    break;
                }
                other => {
                    println!("unknown command: {}", other);
                }
            }
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    Ok(())
}
