//! Manifest parsing
//!
//! A manifest is a plain-text listing with one relative filename per line.
//! Lines beginning with `#` or a space, and empty lines, are skipped. Order
//! is preserved: the manifest's line order becomes the FAT's entry order,
//! and therefore each file's addressable index.

use std::io::BufRead;
use tracing::debug;

use crate::Result;

/// Parse a manifest, returning the listed filenames in order.
///
/// Line endings (`\n` and `\r\n`) are stripped from each name. The list is
/// unbounded: there is no cap on the number of files or the line length.
pub fn parse<R: BufRead>(f: &mut R) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut buf = String::with_capacity(256);

    loop {
        buf.clear();
        if f.read_line(&mut buf)? == 0 {
            break;
        }

        // Comment markers apply to the raw line, before any trimming.
        if buf.starts_with('#') || buf.starts_with(' ') {
            continue;
        }

        let line = buf.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }

        names.push(line.to_string());
    }

    debug!("manifest lists {} file(s)", names.len());
    Ok(names)
}
