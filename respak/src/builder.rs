//! Building archives from a manifest of source files

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

use crate::archive::Archive;
use crate::header::{FAT_ENTRY_SIZE, FatEntry, HEADER_SIZE, Header};
use crate::manifest;
use crate::{Error, Result};

/// Build an in-memory archive from the manifest at `manifest_path`.
///
/// Each filename in the manifest is resolved against `base_path` and read
/// in full, in listing order. A source file that cannot be read becomes a
/// zero-length placeholder entry and bumps the returned error count; the
/// build continues with the remaining files. The count is advisory — the
/// archive is usable even when it is non-zero.
///
/// Payload offsets are computed up front from the entry count, so the FAT
/// is fully known before the first source file is opened.
///
/// # Errors
///
/// Fails with [`Error::Io`] when the manifest itself cannot be opened or
/// read, and with [`Error::InvalidName`] when a listed name does not fit
/// the 16-byte FAT name slot. Missing *source* files are not errors here;
/// they are tallied in the returned count.
pub fn build(
    manifest_path: impl AsRef<Path>,
    base_path: impl AsRef<Path>,
) -> Result<(Archive, usize)> {
    let mut f = BufReader::new(File::open(manifest_path.as_ref())?);
    let names = manifest::parse(&mut f)?;
    drop(f);

    build_from_names(&names, base_path.as_ref())
}

fn build_from_names(names: &[String], base: &Path) -> Result<(Archive, usize)> {
    let entry_count =
        u32::try_from(names.len()).map_err(|_| Error::TooManyEntries(names.len()))?;

    // Payloads start right after the header and the full FAT block.
    let fat_end = HEADER_SIZE as u64 + FAT_ENTRY_SIZE as u64 * u64::from(entry_count);
    u32::try_from(fat_end).map_err(|_| Error::TooManyEntries(names.len()))?;

    let mut offset = fat_end;
    let mut entries = Vec::with_capacity(names.len());
    let mut payloads = Vec::with_capacity(names.len());
    let mut errors = 0;

    for name in names {
        let source = base.join(name);
        match fs::read(&source) {
            Ok(data) => {
                let length = u32::try_from(data.len()).map_err(|_| Error::PayloadTooLarge {
                    name: name.clone(),
                    size: data.len() as u64,
                })?;
                let end = offset + u64::from(length);
                if end > u64::from(u32::MAX) {
                    return Err(Error::PayloadTooLarge {
                        name: name.clone(),
                        size: u64::from(length),
                    });
                }

                entries.push(FatEntry::new(name, offset as u32, length)?);
                payloads.push(data);
                debug!("packaged {} ({length} bytes at {offset})", source.display());
                offset = end;
            }
            Err(e) => {
                // Recovered locally: keep the slot as a placeholder so the
                // manifest's index assignment survives, and carry on.
                warn!("cannot read {}: {e}", source.display());
                entries.push(FatEntry::new(name, offset as u32, 0)?);
                payloads.push(Vec::new());
                errors += 1;
            }
        }
    }

    let header = Header {
        flags: 0,
        entry_count,
    };
    Ok((Archive::from_parts(header, entries, payloads), errors))
}
