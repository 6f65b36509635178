//! Fetching a single payload by name, without loading the whole archive

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

use crate::archive::read_fat;
use crate::header::{HEADER_SIZE, Header};
use crate::{Error, Result};

/// Fetch the payload of the entry named `name` from the archive at `path`.
///
/// Only the header, the FAT, and the matched payload are read; other
/// payloads never leave the disk. The same structural validation as
/// [`Archive::load`][crate::Archive::load] runs before the name scan, so a
/// truncated archive fails here too.
///
/// The lookup is case-sensitive and linear; when the archive carries
/// duplicate names (which the writer does not reject), the first match in
/// FAT order wins.
///
/// # Errors
///
/// Fails with [`Error::NotFound`] when no entry matches (no payload is
/// read in that case), [`Error::Corrupt`] when validation fails, and
/// [`Error::Io`] when the archive cannot be opened or read.
pub fn fetch_file(path: impl AsRef<Path>, name: &str) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let stream_len = file.metadata()?.len();
    if stream_len < HEADER_SIZE as u64 {
        return Err(Error::Corrupt {
            expected: HEADER_SIZE as u64,
            actual: stream_len,
        });
    }
    let mut f = BufReader::new(file);

    let header = Header::parse(&mut f)?;
    let entries = read_fat(&mut f, &header, stream_len)?;

    let Some(entry) = entries.iter().find(|e| e.name() == name) else {
        return Err(Error::NotFound(name.to_string()));
    };

    let mut data = vec![0; entry.length as usize];
    f.seek(SeekFrom::Start(entry.offset.into()))?;
    f.read_exact(&mut data)?;

    debug!(
        "fetched {} ({} bytes) from {}",
        entry.name(),
        entry.length,
        path.display(),
    );
    Ok(data)
}
