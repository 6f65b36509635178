//! In-memory archives: loading, saving, and random access by index

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, error};

use crate::header::{FAT_ENTRY_SIZE, FatEntry, HEADER_SIZE, Header};
use crate::{Error, Result};

/// A fully loaded RES archive: header, FAT, and one owned payload buffer
/// per entry, aligned by index.
///
/// An `Archive` is produced either by [`build`][crate::build] (from a
/// manifest of source files) or by [`Archive::load`] (from a serialized
/// archive). It exclusively owns its payload buffers; dropping the archive
/// releases the FAT and every payload.
///
/// Nothing mutates a loaded archive in place, so a shared reference
/// supports concurrent reads by index or name without extra locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    header: Header,
    entries: Vec<FatEntry>,
    payloads: Vec<Vec<u8>>,
}

impl Archive {
    pub(crate) fn from_parts(header: Header, entries: Vec<FatEntry>, payloads: Vec<Vec<u8>>) -> Self {
        debug_assert_eq!(entries.len(), payloads.len());
        debug_assert_eq!(entries.len(), header.entry_count as usize);
        Self {
            header,
            entries,
            payloads,
        }
    }

    /// Load an archive from `path`, reading every payload eagerly.
    ///
    /// To read a single file without loading the whole archive, use
    /// [`fetch_file`][crate::fetch_file] instead.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Io`] when the file cannot be opened or read, and
    /// with [`Error::Corrupt`] when the FAT does not match the file length
    /// (see [`Archive::parse`] for what the check covers). On failure no
    /// partially populated archive is ever returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let stream_len = file.metadata()?.len();

        let mut f = BufReader::new(file);
        let archive = Self::parse(&mut f, stream_len)?;
        debug!("loaded {} with {} entries", path.display(), archive.len());
        Ok(archive)
    }

    /// Parse an archive from a seekable stream of `stream_len` bytes.
    ///
    /// Structural validation runs before any payload is read: the end of
    /// the final FAT entry must land exactly on `stream_len` (for an empty
    /// FAT, the stream must be exactly the header). This catches truncation
    /// and appended garbage, but not reordered or overlapping entries.
    pub fn parse<R: Read + Seek>(f: &mut R, stream_len: u64) -> Result<Self> {
        if stream_len < HEADER_SIZE as u64 {
            return Err(Error::Corrupt {
                expected: HEADER_SIZE as u64,
                actual: stream_len,
            });
        }

        let header = Header::parse(f)?;
        let entries = read_fat(f, &header, stream_len)?;

        let mut payloads = Vec::with_capacity(entries.len());
        for entry in &entries {
            let mut data = vec![0; entry.length as usize];
            f.seek(SeekFrom::Start(entry.offset.into()))?;
            f.read_exact(&mut data)?;
            payloads.push(data);
        }

        Ok(Self {
            header,
            entries,
            payloads,
        })
    }

    /// Serialize the archive to `path`, truncating any existing file.
    ///
    /// Returns the total number of bytes written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        let mut f = BufWriter::new(File::create(path)?);
        let written = self.write_to(&mut f)?;
        f.flush()?;
        debug!("saved {} ({written} bytes)", path.display());
        Ok(written)
    }

    /// Serialize the archive: header, then the FAT, then every payload in
    /// FAT order with no padding.
    ///
    /// The offsets recorded in the FAT at build time are exactly the
    /// positions payloads land at here; that equality is what
    /// [`Archive::parse`] later validates.
    pub fn write_to<W: Write>(&self, f: &mut W) -> Result<u64> {
        self.header.write_to(f)?;
        for entry in &self.entries {
            entry.write_to(f)?;
        }

        let mut written = (HEADER_SIZE + FAT_ENTRY_SIZE * self.entries.len()) as u64;
        for payload in &self.payloads {
            f.write_all(payload)?;
            written += payload.len() as u64;
        }

        Ok(written)
    }

    /// Payload bytes at `index`, borrowed from the archive.
    ///
    /// Returns `None` when `index` is past the end of the FAT. Placeholder
    /// entries yield an empty slice.
    pub fn file(&self, index: u32) -> Option<&[u8]> {
        self.payloads.get(index as usize).map(Vec::as_slice)
    }

    /// FAT entry at `index`, or `None` when out of range.
    pub fn entry(&self, index: u32) -> Option<&FatEntry> {
        self.entries.get(index as usize)
    }

    /// All FAT entries, in table order.
    pub fn entries(&self) -> &[FatEntry] {
        &self.entries
    }

    /// The archive header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of entries in the FAT.
    pub fn len(&self) -> u32 {
        self.header.entry_count
    }

    /// `true` when the archive holds no entries.
    pub fn is_empty(&self) -> bool {
        self.header.entry_count == 0
    }

    /// Size of the archive when serialized, in bytes.
    pub fn total_size(&self) -> u64 {
        (HEADER_SIZE + FAT_ENTRY_SIZE * self.entries.len()) as u64
            + self.payloads.iter().map(|p| p.len() as u64).sum::<u64>()
    }

    /// Write the payload at `index` to `dest_dir`, named after its FAT
    /// entry. An existing file at that path is overwritten.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::IndexOutOfRange`] when `index` is past the end
    /// of the FAT, and [`Error::Io`] when the destination cannot be
    /// written.
    pub fn extract(&self, index: u32, dest_dir: impl AsRef<Path>) -> Result<()> {
        let entry = self
            .entry(index)
            .ok_or(Error::IndexOutOfRange(index, self.header.entry_count))?;

        let dest = dest_dir.as_ref().join(entry.name());
        fs::write(&dest, &self.payloads[index as usize])?;
        debug!("extracted {} to {}", entry.name(), dest.display());
        Ok(())
    }
}

/// Read `header.entry_count` FAT entries and validate them against the
/// stream length. Shared by [`Archive::parse`] and
/// [`fetch_file`][crate::fetch_file].
pub(crate) fn read_fat<R: Read>(f: &mut R, header: &Header, stream_len: u64) -> Result<Vec<FatEntry>> {
    // Refuse before allocating when the claimed FAT cannot even fit in the
    // stream; a corrupt entry count would otherwise drive allocation size.
    let fat_end =
        HEADER_SIZE as u64 + u64::from(header.entry_count) * FAT_ENTRY_SIZE as u64;
    if fat_end > stream_len {
        error!("FAT overruns stream: {fat_end} > {stream_len}");
        return Err(Error::Corrupt {
            expected: fat_end,
            actual: stream_len,
        });
    }

    let mut entries = Vec::with_capacity(header.entry_count as usize);
    for _ in 0..header.entry_count {
        entries.push(FatEntry::parse(f)?);
    }

    // The original format's only integrity rule: the final entry's extent
    // must land exactly on the end of the stream. An empty FAT is valid
    // only for a header-sized stream.
    let expected = entries.last().map_or(HEADER_SIZE as u64, FatEntry::end);
    if expected != stream_len {
        error!("archive extent mismatch: expected {expected}, stream has {stream_len}");
        return Err(Error::Corrupt {
            expected,
            actual: stream_len,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Archive with two real payloads and one placeholder in the middle.
    fn sample() -> Archive {
        let base = (HEADER_SIZE + 3 * FAT_ENTRY_SIZE) as u32;
        Archive::from_parts(
            Header {
                flags: 0,
                entry_count: 3,
            },
            vec![
                FatEntry::new("intro.txt", base, 5).unwrap(),
                FatEntry::new("missing.dat", base + 5, 0).unwrap(),
                FatEntry::new("tune.sng", base + 5, 9).unwrap(),
            ],
            vec![b"hello".to_vec(), Vec::new(), b"da-da-dum".to_vec()],
        )
    }

    #[test]
    fn round_trip_in_memory() {
        let archive = sample();

        let mut buf = Vec::new();
        let written = archive.write_to(&mut buf).unwrap();
        assert_eq!(written, buf.len() as u64);
        assert_eq!(written, archive.total_size());

        let parsed = Archive::parse(&mut Cursor::new(&buf), buf.len() as u64).unwrap();
        assert_eq!(parsed, archive);
        assert_eq!(parsed.file(0).unwrap(), b"hello");
        assert_eq!(parsed.file(1).unwrap(), b"");
        assert_eq!(parsed.file(2).unwrap(), b"da-da-dum");
        assert_eq!(parsed.entry(2).unwrap().name(), "tune.sng");
    }

    #[test]
    fn placeholder_does_not_shift_offsets() {
        let archive = sample();
        let base = (HEADER_SIZE + 3 * FAT_ENTRY_SIZE) as u32;

        assert_eq!(archive.entry(0).unwrap().offset, base);
        // The zero-length slot consumes no payload space
        assert_eq!(archive.entry(1).unwrap().offset, base + 5);
        assert_eq!(archive.entry(2).unwrap().offset, base + 5);
    }

    #[test]
    fn truncation_detected() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();
        buf.pop();

        let err = Archive::parse(&mut Cursor::new(&buf), buf.len() as u64).unwrap_err();
        assert!(matches!(err, Error::Corrupt { .. }), "actual error: {err:?}");
    }

    #[test]
    fn truncation_into_header_detected() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();

        // A stream too short to even hold the header is corrupt, not an
        // IO failure
        for keep in [HEADER_SIZE - 1, 10, 0] {
            buf.truncate(keep);
            let err = Archive::parse(&mut Cursor::new(&buf), buf.len() as u64).unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::Corrupt {
                        expected: 16,
                        actual,
                    } if actual == keep as u64
                ),
                "{keep}-byte stream gave: {err:?}",
            );
        }
    }

    #[test]
    fn trailing_garbage_detected() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();
        buf.push(0xFF);

        let err = Archive::parse(&mut Cursor::new(&buf), buf.len() as u64).unwrap_err();
        assert!(matches!(err, Error::Corrupt { .. }), "actual error: {err:?}");
    }

    #[test]
    fn lying_entry_count_detected() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();
        // Claim far more entries than the stream can hold
        buf[4..8].copy_from_slice(&u32::MAX.to_le_bytes());

        let err = Archive::parse(&mut Cursor::new(&buf), buf.len() as u64).unwrap_err();
        assert!(matches!(err, Error::Corrupt { .. }), "actual error: {err:?}");
    }

    #[test]
    fn index_out_of_range() {
        let archive = sample();
        assert!(archive.file(3).is_none());
        assert!(archive.file(u32::MAX).is_none());
        assert!(archive.entry(3).is_none());
    }

    #[test]
    fn empty_archive_round_trip() {
        let archive = Archive::from_parts(Header::default(), Vec::new(), Vec::new());
        assert!(archive.is_empty());

        let mut buf = Vec::new();
        let written = archive.write_to(&mut buf).unwrap();
        assert_eq!(written, HEADER_SIZE as u64);

        let parsed = Archive::parse(&mut Cursor::new(&buf), buf.len() as u64).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.len(), 0);
    }

    #[test]
    fn empty_archive_with_trailing_byte_is_corrupt() {
        let archive = Archive::from_parts(Header::default(), Vec::new(), Vec::new());
        let mut buf = Vec::new();
        archive.write_to(&mut buf).unwrap();
        buf.push(0);

        let err = Archive::parse(&mut Cursor::new(&buf), buf.len() as u64).unwrap_err();
        assert!(
            matches!(
                err,
                Error::Corrupt {
                    expected: 16,
                    actual: 17,
                }
            ),
            "actual error: {err:?}",
        );
    }
}
