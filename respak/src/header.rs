//! RES header and FAT entry wire codec
//!
//! Handles the two fixed-size records of the format: the 16-byte archive
//! header and the 24-byte FAT entry. All integers are little-endian.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::{Error, Result};

/// Size of the archive header on the wire.
pub const HEADER_SIZE: usize = 16;

/// Size of one FAT entry on the wire.
pub const FAT_ENTRY_SIZE: usize = 24;

/// Size of the fixed name slot inside a FAT entry.
pub const NAME_SLOT_SIZE: usize = 16;

/// Longest permitted entry name. The slot keeps one byte for the
/// terminating NUL.
pub const MAX_NAME_LEN: usize = NAME_SLOT_SIZE - 1;

/// Fixed-size archive header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Reserved flag bits. Always 0 in this format revision.
    pub flags: u32,

    /// Number of FAT entries (and payloads) in the archive.
    pub entry_count: u32,
}

impl Header {
    /// Parse a header from the stream's current position.
    ///
    /// The 8 reserved trailing bytes are consumed and ignored.
    pub fn parse<R: Read>(f: &mut R) -> Result<Self> {
        let flags = f.read_u32::<LittleEndian>()?;
        let entry_count = f.read_u32::<LittleEndian>()?;
        let mut reserved = [0; 8];
        f.read_exact(&mut reserved)?;
        Ok(Self { flags, entry_count })
    }

    /// Serialize the header, writing the reserved bytes as zeroes.
    pub fn write_to<W: Write>(&self, f: &mut W) -> Result<()> {
        f.write_u32::<LittleEndian>(self.flags)?;
        f.write_u32::<LittleEndian>(self.entry_count)?;
        f.write_all(&[0; 8])?;
        Ok(())
    }
}

/// One FAT record: where a payload lives in the stream, and its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatEntry {
    /// Byte offset of the payload from the start of the stream.
    pub offset: u32,

    /// Payload size in bytes.
    ///
    /// Zero marks a placeholder for a source file that could not be read
    /// when the archive was built.
    pub length: u32,

    /// Entry name. Validated against the name contract on construction, so
    /// it always fits the wire slot.
    name: String,
}

impl FatEntry {
    /// Create an entry, validating `name` against the name contract:
    /// 1 to [`MAX_NAME_LEN`] ASCII bytes, no NUL, no `/` or `\`.
    pub fn new(name: &str, offset: u32, length: u32) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            offset,
            length,
            name: name.to_string(),
        })
    }

    /// The entry's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse an entry from the stream's current position.
    ///
    /// The name slot is read up to the first NUL. A slot with no NUL at all
    /// (a 16-byte name, which this implementation never writes) fails with
    /// [`Error::InvalidName`] rather than being truncated.
    pub fn parse<R: Read>(f: &mut R) -> Result<Self> {
        let offset = f.read_u32::<LittleEndian>()?;
        let length = f.read_u32::<LittleEndian>()?;

        let mut slot = [0; NAME_SLOT_SIZE];
        f.read_exact(&mut slot)?;
        let end = slot.iter().position(|b| *b == 0).unwrap_or(NAME_SLOT_SIZE);
        let name = String::from_utf8_lossy(&slot[..end]).into_owned();
        validate_name(&name)?;

        Ok(Self {
            offset,
            length,
            name,
        })
    }

    /// Serialize the entry, NUL-padding the name slot.
    pub fn write_to<W: Write>(&self, f: &mut W) -> Result<()> {
        f.write_u32::<LittleEndian>(self.offset)?;
        f.write_u32::<LittleEndian>(self.length)?;

        let mut slot = [0; NAME_SLOT_SIZE];
        slot[..self.name.len()].copy_from_slice(self.name.as_bytes());
        f.write_all(&slot)?;
        Ok(())
    }

    /// End of this entry's payload within the stream.
    #[inline]
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }
}

/// Checks a name against the FAT name contract.
fn validate_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii() && b != 0 && b != b'/' && b != b'\\');

    if ok {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}
