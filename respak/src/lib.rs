//! # respak
//!
//! Reader and writer for RES archives: a minimal flat container format that
//! concatenates named files behind a file-allocation table (FAT), with
//! random-access retrieval by table index or by name.
//!
//! ## Format Structure
//!
//! All integers are little-endian. The payload region starts immediately
//! after the FAT, so every payload offset is known once the entry count is.
//!
//! ```text
//! Header   (16 bytes): flags u32 | entry_count u32 | reserved [u8; 8]
//! FAT      (24 bytes x entry_count):
//!          offset u32 | length u32 | name [u8; 16] (NUL-padded ASCII)
//! Payloads: raw file bytes, concatenated in FAT order
//! ```
//!
//! A zero-length entry is a placeholder for a source file that could not be
//! read when the archive was built; it keeps its name and table slot but
//! owns no payload bytes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use respak::{Archive, build, fetch_file};
//!
//! // Pack every file listed in the manifest, then write the archive.
//! let (archive, errors) = build("assets.txt", "assets/")?;
//! assert_eq!(errors, 0);
//! archive.save("assets.res")?;
//!
//! // Load it back and read a payload by index...
//! let archive = Archive::load("assets.res")?;
//! println!("first file: {} bytes", archive.file(0).unwrap().len());
//!
//! // ...or pull a single file by name without loading the rest.
//! let logo = fetch_file("assets.res", "logo.bmp")?;
//! println!("logo.bmp: {} bytes", logo.len());
//! # Ok::<(), respak::Error>(())
//! ```

pub mod archive;
pub mod builder;
pub mod error;
pub mod fetch;
pub mod header;
pub mod manifest;

pub use archive::Archive;
pub use builder::build;
pub use error::{Error, Result};
pub use fetch::fetch_file;
pub use header::{FAT_ENTRY_SIZE, FatEntry, HEADER_SIZE, Header, MAX_NAME_LEN, NAME_SLOT_SIZE};
