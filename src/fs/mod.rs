//! # File System Module
//!
//! File system modules impose structure on an already decoded disk image.
//! There is a sub-module for each supported file system; at present only
//! the AmigaDOS Old File System (OFS) is handled, and only at the volume
//! level: root block, bitmap block, and block allocation.  Directories and
//! files are out of scope; the boot floppies built here bypass the file
//! system entirely once the bitmap is consistent.
//!
//! Block addressing at this level is always the flat block number used by
//! the `img` module; OFS has no skew of its own.

pub mod ofs;

/// Enumerates file system errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("file system not compatible with request")]
    FileSystemMismatch,
    #[error("block is outside the bitmap range")]
    BlockOutOfRange,
    #[error("block is already allocated")]
    BlockAlreadyAllocated,
    #[error("volume name is invalid")]
    BadVolumeName
}
