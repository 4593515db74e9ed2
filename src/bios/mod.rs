//! # BIOS Module
//!
//! This contains the machine-adjacent binary structures that are neither
//! a disk image nor a file system: the bootblock the Kickstart ROM
//! checksums and executes, the pack header the on-target depacker reads,
//! the AmigaDOS hunk container, and the Protracker module header.

pub mod bootblock;
pub mod pack;
pub mod hunk;
pub mod ptmod;

/// Enumerates errors in machine-level structures.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("signature does not match")]
    BadSignature,
    #[error("length is not longword aligned")]
    Misaligned,
    #[error("structure was truncated")]
    Truncated,
    #[error("field out of range")]
    OutOfRange
}
