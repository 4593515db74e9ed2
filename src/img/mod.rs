//! # Disk Image Module
//!
//! The only image container handled here is the ADF, a flat byte-for-byte
//! dump of an Amiga double density floppy.  The `Adf` object hands out
//! 512 byte blocks; it does not try to interpret a file system.
//! Imposing a file system on the decoded blocks is the business of the
//! `fs` module.

pub mod adf;

/// Enumerates disk image errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("image size did not match the request")]
    ImageSizeMismatch,
    #[error("geometric coordinate out of range")]
    GeometryMismatch
}
