//! # `adfkit` main library
//!
//! This library manipulates Amiga disk images for emulators and real
//! hardware, with emphasis on building bootable floppies from a bootblock
//! and a packed payload.
//!
//! ## Architecture
//!
//! Disk operations are split across three modules:
//! * `img` holds the raw 880K image and hands out 512 byte blocks, it does
//!   not try to interpret a file system
//! * `fs` imposes the Old File System on the decoded blocks: root block,
//!   bitmap block, and block allocation
//! * `bios` has the machine-level structures that live inside blocks or
//!   files: the bootblock the ROM checksums, the pack header the depacker
//!   reads, the AmigaDOS hunk container, and the Protracker header
//!
//! When an `fs::ofs::Disk` object is created it takes ownership of an
//! `img::adf::Adf`.  It then uses this owned image as storage.  Any changes
//! are not permanent until the image is saved to whatever file system is
//! hosting adfkit.
//!
//! ## Building a boot floppy
//!
//! The `build` subcommand splices a bootblock and payload over the start of
//! an OFS image, sizes the load and allocation lengths the loader needs,
//! recomputes the bootblock checksum, and marks the occupied blocks in the
//! OFS bitmap.  Every failure along the way is a contract violation and
//! aborts the run; the image is only consistent if the command succeeds.

pub mod fs;
pub mod bios;
pub mod img;
pub mod commands;

use img::adf::Adf;
use fs::ofs;
use std::fmt::Write;
use log::{warn,info};
use regex::Regex;
use hex;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Save the image file (make changes permanent)
pub fn save_img(disk: &mut ofs::Disk,img_path: &str) -> STDRESULT {
    std::fs::write(img_path,disk.get_img().to_bytes())?;
    Ok(())
}

/// Given a path return an ADF image without any file system check.
pub fn create_img_from_file(img_path: &str) -> Result<Adf,DYNERR> {
    let disk_img_data = std::fs::read(img_path)?;
    match Adf::from_bytes(&disk_img_data) {
        Some(img) => Ok(img),
        None => {
            warn!("file size does not match an 880K floppy");
            Err(Box::new(img::Error::ImageSizeMismatch))
        }
    }
}

/// Given a path return a DiskFS, or Err if the image does not carry
/// a recognizable OFS volume.  The file system takes ownership of the image.
pub fn create_fs_from_file(img_path: &str) -> Result<ofs::Disk,DYNERR> {
    let img = create_img_from_file(img_path)?;
    if ofs::Disk::test_img(&img) {
        info!("identified OFS file system");
        return Ok(ofs::Disk::from_img(img));
    }
    warn!("cannot match any file system");
    Err(Box::new(fs::Error::FileSystemMismatch))
}

/// Display binary to stdout in columns of hex and ascii
pub fn display_block(start_addr: usize,block: &Vec<u8>) {
    let mut slice_start = 0;
    loop {
        let row_label = start_addr + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = block[slice_start..slice_end].to_vec();
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        print!("{:06X} : ",row_label);
        for byte in slice {
            print!("{:02X} ",byte);
        }
        for _blank in slice_end..slice_start+16 {
            print!("   ");
        }
        println!("|  {}",String::from_utf8_lossy(&txt));
        slice_start += 16;
        if slice_end==block.len() {
            break;
        }
    }
}

/// This takes any bytes and makes an ascii friendly string
/// by using hex escapes, e.g., `\xFF`.
/// if `escape_cc` is true, ascii control characters are also escaped.
/// This is intended for volume names and similar short strings.
pub fn escaped_ascii_from_bytes(bytes: &Vec<u8>,escape_cc: bool) -> String {
    let mut result = String::new();
    let (lb,ub) = match escape_cc {
        true => (0x20,0x7e),
        false => (0x00,0x7f)
    };
    for i in 0..bytes.len() {
        if bytes[i]>=lb && bytes[i]<=ub {
            result += std::str::from_utf8(&[bytes[i]]).expect("unreachable");
        } else {
            let mut temp = String::new();
            write!(&mut temp,"\\x{:02X}",bytes[i]).expect("unreachable");
            result += &temp;
        }
    }
    return result;
}

/// Interpret a UTF8 string as pure ascii and put into bytes.
/// Non-ascii characters are omitted from the result, but arbitrary
/// bytes can be introduced using escapes, e.g., `\xFF`.
/// Literal hex escapes are created by coding the backslash, e.g., `\x5CxFF`.
/// This is suitable for volume names; case is preserved.
pub fn parse_escaped_ascii(s: &str) -> Vec<u8> {
    let mut ans: Vec<u8> = Vec::new();
    let hex_patt = Regex::new(r"\\x[0-9A-Fa-f][0-9A-Fa-f]").expect("unreachable");
    let mut hexes = hex_patt.find_iter(s);
    let mut maybe_hex = hexes.next();
    let mut curs = 0;
    let mut skip = 0;
    for c in s.chars() {

        if skip>0 {
            skip -= 1;
            continue;
        }
        if let Some(hex) = maybe_hex {
            if curs==hex.start() {
                ans.append(&mut hex::decode(s.get(curs+2..curs+4).unwrap()).expect("unreachable"));
                curs += 4;
                maybe_hex = hexes.next();
                skip = 3;
                continue;
            }
        }

        if c.is_ascii() {
            let mut buf: [u8;1] = [0;1];
            c.encode_utf8(&mut buf);
            ans.push(buf[0]);
        }
        curs += 1;
    }
    return ans;
}

#[test]
fn test_escaped_ascii() {
    assert_eq!(parse_escaped_ascii("Workbench"),b"Workbench".to_vec());
    assert_eq!(parse_escaped_ascii("A\\xFFB"),vec![0x41,0xff,0x42]);
    let round = escaped_ascii_from_bytes(&vec![0x41,0xff,0x42],true);
    assert_eq!(round,"A\\xFFB");
    assert_eq!(parse_escaped_ascii(&round),vec![0x41,0xff,0x42]);
}
