//! Splice a bootblock and a packed payload into an OFS disk image.
//!
//! The ROM loads `load_len` bytes from sector 0 into a reserved allocation
//! of `alloc_len` bytes, then the depacker inflates in place.  Everything
//! here is sizing those two numbers, fixing the checksums, and keeping the
//! file system honest about which blocks the stream landed on.

use clap;
use log::{info,error};
use crate::bios::{bootblock,pack};
use crate::fs::{self,ofs};
use crate::img::adf::{self,Adf,BLOCK_SIZE,SECTORS_PER_TRACK,TRACK_COUNT};
use crate::STDRESULT;
use super::CommandError;

const RCH: &str = "unreachable was reached";

/// blocks of the exerciser area at the end of the disk, two tracks
const TAIL_BLOCKS: usize = 22;

fn round_up4(x: usize) -> usize {
    (x + 3) & !3usize
}

pub fn build(cmd: &clap::ArgMatches) -> STDRESULT {
    let bb_path = cmd.get_one::<String>("boot").expect(RCH);
    let pl_path = cmd.get_one::<String>("payload").expect(RCH);
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);

    let mut bb_dat = std::fs::read(bb_path)?;
    let pl_dat = std::fs::read(pl_path)?;
    let (pack_header,pl) = pack::strip(&pl_dat)?;
    let bb_len = bb_dat.len();
    let pl_len = pl.len();
    let inflated = pack_header.inflated_length as usize;

    if inflated == 0 {
        error!("payload claims zero decompressed length");
        return Err(Box::new(CommandError::OutOfRange));
    }

    // The load is whole sectors, so the last sector read carries slack
    // beyond the stream.  That slack eats into the depacker's overlap
    // margin and has to be paid back by widening the leeway.
    let pad = (BLOCK_SIZE - (bb_len + pl_len) % BLOCK_SIZE) % BLOCK_SIZE;
    let leeway = pack_header.leeway as usize + pad;
    let load_len = bb_len + pl_len + pad;
    let needed = match load_len > inflated {
        true => load_len,
        false => inflated
    };
    let alloc_len = round_up4(needed + leeway);
    bootblock::patch_sizes(&mut bb_dat,(alloc_len - load_len) as u32,load_len as u32)?;

    let img_dat = std::fs::read(img_path)?;
    let mut img = match Adf::from_bytes(&img_dat) {
        Some(img) => img,
        None => {
            error!("disk image is not an 880K ADF");
            return Err(Box::new(CommandError::UnknownFormat));
        }
    };
    if !ofs::Disk::test_img(&img) {
        error!("disk image does not carry an OFS volume");
        return Err(Box::new(fs::Error::FileSystemMismatch));
    }

    // splice the stream over the start of the image
    let mut stream = bb_dat;
    stream.extend_from_slice(&pl);
    for (iblock,chunk) in stream.chunks(BLOCK_SIZE).enumerate() {
        img.write_block(iblock,chunk)?;
    }

    // checksum spans both boot sectors, including the leading payload bytes
    let mut boot = img.read_block(0)?;
    boot.append(&mut img.read_block(1)?);
    bootblock::store_checksum(&mut boot)?;
    img.write_block(0,&boot[0..BLOCK_SIZE])?;
    img.write_block(1,&boot[BLOCK_SIZE..])?;

    let occupied = (stream.len() + BLOCK_SIZE - 1) / BLOCK_SIZE;
    let mut disk = ofs::Disk::from_img(img);
    disk.allocate_run(2,occupied)?;
    if cmd.get_flag("reserve-tail") {
        info!("allocating the exerciser tracks");
        disk.allocate_run(adf::BLOCK_COUNT - TAIL_BLOCKS,TAIL_BLOCKS)?;
    }
    crate::save_img(&mut disk,img_path)?;

    let track_bytes = SECTORS_PER_TRACK * BLOCK_SIZE;
    println!("bootblock + payload: {} bytes",stream.len());
    println!("load: {} bytes, compressed payload: {} bytes",load_len,pl_len);
    println!("allocation: {} bytes, decompressed payload: {} bytes",alloc_len,inflated);
    println!("occupies {} of {} tracks",(load_len + track_bytes - 1)/track_bytes,TRACK_COUNT);
    Ok(())
}
