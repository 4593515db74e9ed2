//! ## Support for ADF disk images
//!
//! ADF images are a simple sequential dump of the already-decoded sector data
//! of an Amiga double density floppy: 80 cylinders, 2 heads, 11 sectors of
//! 512 bytes, 901120 bytes in all.  There is no header and no metadata;
//! whether the image carries a file system cannot be known at this layer.

use log::error;
use crate::img;
use crate::{STDRESULT,DYNERR};

pub const BLOCK_SIZE: usize = 512;
/// blocks on a double density floppy, 80 cylinders * 2 heads * 11 sectors
pub const BLOCK_COUNT: usize = 1760;
pub const SECTORS_PER_TRACK: usize = 11;
pub const TRACK_COUNT: usize = 160;
pub const DISK_BYTES: usize = BLOCK_COUNT * BLOCK_SIZE;

/// Wrapper for ADF data.
pub struct Adf {
    data: Vec<u8>
}

impl Adf {
    /// Create a zero filled 880K image.
    pub fn create() -> Self {
        Self {
            data: vec![0;DISK_BYTES]
        }
    }
    /// Accept a bytestream as an ADF if and only if it is exactly 880K.
    pub fn from_bytes(data: &Vec<u8>) -> Option<Self> {
        if data.len()!=DISK_BYTES {
            return None;
        }
        Some(Self {
            data: data.clone()
        })
    }
    pub fn byte_capacity(&self) -> usize {
        self.data.len()
    }
    pub fn track_count(&self) -> usize {
        TRACK_COUNT
    }
    pub fn read_block(&self,iblock: usize) -> Result<Vec<u8>,DYNERR> {
        if iblock>=BLOCK_COUNT {
            error!("block {} is beyond the end of the disk",iblock);
            return Err(Box::new(img::Error::GeometryMismatch));
        }
        Ok(self.data[iblock*BLOCK_SIZE..(iblock+1)*BLOCK_SIZE].to_vec())
    }
    /// Write a block of data.  If `dat` is shorter than the block the
    /// remainder is zero filled, matching sector padding on a real disk.
    pub fn write_block(&mut self,iblock: usize,dat: &[u8]) -> STDRESULT {
        if iblock>=BLOCK_COUNT {
            error!("block {} is beyond the end of the disk",iblock);
            return Err(Box::new(img::Error::GeometryMismatch));
        }
        if dat.len()>BLOCK_SIZE {
            return Err(Box::new(img::Error::ImageSizeMismatch));
        }
        let mut padded = dat.to_vec();
        padded.resize(BLOCK_SIZE,0);
        self.data[iblock*BLOCK_SIZE..(iblock+1)*BLOCK_SIZE].copy_from_slice(&padded);
        Ok(())
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }
}

#[test]
fn block_addressing() {
    let mut img = Adf::create();
    assert_eq!(img.byte_capacity(),901120);
    img.write_block(880,&[0xde,0xad]).expect("write failed");
    let buf = img.read_block(880).expect("read failed");
    assert_eq!(buf[0..2],[0xde,0xad]);
    assert_eq!(buf[2],0);
    assert!(img.read_block(1760).is_err());
}
