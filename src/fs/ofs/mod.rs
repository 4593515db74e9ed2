//! ## OFS file system module
//!
//! This manipulates disk images containing one AmigaDOS Old File System volume.
//!
//! Only the volume structures needed by the boot floppy tools are handled:
//! the root block (880 on a double density disk), the bitmap block it points
//! to, and block allocation.  The bitmap is buffered in memory and written
//! back, with its checksum recomputed, when the underlying image is handed
//! out.  Directories and file headers are out of scope.

use chrono::Timelike;
use log::{trace,debug,error};
use crate::img::adf::{self,Adf,BLOCK_SIZE};
use crate::{DYNERR,STDRESULT};

pub const FS_NAME: &str = "ofs";

pub const ROOT_BLOCK: usize = 880;
/// bitmap block chosen by `format`; images from elsewhere may differ
pub const BITMAP_BLOCK: usize = 881;
/// longs in the root block hash table
pub const HT_SIZE: usize = 72;
/// bitmap page pointers in the root block
pub const BM_SIZE: usize = 25;
pub const MAX_NAME_LEN: usize = 30;
/// bitmap bits on a double density disk, blocks 0-1 are not represented
pub const BITMAP_BITS: usize = adf::BLOCK_COUNT - 2;

const T_HEADER: u32 = 2;
const ST_ROOT: u32 = 1;
const BM_VALID: u32 = 0xffffffff;

// byte offsets of the big endian longs within the root block
const OFF_TYPE: usize = 0x000;
const OFF_HT_SIZE: usize = 0x00c;
const OFF_CHKSUM: usize = 0x014;
const OFF_BM_FLAG: usize = 0x138;
/// long index 79, as patched by the boot floppy builder
const OFF_BM_PAGES: usize = 0x13c;
const OFF_R_DATE: usize = 0x1a4;
const OFF_NAME: usize = 0x1b0;
const OFF_V_DATE: usize = 0x1e4;
const OFF_C_DATE: usize = 0x1f0;
const OFF_SEC_TYPE: usize = 0x1fc;

const RCH: &str = "unreachable was reached";

fn get_u32(buf: &[u8],offset: usize) -> u32 {
    u32::from_be_bytes([buf[offset],buf[offset+1],buf[offset+2],buf[offset+3]])
}

fn put_u32(buf: &mut [u8],offset: usize,val: u32) {
    buf[offset..offset+4].copy_from_slice(&u32::to_be_bytes(val));
}

/// Wrapping sum of all complete big endian longs in the buffer.
/// AmigaDOS header blocks store the negation of this in their checksum
/// field, so a consistent block sums to zero.
pub fn zero_sum(buf: &[u8]) -> u32 {
    let mut sum: u32 = 0;
    for word in buf.chunks_exact(4) {
        sum = sum.wrapping_add(u32::from_be_bytes([word[0],word[1],word[2],word[3]]));
    }
    sum
}

/// AmigaDOS datestamp: days since 1978-01-01, minutes past midnight,
/// ticks (1/50 sec) past the minute.
fn pack_date(time: chrono::NaiveDateTime) -> [u32;3] {
    let ref_date = chrono::NaiveDate::from_ymd_opt(1978,1,1).expect(RCH);
    let days = time.date().signed_duration_since(ref_date).num_days();
    if days < 0 || days > u32::MAX as i64 {
        debug!("datestamp out of range, using day zero");
        return [0,0,0];
    }
    [days as u32, time.hour()*60 + time.minute(), time.second()*50]
}

fn unpack_date(stamp: [u32;3]) -> Option<chrono::NaiveDateTime> {
    let ref_date = chrono::NaiveDate::from_ymd_opt(1978,1,1).expect(RCH).and_hms_opt(0,0,0).expect(RCH);
    ref_date.checked_add_signed(
        chrono::Duration::days(stamp[0] as i64) +
        chrono::Duration::minutes(stamp[1] as i64) +
        chrono::Duration::milliseconds(stamp[2] as i64 * 20))
}

/// The primary interface for disk operations.
pub struct Disk {
    img: Adf,
    maybe_bitmap: Option<Vec<u8>>,
    bitmap_block: usize
}

impl Disk {
    /// Use the given image as storage for a new Disk.
    /// The Disk takes ownership of the image.
    /// The image may or may not be formatted.
    pub fn from_img(img: Adf) -> Self {
        Self {
            img,
            // bitmap buffer is designed to work transparently
            maybe_bitmap: None,
            bitmap_block: 0
        }
    }
    /// Test an image for the OFS file system.
    pub fn test_img(img: &Adf) -> bool {
        if let Ok(root) = img.read_block(ROOT_BLOCK) {
            if get_u32(&root,OFF_TYPE)!=T_HEADER || get_u32(&root,OFF_SEC_TYPE)!=ST_ROOT {
                debug!("root block type fields do not match");
                return false;
            }
            if get_u32(&root,OFF_HT_SIZE)!=HT_SIZE as u32 {
                debug!("peculiar hash table size {}",get_u32(&root,OFF_HT_SIZE));
                return false;
            }
            if zero_sum(&root)!=0 {
                debug!("root block checksum mismatch");
                return false;
            }
            return true;
        }
        debug!("root block was not readable");
        return false;
    }
    /// Open buffer if not already present.  Will usually be called indirectly.
    fn open_bitmap_buffer(&mut self) -> STDRESULT {
        if self.maybe_bitmap==None {
            let root = self.img.read_block(ROOT_BLOCK)?;
            let bptr = get_u32(&root,OFF_BM_PAGES) as usize;
            if bptr < 2 || bptr >= adf::BLOCK_COUNT {
                error!("bitmap pointer {} is out of range",bptr);
                return Err(Box::new(super::Error::FileSystemMismatch));
            }
            self.bitmap_block = bptr;
            self.maybe_bitmap = Some(self.img.read_block(bptr)?);
        }
        Ok(())
    }
    /// Get the buffer, if it doesn't exist it will be opened.
    fn get_bitmap_buffer(&mut self) -> Result<&mut Vec<u8>,DYNERR> {
        self.open_bitmap_buffer()?;
        if let Some(buf) = self.maybe_bitmap.as_mut() {
            return Ok(buf);
        }
        panic!("bitmap buffer failed to open");
    }
    /// Buffer needs to be written back, checksum refreshed, when an external
    /// caller asks, directly or indirectly, for the underlying image.
    fn writeback_bitmap_buffer(&mut self) -> STDRESULT {
        let mut buf = match self.maybe_bitmap.as_ref() {
            Some(bitmap) => bitmap.clone(),
            None => return Ok(())
        };
        put_u32(&mut buf,0,0);
        let sum = zero_sum(&buf);
        put_u32(&mut buf,0,sum.wrapping_neg());
        self.maybe_bitmap = Some(buf.clone());
        self.img.write_block(self.bitmap_block,&buf)
    }
    /// Mark `count` consecutive blocks starting at `first` as allocated.
    /// The run is processed one bitmap long at a time with a mask, so runs
    /// that straddle long boundaries cost no extra work.  If any targeted
    /// block is already allocated nothing is changed and an error returns.
    pub fn allocate_run(&mut self,first: usize,count: usize) -> STDRESULT {
        if first < 2 || first + count > adf::BLOCK_COUNT {
            error!("block run {}..{} is outside the bitmap",first,first+count);
            return Err(Box::new(super::Error::BlockOutOfRange));
        }
        let buf = self.get_bitmap_buffer()?;
        let end = first + count - 2;
        let mut bit = first - 2;
        while bit < end {
            let word = bit / 32;
            let lo = bit % 32;
            let hi = match end - word*32 {
                x if x > 32 => 32,
                x => x
            };
            let mask = match hi - lo {
                32 => u32::MAX,
                x => ((1u32 << x) - 1) << lo
            };
            let offset = 4 + word*4;
            let curr = get_u32(buf,offset);
            if curr & mask != mask {
                error!("bitmap long {} already has allocated blocks in the run",word);
                return Err(Box::new(super::Error::BlockAlreadyAllocated));
            }
            put_u32(buf,offset,curr & !mask);
            bit = word*32 + hi;
        }
        Ok(())
    }
    pub fn is_block_free(&mut self,iblock: usize) -> Result<bool,DYNERR> {
        if iblock < 2 || iblock >= adf::BLOCK_COUNT {
            return Err(Box::new(super::Error::BlockOutOfRange));
        }
        let buf = self.get_bitmap_buffer()?;
        let bit = iblock - 2;
        let word = get_u32(buf,4 + (bit/32)*4);
        Ok((word >> (bit%32)) & 1 > 0)
    }
    pub fn num_free_blocks(&mut self) -> Result<usize,DYNERR> {
        let mut free: usize = 0;
        for iblock in 2..adf::BLOCK_COUNT {
            if self.is_block_free(iblock)? {
                free += 1;
            }
        }
        Ok(free)
    }
    /// Checksum state of the bitmap block as stored in the image,
    /// pending buffer changes are not considered.
    pub fn bitmap_ok(&mut self) -> Result<bool,DYNERR> {
        self.open_bitmap_buffer()?;
        let stored = self.img.read_block(self.bitmap_block)?;
        Ok(zero_sum(&stored)==0)
    }
    /// Raw bytes of the volume name, often but not necessarily ASCII.
    pub fn volume_name(&self) -> Result<Vec<u8>,DYNERR> {
        let root = self.img.read_block(ROOT_BLOCK)?;
        let len = match root[OFF_NAME] as usize {
            x if x > MAX_NAME_LEN => MAX_NAME_LEN,
            x => x
        };
        Ok(root[OFF_NAME+1..OFF_NAME+1+len].to_vec())
    }
    pub fn creation_date(&self) -> Result<Option<chrono::NaiveDateTime>,DYNERR> {
        let root = self.img.read_block(ROOT_BLOCK)?;
        Ok(unpack_date([get_u32(&root,OFF_C_DATE),get_u32(&root,OFF_C_DATE+4),get_u32(&root,OFF_C_DATE+8)]))
    }
    pub fn alteration_date(&self) -> Result<Option<chrono::NaiveDateTime>,DYNERR> {
        let root = self.img.read_block(ROOT_BLOCK)?;
        Ok(unpack_date([get_u32(&root,OFF_V_DATE),get_u32(&root,OFF_V_DATE+4),get_u32(&root,OFF_V_DATE+8)]))
    }
    /// Format a disk with the OFS file system.  The image is zeroed, then
    /// the boot signature, root block, and bitmap block are laid down.
    /// `time` of None means use the current time for the datestamps.
    pub fn format(&mut self,vol_name: &[u8],time: Option<chrono::NaiveDateTime>) -> STDRESULT {
        if vol_name.len()==0 || vol_name.len()>MAX_NAME_LEN {
            error!("volume name must be 1-{} bytes",MAX_NAME_LEN);
            return Err(Box::new(super::Error::BadVolumeName));
        }
        trace!("formatting: zero all");
        for iblock in 0..adf::BLOCK_COUNT {
            self.img.write_block(iblock,&[0;BLOCK_SIZE])?;
        }

        // boot signature only, the disk is not bootable until `build` runs
        let mut boot = [0;BLOCK_SIZE];
        boot[0..4].copy_from_slice(&crate::bios::bootblock::SIGNATURE);
        self.img.write_block(0,&boot)?;

        trace!("formatting: root block");
        let stamp = pack_date(match time {
            Some(t) => t,
            None => chrono::Utc::now().naive_local()
        });
        let mut root = [0;BLOCK_SIZE];
        put_u32(&mut root,OFF_TYPE,T_HEADER);
        put_u32(&mut root,OFF_HT_SIZE,HT_SIZE as u32);
        put_u32(&mut root,OFF_BM_FLAG,BM_VALID);
        put_u32(&mut root,OFF_BM_PAGES,BITMAP_BLOCK as u32);
        for i in 0..3 {
            put_u32(&mut root,OFF_R_DATE+4*i,stamp[i]);
            put_u32(&mut root,OFF_V_DATE+4*i,stamp[i]);
            put_u32(&mut root,OFF_C_DATE+4*i,stamp[i]);
        }
        root[OFF_NAME] = vol_name.len() as u8;
        root[OFF_NAME+1..OFF_NAME+1+vol_name.len()].copy_from_slice(vol_name);
        put_u32(&mut root,OFF_SEC_TYPE,ST_ROOT);
        let sum = zero_sum(&root);
        put_u32(&mut root,OFF_CHKSUM,sum.wrapping_neg());
        self.img.write_block(ROOT_BLOCK,&root)?;

        trace!("formatting: bitmap");
        let mut bitmap = [0;BLOCK_SIZE];
        for word in 0..BITMAP_BITS/32 {
            put_u32(&mut bitmap,4 + word*4,u32::MAX);
        }
        // surplus bits in the last long stay zero
        put_u32(&mut bitmap,4 + (BITMAP_BITS/32)*4,(1u32 << (BITMAP_BITS%32)) - 1);
        for iblock in [ROOT_BLOCK,BITMAP_BLOCK] {
            let bit = iblock - 2;
            let offset = 4 + (bit/32)*4;
            let curr = get_u32(&bitmap,offset);
            put_u32(&mut bitmap,offset,curr & !(1u32 << (bit%32)));
        }
        let sum = zero_sum(&bitmap[4..]);
        put_u32(&mut bitmap,0,sum.wrapping_neg());
        self.img.write_block(BITMAP_BLOCK,&bitmap)?;

        self.maybe_bitmap = None;
        self.bitmap_block = 0;
        Ok(())
    }
    /// Get the underlying image, writing back any bitmap changes first.
    pub fn get_img(&mut self) -> &mut Adf {
        if let Err(e) = self.writeback_bitmap_buffer() {
            panic!("writeback of bitmap failed: {}",e);
        }
        &mut self.img
    }
}
