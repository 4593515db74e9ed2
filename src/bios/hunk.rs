//! ### AmigaDOS hunk container
//!
//! The executables handled here have exactly one loadable code hunk and no
//! relocations: HUNK_HEADER with a single table entry, HUNK_CODE with the
//! longword count and the code itself, HUNK_END.  `wrap` produces that
//! container from a raw binary; `unwrap` accepts only that shape back and
//! returns the code, which is how the depacker test rig marshals its input.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use log::error;
use crate::bios;
use crate::DYNERR;

pub const HUNK_CODE: u32 = 0x3e9;
pub const HUNK_END: u32 = 0x3f2;
pub const HUNK_HEADER: u32 = 0x3f3;

/// Enumerates the hunk types that can appear in a load file, available conversions are:
/// * Type to u32: `as u32`
/// * u32 to Type: `FromPrimitive::from_u32`
#[derive(FromPrimitive,PartialEq,Clone,Copy,Debug)]
pub enum HunkType {
    Code = 0x3e9,
    Data = 0x3ea,
    Bss = 0x3eb,
    Reloc32 = 0x3ec,
    End = 0x3f2,
    Header = 0x3f3
}

fn get_u32(dat: &[u8],offset: usize) -> Result<u32,DYNERR> {
    if offset+4 > dat.len() {
        error!("hunk structure was cut short");
        return Err(Box::new(bios::Error::Truncated));
    }
    Ok(u32::from_be_bytes([dat[offset],dat[offset+1],dat[offset+2],dat[offset+3]]))
}

/// Wrap a raw binary as a single hunk load file.
pub fn wrap(code: &[u8]) -> Result<Vec<u8>,DYNERR> {
    if code.len() % 4 != 0 {
        error!("input is not longword padded");
        return Err(Box::new(bios::Error::Misaligned));
    }
    let longs = (code.len()/4) as u32;
    let mut ans: Vec<u8> = Vec::new();
    for word in [HUNK_HEADER,0,1,0,0,longs,HUNK_CODE,longs] {
        ans.append(&mut u32::to_be_bytes(word).to_vec());
    }
    ans.append(&mut code.to_vec());
    ans.append(&mut u32::to_be_bytes(HUNK_END).to_vec());
    Ok(ans)
}

/// Accept a single hunk load file and give back the raw code.
pub fn unwrap(dat: &[u8]) -> Result<Vec<u8>,DYNERR> {
    match FromPrimitive::from_u32(get_u32(dat,0)?) {
        Some(HunkType::Header) => {},
        _ => {
            error!("hunk header id missing");
            return Err(Box::new(bios::Error::BadSignature));
        }
    }
    let resident = get_u32(dat,4)?;
    let table_size = get_u32(dat,8)?;
    let first = get_u32(dat,12)?;
    let last = get_u32(dat,16)?;
    if resident!=0 || table_size!=1 || first!=0 || last!=0 {
        error!("not a single hunk load file");
        return Err(Box::new(bios::Error::OutOfRange));
    }
    let alloc_longs = get_u32(dat,20)?;
    match FromPrimitive::from_u32(get_u32(dat,24)?) {
        Some(HunkType::Code) => {},
        other => {
            error!("expected code hunk, got {:?}",other);
            return Err(Box::new(bios::Error::BadSignature));
        }
    }
    let longs = get_u32(dat,28)? as usize;
    if longs as u32 != alloc_longs {
        error!("code hunk length disagrees with header table");
        return Err(Box::new(bios::Error::OutOfRange));
    }
    if dat.len() < 32 + longs*4 + 4 {
        error!("hunk structure was cut short");
        return Err(Box::new(bios::Error::Truncated));
    }
    match FromPrimitive::from_u32(get_u32(dat,32+longs*4)?) {
        Some(HunkType::End) => {},
        _ => {
            error!("hunk end id missing");
            return Err(Box::new(bios::Error::BadSignature));
        }
    }
    Ok(dat[32..32+longs*4].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_round_trip() {
        let code: Vec<u8> = (0..32).collect();
        let exe = wrap(&code).expect("wrap failed");
        assert_eq!(exe.len(),32+code.len()+4);
        assert_eq!(exe[0..4],u32::to_be_bytes(HUNK_HEADER));
        assert_eq!(exe[20..24],u32::to_be_bytes(8));
        assert_eq!(unwrap(&exe).expect("unwrap failed"),code);
    }

    #[test]
    fn unaligned_input_rejected() {
        assert!(wrap(&[1,2,3]).is_err());
    }

    #[test]
    fn multi_hunk_rejected() {
        let mut exe = wrap(&[0;8]).expect("wrap failed");
        exe[11] = 2; // table size
        assert!(unwrap(&exe).is_err());
    }
}
