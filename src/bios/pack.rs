//! ### Pack header
//!
//! Compressed payloads arrive as a DEFLATE stream wrapped in a 12 byte big
//! endian header and a 2 byte trailer.  The header carries the decompressed
//! length and the leeway, the scratch margin the in-place depacker needs
//! beyond the decompressed length.  The trailer is a CRC-16/CCITT of the
//! decompressed data; it is checked on the target, not here.  Both wrapper
//! pieces are stripped before the stream goes onto the disk.

use binrw::BinRead;
use binrw::io::Cursor;
use log::error;
use crate::bios;
use crate::DYNERR;

pub const SIGNATURE: [u8;4] = *b"DGZ1";
pub const HEADER_BYTES: usize = 12;
pub const TRAILER_BYTES: usize = 2;

#[derive(BinRead,Debug,Clone)]
#[br(big, magic = b"DGZ1")]
pub struct PackHeader {
    pub inflated_length: u32,
    pub flags: u16,
    pub leeway: u16
}

/// Parse the header and return it along with the bare DEFLATE stream.
pub fn strip(payload: &[u8]) -> Result<(PackHeader,Vec<u8>),DYNERR> {
    if payload.len() < HEADER_BYTES + TRAILER_BYTES {
        error!("payload smaller than its wrapper");
        return Err(Box::new(bios::Error::Truncated));
    }
    let header = match PackHeader::read(&mut Cursor::new(payload)) {
        Ok(h) => h,
        Err(e) => {
            error!("payload header rejected: {}",e);
            return Err(Box::new(bios::Error::BadSignature));
        }
    };
    Ok((header,payload[HEADER_BYTES..payload.len()-TRAILER_BYTES].to_vec()))
}

/// Wrap a stream the way the compressor does, used when testing the builder.
pub fn wrap(stream: &[u8],inflated_length: u32,leeway: u16,crc: u16) -> Vec<u8> {
    let mut ans = SIGNATURE.to_vec();
    ans.append(&mut u32::to_be_bytes(inflated_length).to_vec());
    ans.append(&mut u16::to_be_bytes(0).to_vec());
    ans.append(&mut u16::to_be_bytes(leeway).to_vec());
    ans.append(&mut stream.to_vec());
    ans.append(&mut u16::to_be_bytes(crc).to_vec());
    ans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_round_trip() {
        let wrapped = wrap(&[1,2,3,4,5],4096,8,0xbeef);
        assert_eq!(wrapped.len(),5+HEADER_BYTES+TRAILER_BYTES);
        let (header,stream) = strip(&wrapped).expect("strip failed");
        assert_eq!(header.inflated_length,4096);
        assert_eq!(header.leeway,8);
        assert_eq!(stream,vec![1,2,3,4,5]);
    }

    #[test]
    fn bad_signature_rejected() {
        let mut wrapped = wrap(&[0;16],64,0,0);
        wrapped[0] = b'X';
        assert!(strip(&wrapped).is_err());
    }
}
