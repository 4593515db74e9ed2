//! ### Protracker module header
//!
//! A four channel Protracker module starts with a fixed 1084 byte header:
//! title, 31 sample descriptors, song position table, and the `M.K.`
//! signature.  Pattern data and sample data follow.  Nothing after the
//! header needs to be parsed to size the file, the totals fall out of the
//! descriptor arithmetic.

use binrw::BinRead;
use binrw::io::Cursor;
use log::error;
use crate::bios;
use crate::DYNERR;

pub const HEADER_BYTES: usize = 1084;
pub const SIGNATURE: [u8;4] = *b"M.K.";
pub const PATTERN_BYTES: usize = 1024;
pub const MAX_POSITIONS: usize = 128;

#[derive(BinRead,Debug,Clone)]
#[br(big)]
pub struct SampleHeader {
    pub name: [u8;22],
    /// length in 16 bit words
    pub length: u16,
    pub finetune: u8,
    pub volume: u8,
    pub repeat_start: u16,
    pub repeat_length: u16
}

#[derive(BinRead,Debug,Clone)]
#[br(big)]
pub struct ModuleHeader {
    pub name: [u8;20],
    pub samples: [SampleHeader;31],
    pub song_length: u8,
    pub restart: u8,
    pub positions: [u8;128],
    pub signature: [u8;4]
}

/// Everything the metadata printer reports, derived from the fixed header.
pub struct ModuleSummary {
    pub name: String,
    pub sample_bytes: usize,
    pub song_length: usize,
    pub patterns: usize,
    pub total_bytes: usize
}

impl ModuleSummary {
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        if dat.len() < HEADER_BYTES {
            error!("file smaller than a module header");
            return Err(Box::new(bios::Error::Truncated));
        }
        let header = match ModuleHeader::read(&mut Cursor::new(dat)) {
            Ok(h) => h,
            Err(e) => {
                error!("module header rejected: {}",e);
                return Err(Box::new(bios::Error::BadSignature));
            }
        };
        if header.signature != SIGNATURE {
            error!("signature is not M.K., maybe not a four channel module");
            return Err(Box::new(bios::Error::BadSignature));
        }
        let song_length = header.song_length as usize;
        if song_length == 0 || song_length > MAX_POSITIONS {
            error!("song length {} is out of range",song_length);
            return Err(Box::new(bios::Error::OutOfRange));
        }
        let mut sample_bytes: usize = 0;
        for sample in &header.samples {
            sample_bytes += sample.length as usize * 2;
        }
        let mut patterns: usize = 0;
        for pos in &header.positions[0..song_length] {
            if *pos as usize + 1 > patterns {
                patterns = *pos as usize + 1;
            }
        }
        let total_bytes = HEADER_BYTES + patterns*PATTERN_BYTES + sample_bytes;
        if total_bytes > dat.len() {
            error!("module claims {} bytes but file has {}",total_bytes,dat.len());
            return Err(Box::new(bios::Error::Truncated));
        }
        let name: Vec<u8> = header.name.iter().cloned().take_while(|b| *b!=0).collect();
        Ok(Self {
            name: crate::escaped_ascii_from_bytes(&name,true),
            sample_bytes,
            song_length,
            patterns,
            total_bytes
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_module(song_length: u8,max_pattern: u8,sample_words: u16) -> Vec<u8> {
        let mut dat = vec![0;HEADER_BYTES];
        dat[0..7].copy_from_slice(b"scoopex");
        // give the first sample some length
        dat[20+22..20+24].copy_from_slice(&u16::to_be_bytes(sample_words));
        dat[950] = song_length;
        // last played position uses the highest pattern
        dat[952+song_length as usize-1] = max_pattern;
        dat[1080..1084].copy_from_slice(&SIGNATURE);
        let body = (max_pattern as usize+1)*PATTERN_BYTES + sample_words as usize*2;
        dat.append(&mut vec![0;body]);
        dat
    }

    #[test]
    fn summary_arithmetic() {
        let dat = fake_module(4,2,100);
        let summary = ModuleSummary::from_bytes(&dat).expect("parse failed");
        assert_eq!(summary.name,"scoopex");
        assert_eq!(summary.sample_bytes,200);
        assert_eq!(summary.song_length,4);
        assert_eq!(summary.patterns,3);
        assert_eq!(summary.total_bytes,HEADER_BYTES+3*PATTERN_BYTES+200);
    }

    #[test]
    fn truncated_module_rejected() {
        let mut dat = fake_module(4,2,100);
        dat.truncate(HEADER_BYTES+100);
        assert!(ModuleSummary::from_bytes(&dat).is_err());
    }

    #[test]
    fn wrong_signature_rejected() {
        let mut dat = fake_module(1,0,0);
        dat[1080] = b'X';
        assert!(ModuleSummary::from_bytes(&dat).is_err());
    }
}
