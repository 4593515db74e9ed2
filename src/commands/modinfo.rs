use clap;
use colored::*;
use crate::bios::ptmod::{ModuleSummary,PATTERN_BYTES};
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn modinfo(cmd: &clap::ArgMatches) -> STDRESULT {
    let path = cmd.get_one::<String>("file").expect(RCH);
    let dat = std::fs::read(path)?;
    let summary = ModuleSummary::from_bytes(&dat)?;
    println!("Name: {}",summary.name.bold());
    println!("Sample Data: {}",summary.sample_bytes);
    println!("Song Length: {}",summary.song_length);
    println!("Nr Patterns: {} ({} bytes)",summary.patterns,summary.patterns*PATTERN_BYTES);
    println!("Total Bytes: {} (0x{:x})",summary.total_bytes,summary.total_bytes);
    if summary.total_bytes < dat.len() {
        println!("{} trailing bytes beyond the module",dat.len()-summary.total_bytes);
    }
    Ok(())
}
