use clap;
use log::warn;
use crate::fs::ofs;
use crate::img::adf::{Adf,DISK_BYTES};
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn mkdsk(cmd: &clap::ArgMatches) -> STDRESULT {
    let str_vol = cmd.get_one::<String>("volume").expect(RCH);
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    if let Some(ext) = img_path.split('.').last() {
        if ext.to_lowercase()!="adf" && ext!=img_path.as_str() {
            warn!("extension is `{}`, expected `adf`",ext);
        }
    }
    let vol_name = crate::parse_escaped_ascii(str_vol);
    let mut disk = ofs::Disk::from_img(Adf::create());
    disk.format(&vol_name,None)?;
    eprintln!("writing {} bytes",DISK_BYTES);
    crate::save_img(&mut disk,img_path)
}
