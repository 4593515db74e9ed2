use clap;
use json;
use a2kit_macro::DiskStruct;
use crate::bios::bootblock::{self,BootBlockHeader};
use crate::fs::ofs;
use crate::img::adf;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

fn fmt_date(maybe_time: Option<chrono::NaiveDateTime>) -> json::JsonValue {
    match maybe_time {
        Some(t) => json::JsonValue::String(t.format("%Y-%m-%d %H:%M:%S").to_string()),
        None => json::JsonValue::Null
    }
}

pub fn stat(cmd: &clap::ArgMatches) -> STDRESULT {
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    let mut disk = crate::create_fs_from_file(img_path)?;
    let free = disk.num_free_blocks()?;
    let bitmap_ok = disk.bitmap_ok()?;
    let vol_name = disk.volume_name()?;
    let created = disk.creation_date()?;
    let altered = disk.alteration_date()?;
    let img = disk.get_img();
    let tracks = img.track_count();
    let mut boot = img.read_block(0)?;
    boot.append(&mut img.read_block(1)?);
    let boot_header = BootBlockHeader::from_bytes(&boot[0..BootBlockHeader::new().len()].to_vec())?;
    let obj = json::object! {
        fs_name: ofs::FS_NAME,
        volume_name: crate::escaped_ascii_from_bytes(&vol_name,true),
        created: fmt_date(created),
        altered: fmt_date(altered),
        block_size: adf::BLOCK_SIZE,
        total_blocks: adf::BLOCK_COUNT,
        tracks: tracks,
        free_blocks: free,
        used_blocks: adf::BLOCK_COUNT - 2 - free,
        bitmap_checksum_ok: bitmap_ok,
        boot_signature: boot_header.signature==bootblock::SIGNATURE,
        boot_root_block: u32::from_be_bytes(boot_header.root_block),
        boot_checksum_ok: bootblock::verify(&boot)
    };
    let s = match cmd.get_one::<u16>("indent") {
        Some(spaces) => json::stringify_pretty(obj,*spaces),
        None => json::stringify(obj)
    };
    println!("{}",s);
    return Ok(());
}
