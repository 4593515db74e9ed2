// test of the OFS volume module
use adfkit::fs::ofs;
use adfkit::img::adf::{Adf,BLOCK_COUNT};

fn formatted_disk() -> ofs::Disk {
    let mut disk = ofs::Disk::from_img(Adf::create());
    let time = chrono::NaiveDate::from_ymd_opt(1989,11,10).unwrap().and_hms_opt(20,15,0).unwrap();
    disk.format(b"Workbench",Some(time)).expect("format failed");
    disk
}

#[test]
fn format() {
    let mut disk = formatted_disk();
    // root and bitmap blocks sum to zero with checksum included
    let img = disk.get_img();
    let root = img.read_block(880).expect("no root block");
    assert_eq!(ofs::zero_sum(&root),0);
    let bitmap = img.read_block(881).expect("no bitmap block");
    assert_eq!(ofs::zero_sum(&bitmap),0);
    assert!(ofs::Disk::test_img(img));
    assert_eq!(disk.volume_name().expect("no name"),b"Workbench".to_vec());
}

#[test]
fn format_reserves_fs_blocks() {
    let mut disk = formatted_disk();
    assert_eq!(disk.is_block_free(880).expect("range"),false);
    assert_eq!(disk.is_block_free(881).expect("range"),false);
    assert_eq!(disk.is_block_free(2).expect("range"),true);
    assert_eq!(disk.is_block_free(1759).expect("range"),true);
    // everything free except root and bitmap
    assert_eq!(disk.num_free_blocks().expect("count"),BLOCK_COUNT-4);
}

#[test]
fn format_datestamps() {
    let disk = formatted_disk();
    let t = disk.creation_date().expect("read failed").expect("bad stamp");
    assert_eq!(t.to_string(),"1989-11-10 20:15:00");
    let t = disk.alteration_date().expect("read failed").expect("bad stamp");
    assert_eq!(t.to_string(),"1989-11-10 20:15:00");
}

#[test]
fn bad_volume_names() {
    let mut disk = ofs::Disk::from_img(Adf::create());
    assert!(disk.format(b"",None).is_err());
    assert!(disk.format(&[0x41;31],None).is_err());
    assert!(disk.format(&[0x41;30],None).is_ok());
}

#[test]
fn allocate_across_long_boundary() {
    let mut disk = formatted_disk();
    // blocks 2..42 span bitmap bits 0..40, crossing the first long boundary
    disk.allocate_run(2,40).expect("allocation failed");
    for iblock in 2..42 {
        assert_eq!(disk.is_block_free(iblock).expect("range"),false);
    }
    assert_eq!(disk.is_block_free(42).expect("range"),true);
    assert_eq!(disk.num_free_blocks().expect("count"),BLOCK_COUNT-4-40);
}

#[test]
fn allocate_interior_run() {
    let mut disk = formatted_disk();
    // bits 26..36 straddle two longs without touching their edges
    disk.allocate_run(28,10).expect("allocation failed");
    assert_eq!(disk.is_block_free(27).expect("range"),true);
    assert_eq!(disk.is_block_free(28).expect("range"),false);
    assert_eq!(disk.is_block_free(37).expect("range"),false);
    assert_eq!(disk.is_block_free(38).expect("range"),true);
}

#[test]
fn double_allocation_fails_loudly() {
    let mut disk = formatted_disk();
    disk.allocate_run(2,10).expect("allocation failed");
    assert!(disk.allocate_run(8,10).is_err());
    // the failed call must not have touched anything beyond the first run
    assert_eq!(disk.is_block_free(12).expect("range"),true);
    // the bitmap block itself is never free, a run over it must fail
    assert!(disk.allocate_run(870,20).is_err());
}

#[test]
fn allocation_bounds() {
    let mut disk = formatted_disk();
    assert!(disk.allocate_run(0,2).is_err());
    assert!(disk.allocate_run(1750,11).is_err());
    assert!(disk.allocate_run(1750,10).is_ok());
}

#[test]
fn writeback_refreshes_checksum() {
    let mut disk = formatted_disk();
    disk.allocate_run(2,3).expect("allocation failed");
    let img = disk.get_img();
    let bitmap = img.read_block(881).expect("no bitmap block");
    assert_eq!(ofs::zero_sum(&bitmap),0);
    // first three data blocks now cleared in the first bitmap long
    let word = u32::from_be_bytes([bitmap[4],bitmap[5],bitmap[6],bitmap[7]]);
    assert_eq!(word & 0x7,0);
    assert_eq!(word >> 3 & 1,1);
}

#[test]
fn unformatted_image_is_refused() {
    let img = Adf::create();
    assert!(!ofs::Disk::test_img(&img));
}
