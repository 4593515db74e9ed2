// end to end test of the boot floppy builder
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use std::path::Path;
use adfkit::bios::{bootblock,pack};

type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// bootblock binary: DOS signature, zero checksum, root pointer,
/// deterministic filler standing in for bootstrap code
fn fake_bootblock(len: usize) -> Vec<u8> {
    let mut bb = vec![0;len];
    bb[0..4].copy_from_slice(&bootblock::SIGNATURE);
    bb[8..12].copy_from_slice(&u32::to_be_bytes(880));
    for i in 12..len {
        bb[i] = (i as u8).wrapping_mul(101);
    }
    bb
}

fn fake_payload(stream_len: usize,inflated: u32,leeway: u16) -> Vec<u8> {
    let stream: Vec<u8> = (0..stream_len).map(|i| (i as u8).wrapping_mul(7)).collect();
    pack::wrap(&stream,inflated,leeway,0x1234)
}

fn mkdsk(dimg_path: &Path) {
    let mut cmd = Command::cargo_bin("adfkit").expect("binary not found");
    cmd.arg("mkdsk")
        .arg("-v").arg("TestFloppy").arg("-d").arg(dimg_path)
        .assert()
        .success();
}

#[test]
fn sizing_arithmetic() -> STDRESULT {
    let dir = tempfile::tempdir()?;
    let bb_path = dir.path().join("bootblock.bin");
    let pl_path = dir.path().join("payload.dgz");
    let dimg_path = dir.path().join("test.adf");
    std::fs::write(&bb_path,fake_bootblock(256))?;
    std::fs::write(&pl_path,fake_payload(1000,4096,8))?;
    mkdsk(&dimg_path);

    let mut cmd = Command::cargo_bin("adfkit")?;
    cmd.arg("build")
        .arg("-b").arg(&bb_path).arg("-p").arg(&pl_path).arg("-d").arg(&dimg_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("load: 1536 bytes"))
        .stdout(predicate::str::contains("allocation: 4384 bytes"));

    // pad = 512 - 1256 % 512 = 280, leeway = 288, load = 1536,
    // alloc = round4(max(1536,4096) + 288) = 4384, extra = 2848
    let img = std::fs::read(&dimg_path)?;
    assert_eq!(img[248..252],u32::to_be_bytes(2848));
    assert_eq!(img[252..256],u32::to_be_bytes(1536));
    Ok(())
}

#[test]
fn checksum_round_trip() -> STDRESULT {
    let dir = tempfile::tempdir()?;
    let bb_path = dir.path().join("bootblock.bin");
    let pl_path = dir.path().join("payload.dgz");
    let dimg_path = dir.path().join("test.adf");
    std::fs::write(&bb_path,fake_bootblock(512))?;
    std::fs::write(&pl_path,fake_payload(3000,8000,16))?;
    mkdsk(&dimg_path);

    Command::cargo_bin("adfkit")?
        .arg("build")
        .arg("-b").arg(&bb_path).arg("-p").arg(&pl_path).arg("-d").arg(&dimg_path)
        .assert()
        .success();

    let img = std::fs::read(&dimg_path)?;
    // independent recomputation of the ROM fold over the produced bytes
    assert!(bootblock::verify(&img[0..1024]));
    assert_eq!(bootblock::folded_sum(&img[0..1024],0),0xffffffff);
    // stored checksum is not trivial
    assert_ne!(img[4..8],[0;4]);
    // payload follows the bootblock byte for byte
    assert_eq!(img[512],0);
    assert_eq!(img[513],7);
    assert_eq!(img[514],14);
    Ok(())
}

#[test]
fn bitmap_allocation() -> STDRESULT {
    let dir = tempfile::tempdir()?;
    let bb_path = dir.path().join("bootblock.bin");
    let pl_path = dir.path().join("payload.dgz");
    let dimg_path = dir.path().join("test.adf");
    std::fs::write(&bb_path,fake_bootblock(256))?;
    std::fs::write(&pl_path,fake_payload(1000,4096,8))?;
    mkdsk(&dimg_path);

    Command::cargo_bin("adfkit")?
        .arg("build")
        .arg("-b").arg(&bb_path).arg("-p").arg(&pl_path).arg("-d").arg(&dimg_path)
        .assert()
        .success();

    // stream is 1256 bytes, so ceil(1256/512) = 3 blocks from block 2
    let mut disk = adfkit::create_fs_from_file(dimg_path.to_str().unwrap())?;
    for iblock in 2..5 {
        assert_eq!(disk.is_block_free(iblock)?,false);
    }
    assert_eq!(disk.is_block_free(5)?,true);
    assert_eq!(disk.is_block_free(1738)?,true);
    // bitmap checksum was refreshed on the way out
    assert_eq!(disk.bitmap_ok()?,true);
    Ok(())
}

#[test]
fn reserve_tail_allocates_last_tracks() -> STDRESULT {
    let dir = tempfile::tempdir()?;
    let bb_path = dir.path().join("bootblock.bin");
    let pl_path = dir.path().join("payload.dgz");
    let dimg_path = dir.path().join("test.adf");
    std::fs::write(&bb_path,fake_bootblock(256))?;
    std::fs::write(&pl_path,fake_payload(1000,4096,8))?;
    mkdsk(&dimg_path);

    Command::cargo_bin("adfkit")?
        .arg("build")
        .arg("-b").arg(&bb_path).arg("-p").arg(&pl_path).arg("-d").arg(&dimg_path)
        .arg("--reserve-tail")
        .assert()
        .success();

    let mut disk = adfkit::create_fs_from_file(dimg_path.to_str().unwrap())?;
    assert_eq!(disk.is_block_free(1737)?,true);
    for iblock in 1738..1760 {
        assert_eq!(disk.is_block_free(iblock)?,false);
    }
    Ok(())
}

#[test]
fn rebuild_without_reformat_fails() -> STDRESULT {
    let dir = tempfile::tempdir()?;
    let bb_path = dir.path().join("bootblock.bin");
    let pl_path = dir.path().join("payload.dgz");
    let dimg_path = dir.path().join("test.adf");
    std::fs::write(&bb_path,fake_bootblock(256))?;
    std::fs::write(&pl_path,fake_payload(1000,4096,8))?;
    mkdsk(&dimg_path);

    Command::cargo_bin("adfkit")?
        .arg("build")
        .arg("-b").arg(&bb_path).arg("-p").arg(&pl_path).arg("-d").arg(&dimg_path)
        .assert()
        .success();

    // the blocks are now allocated, a second build must fail loudly
    Command::cargo_bin("adfkit")?
        .arg("build")
        .arg("-b").arg(&bb_path).arg("-p").arg(&pl_path).arg("-d").arg(&dimg_path)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn misaligned_bootblock_fails() -> STDRESULT {
    let dir = tempfile::tempdir()?;
    let bb_path = dir.path().join("bootblock.bin");
    let pl_path = dir.path().join("payload.dgz");
    let dimg_path = dir.path().join("test.adf");
    std::fs::write(&bb_path,fake_bootblock(258))?;
    std::fs::write(&pl_path,fake_payload(1000,4096,8))?;
    mkdsk(&dimg_path);

    Command::cargo_bin("adfkit")?
        .arg("build")
        .arg("-b").arg(&bb_path).arg("-p").arg(&pl_path).arg("-d").arg(&dimg_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("longword"));
    Ok(())
}

#[test]
fn unformatted_image_fails() -> STDRESULT {
    let dir = tempfile::tempdir()?;
    let bb_path = dir.path().join("bootblock.bin");
    let pl_path = dir.path().join("payload.dgz");
    let dimg_path = dir.path().join("blank.adf");
    std::fs::write(&bb_path,fake_bootblock(256))?;
    std::fs::write(&pl_path,fake_payload(1000,4096,8))?;
    std::fs::write(&dimg_path,vec![0;901120])?;

    Command::cargo_bin("adfkit")?
        .arg("build")
        .arg("-b").arg(&bb_path).arg("-p").arg(&pl_path).arg("-d").arg(&dimg_path)
        .assert()
        .failure();
    Ok(())
}
