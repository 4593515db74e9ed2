use clap;
use std::io::Write;
use crate::img::adf::BLOCK_SIZE;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn dump(cmd: &clap::ArgMatches) -> STDRESULT {
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    let iblock = *cmd.get_one::<u16>("block").expect(RCH) as usize;
    let img = crate::create_img_from_file(img_path)?;
    let buf = img.read_block(iblock)?;
    if atty::is(atty::Stream::Stdout) {
        crate::display_block(iblock*BLOCK_SIZE,&buf);
    } else {
        std::io::stdout().write_all(&buf).expect("could not write output stream");
    }
    Ok(())
}
