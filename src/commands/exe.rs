use clap;
use crate::bios::hunk;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn exe(cmd: &clap::ArgMatches) -> STDRESULT {
    let in_path = cmd.get_one::<String>("file").expect(RCH);
    let out_path = cmd.get_one::<String>("output").expect(RCH);
    let raw = std::fs::read(in_path)?;
    let load_file = hunk::wrap(&raw)?;
    std::fs::write(out_path,&load_file)?;
    eprintln!("writing {} bytes",load_file.len());
    Ok(())
}
