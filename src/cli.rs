use clap::{value_parser, crate_version, Arg, ArgAction, Command, ValueHint};

const RESERVE_LONG_HELP: &str = "Also mark the 22 blocks of the last two tracks (cylinder 79) as
allocated.  Use this when the payload exercises the drive with raw
reads and writes at the end of the disk.";

fn dimg_arg(req: bool) -> Arg {
    Arg::new("dimg").short('d').long("dimg").help("path to disk image itself")
        .value_name("PATH")
        .value_hint(ValueHint::FilePath)
        .required(req)
}

fn indent_arg() -> Arg {
    Arg::new("indent").long("indent").help("JSON indentation, omit to minify")
        .value_name("SPACES")
        .value_parser(value_parser!(u16).range(0..16))
        .required(false)
}

pub fn build_cli() -> Command {
    let long_help = "adfkit is always invoked with exactly one of several subcommands.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
create blank OFS image:  `adfkit mkdsk -v Workbench -d myimg.adf`
build a boot floppy:     `adfkit build -b bootblock.bin -p payload.dgz -d myimg.adf`
wrap a raw binary:       `adfkit exe -f program.bin -o program`
inspect an image:        `adfkit stat -d myimg.adf --indent 2`
hex dump the root block: `adfkit dump -d myimg.adf -b 880`";

    Command::new("adfkit")
        .about("Manipulates Amiga disk images and boot floppies.")
        .after_long_help(long_help)
        .version(crate_version!())
        .subcommand(Command::new("mkdsk")
            .arg(Arg::new("volume").short('v').long("volume").value_name("NAME")
                .help("volume name, escapes such as \\xFF are processed")
                .required(true))
            .arg(dimg_arg(true))
            .about("write a blank OFS disk image to the given path"))
        .subcommand(Command::new("build")
            .arg(Arg::new("boot").short('b').long("boot").value_name("PATH")
                .help("bootblock binary")
                .value_hint(ValueHint::FilePath)
                .required(true))
            .arg(Arg::new("payload").short('p').long("payload").value_name("PATH")
                .help("compressed payload with pack header")
                .value_hint(ValueHint::FilePath)
                .required(true))
            .arg(dimg_arg(true))
            .arg(Arg::new("reserve-tail").long("reserve-tail")
                .help("also allocate the last two tracks")
                .long_help(RESERVE_LONG_HELP)
                .action(ArgAction::SetTrue))
            .about("splice bootblock and payload into an OFS disk image"))
        .subcommand(Command::new("exe")
            .arg(Arg::new("file").short('f').long("file").value_name("PATH")
                .help("raw binary, length must be a multiple of 4")
                .value_hint(ValueHint::FilePath)
                .required(true))
            .arg(Arg::new("output").short('o').long("output").value_name("PATH")
                .help("AmigaDOS executable to create")
                .value_hint(ValueHint::FilePath)
                .required(true))
            .about("wrap a raw binary as a single-hunk AmigaDOS executable"))
        .subcommand(Command::new("modinfo")
            .arg(Arg::new("file").short('f').long("file").value_name("PATH")
                .help("Protracker module")
                .value_hint(ValueHint::FilePath)
                .required(true))
            .about("print metadata of a Protracker module"))
        .subcommand(Command::new("stat")
            .arg(dimg_arg(true))
            .arg(indent_arg())
            .about("write JSON report on a disk image to stdout"))
        .subcommand(Command::new("dump")
            .arg(dimg_arg(true))
            .arg(Arg::new("block").short('b').long("block").value_name("BLOCK")
                .help("block number to dump")
                .value_parser(value_parser!(u16).range(0..1760))
                .required(true))
            .about("dump one 512 byte block, hex display or raw bytes if piped"))
        .subcommand(Command::new("completions")
            .arg(Arg::new("shell").short('s').long("shell").value_name("SHELL")
                .help("shell to generate completions for")
                .value_parser(["bash","elv","fish","ps1","zsh"])
                .required(true))
            .about("write completion script to stdout"))
}
