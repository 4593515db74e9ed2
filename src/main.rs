//! # Command Line Interface
//!
//! The clap command tree is in `cli.rs`, shared with the build script so
//! completion files stay in sync.  Subcommands are run by the `commands`
//! module.

mod cli;

use env_logger;
#[cfg(windows)]
use colored;
use log::error;
use adfkit::commands;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).unwrap();

    let matches = cli::build_cli().get_matches();

    if let Some(cmd) = matches.subcommand_matches("mkdsk") {
        return commands::mkdsk::mkdsk(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("build") {
        return commands::build::build(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("exe") {
        return commands::exe::exe(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("modinfo") {
        return commands::modinfo::modinfo(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("stat") {
        return commands::stat::stat(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("dump") {
        return commands::dump::dump(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(cli::build_cli(),cmd);
    }

    error!("No subcommand was found, try `adfkit --help`");
    return Err(Box::new(commands::CommandError::InvalidCommand));
}
