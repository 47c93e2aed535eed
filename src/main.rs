use anyhow::Result;

use op_leader_ranking::cli::Command;
use op_leader_ranking::{handle_import, handle_process, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(command)
}

fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::Import {
            data_dir,
            meta_formats,
        } => handle_import(data_dir, &meta_formats),
        Command::Process {
            meta_formats,
            matches_path,
            only_official,
        } => handle_process(&meta_formats, matches_path, only_official),
    }
}
