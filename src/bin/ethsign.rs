use std::process::ExitCode;

use clap::Parser;
use ethsign::{Cli, Config, TerminalPassphrase};
use log::debug;

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported through the same path.
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    match Config::from_cli(cli).and_then(|config| ethsign::run(&config, &TerminalPassphrase)) {
        Ok(raw) => {
            println!("{raw}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("Failed with {:?} error: {e:?}", e.kind());
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
