use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use gpio_alt::cli::{execute, Args};
use gpio_alt::logger::logger_init;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // one line, exit 1, same as every other failure
            eprintln!("{}", e.to_string().lines().next().unwrap_or_default());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger_init(args.verbose) {
        eprintln!("logger: {e}");
    }

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
