use std::process::ExitCode;

use log::LevelFilter;
use simple_logger::SimpleLogger;

use cwalk_drv::{parse_args, report_status, Command, Session, USAGE};

fn main() -> ExitCode {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(error) => {
            eprintln!("error: {}", error);
            eprint!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match command {
        Command::Help => {
            print!("{}", USAGE);
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("cwalk {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Command::Run(config) => {
            let level = if config.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            };
            let _ = SimpleLogger::new().with_level(level).init();

            match Session::new(config).run() {
                Ok(status) => {
                    report_status(status);
                    ExitCode::SUCCESS
                }
                Err(error) => {
                    eprintln!("error: {:#}", error);
                    ExitCode::from(2)
                }
            }
        }
    }
}
