use astpath::cli::{self, Args};
use clap::Parser;
use log::LevelFilter;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.verbose {
        logger.filter_module("astpath::cursor", LevelFilter::Trace);
    }
    logger.init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli::run(&args, &mut out).and_then(|()| out.flush().map_err(Into::into)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
