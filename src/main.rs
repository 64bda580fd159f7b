use std::process;

use clap::Parser;
use log::error;
use schemac::{
    cli::{Args, CliApp},
    util::SimpleLogger,
};

static LOGGER: SimpleLogger = SimpleLogger;

pub fn main() {
    let args = Args::parse();

    if let Err(e) = log::set_logger(&LOGGER).map(|()| log::set_max_level(args.log_level)) {
        eprintln!("Failed to install logger: {}", e);
    }

    let stdout = std::io::stdout();
    let mut app = CliApp::new(stdout.lock());

    match app.run(&args) {
        Ok(report) if report.faults().is_empty() => {}
        Ok(_) => process::exit(2),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
