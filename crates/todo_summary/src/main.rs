use std::io::IsTerminal;
use std::process;

use tracing_subscriber::EnvFilter;

use todo_summary::config::{cli, AppConfig};
use todo_summary::run;

fn main() {
    let matches = cli().get_matches();

    let config = match AppConfig::from_matches(&matches) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    };

    // stdout carries the Markdown; logs go to stderr.
    let filter = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    match run(&config) {
        Ok(report) => print!("{}", report),
        Err(err) => {
            eprintln!("{:#}", err);
            process::exit(1);
        }
    }
}
