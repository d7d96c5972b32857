use std::env;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;
use log::LevelFilter;

use dapla_cli::cli::{Args, run};

const DEBUG_ENV: &str = "DAPLA_DEBUG";

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("dapla_cli", level)
        .parse_default_env()
        .init();
}

fn debug_from_env() -> bool {
    env::var(DEBUG_ENV)
        .map(|raw| {
            matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

fn main() {
    // Exits here when invoked by a dynamic completion script.
    CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse();
    init_logging(args.global.debug || debug_from_env());
    execute(args);
}

#[tokio::main]
async fn execute(args: Args) {
    match run(args).await {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            if e.is_remote() {
                println!("{e}");
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(e.exit_code());
        }
    }
}
