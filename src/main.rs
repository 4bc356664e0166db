#![forbid(unsafe_code)]

//! psan — Prerender Sanitizer CLI entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("psan: {e}");
        std::process::exit(e.exit_code());
    }
}
