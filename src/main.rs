mod app;
mod cli;
mod config;
mod consts;
mod error;
mod names;
mod project;
mod utils;

use clap::Parser;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    utils::set_debug(cli.debug);

    if let Err(err) = app::run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
