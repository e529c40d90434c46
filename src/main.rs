mod app;
mod browser;
mod cli;
mod config;
mod error;
mod judge;
mod lang;
mod logging;
mod models;
mod ui;
mod workspace;

use clap::Parser;
use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    cli::run(cli);
}
