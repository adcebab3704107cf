use clap::Parser;
use log::error;

use wallet::cli::{self, Cli};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = cli::run(Cli::parse()) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
