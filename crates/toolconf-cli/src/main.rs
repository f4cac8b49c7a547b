use clap::Parser;
use tracing::Level;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let subscriber = tracing_subscriber::fmt().with_writer(std::io::stderr);
    if cli.verbose {
        subscriber.with_max_level(Level::DEBUG).init();
    } else {
        subscriber.init();
    }
    commands::run_command(cli)
}
