mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = platform::config::Cli::parse();
    platform::run_app(cli)
}
