mod platform;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    platform::run_app(platform::Cli::parse()).await
}
