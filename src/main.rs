use clap::Parser;
use syncclip::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    syncclip::run_app(cli).await
}
