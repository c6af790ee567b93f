use clap::Parser;
use multiverso::cli::{self, Cli};
use multiverso::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Cli::parse();
    cli::run(args).await
}
