//! `mcplink` - inspect and invoke MCP servers from the command line.

mod cli;
mod commands;

use clap::Parser;

#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();

    let filter = if args.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"))
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::run(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
