//! Subcommand implementations.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use mcplink_client::McpClient;

use crate::cli::{Cli, Commands};

/// Dispatch the parsed command line.
pub async fn run(args: Cli) -> Result<()> {
    let client = McpClient::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    match args.command {
        Commands::Tools { server } => tools(&client, &server).await,
        Commands::Resources { server } => resources(&client, &server).await,
        Commands::Call { server, tool, args } => call(&client, &server, &tool, &args).await,
        Commands::Test { server } => test(&client, server.as_deref()).await,
    }
}

async fn tools(client: &McpClient, server: &str) -> Result<()> {
    let session = client.connect(server).await?;
    let tools = session.tools().await?;
    info!(server, count = tools.len(), "fetched tools");
    print_json(&Value::Array(tools.all().to_vec()))
}

async fn resources(client: &McpClient, server: &str) -> Result<()> {
    let session = client.connect(server).await?;
    let resources = session.resources().await?;
    info!(server, count = resources.len(), "fetched resources");
    print_json(&Value::Array(resources.all().to_vec()))
}

async fn call(client: &McpClient, server: &str, tool: &str, args: &str) -> Result<()> {
    let arguments: Value =
        serde_json::from_str(args).context("--args must be a valid JSON object")?;
    anyhow::ensure!(arguments.is_object(), "--args must be a JSON object");

    let session = client.connect(server).await?;
    let result = session.call_tool(tool, Some(arguments)).await?;
    print_json(&result)
}

/// Check one server, or every configured server when `server` is `None`.
/// Failures are reported per server without aborting the sweep.
async fn test(client: &McpClient, server: Option<&str>) -> Result<()> {
    let names: Vec<String> = match server {
        Some(name) => vec![name.to_string()],
        None => {
            let mut names: Vec<String> = client.config().servers.keys().cloned().collect();
            names.sort();
            names
        }
    };
    anyhow::ensure!(!names.is_empty(), "no servers configured");

    let mut failures = 0usize;
    for name in &names {
        let outcome = async {
            let session = client.connect(name).await?;
            session.tools().await
        }
        .await;

        match outcome {
            Ok(tools) => println!("{name}: ok ({} tools)", tools.len()),
            Err(e) => {
                failures += 1;
                println!("{name}: FAILED - {e}");
            }
        }
    }

    client.disconnect_all().await?;
    anyhow::ensure!(
        failures == 0,
        "{failures} of {} servers failed",
        names.len()
    );
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
