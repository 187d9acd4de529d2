//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Main CLI application structure.
#[derive(Parser, Debug)]
#[command(
    name = "mcplink",
    version,
    about = "Inspect and invoke MCP servers over HTTP, SSE, or stdio"
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the server configuration file (TOML/JSON/YAML)
    #[arg(long, short = 'c', global = true, default_value = "mcplink.toml", env = "MCPLINK_CONFIG")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a server's tools
    Tools {
        /// Server name from the configuration file
        server: String,
    },

    /// List a server's resources
    Resources {
        /// Server name from the configuration file
        server: String,
    },

    /// Call a tool on a server
    Call {
        /// Server name from the configuration file
        server: String,

        /// Tool name
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, short = 'a', default_value = "{}")]
        args: String,
    },

    /// Check connectivity to one server, or all configured servers
    Test {
        /// Server name; omit to test every configured server
        server: Option<String>,
    },
}
