use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for commander.
#[derive(Parser)]
#[command(name = "commander")]
#[command(about = "Remote-controllable shell execution with a blocked-command gate")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Working directory for sessions and relative paths (default: current)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Directory file operations may touch; repeatable. Defaults to the
    /// working directory.
    #[arg(long = "allowed-dir", value_name = "DIR")]
    pub allowed_dirs: Vec<PathBuf>,

    /// Configuration directory (default: ~/.commander)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Directory for per-session JSONL event logs (default: none)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve tool calls as line-delimited JSON over stdin/stdout (default)
    Serve,

    /// Execute one command and print its result
    Run {
        /// Shell command to execute
        command: String,

        /// How long to wait for initial output, in milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
    },

    /// List the available tools
    Tools,

    /// List the blocked command patterns
    Blocked,
}
