use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use commander_app::{default_config_dir, run_dispatch_loop, AppConfig, Cli, Commands};
use commander_gate::CommandGate;
use commander_terminal::TerminalManager;
use commander_toolcore::{ToolContext, ToolRegistry};
use commander_tools::register_default_tools;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = match cli.config_dir.clone() {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
            dir
        }
        None => default_config_dir()?,
    };
    let config = AppConfig::load_or_init(&config_dir.join("config.toml"));

    let gate = CommandGate::from_file(config_dir.join("blocklist.toml"));

    let mut manager = TerminalManager::new(gate);
    if let Some(log_dir) = cli.log_dir.clone().or(config.log_dir.clone()) {
        manager = manager.with_log_dir(log_dir);
    }
    let manager = Arc::new(manager);

    let work_dir = match cli.work_dir.clone() {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("Invalid working directory {}", dir.display()))?,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let mut allowed = cli.allowed_dirs.clone();
    allowed.extend(config.allowed_directories.clone());

    let mut context = ToolContext::new(work_dir).with_terminal_manager(Arc::clone(&manager));
    if !allowed.is_empty() {
        context = context.with_allowed_directories(allowed);
    }

    let mut registry = ToolRegistry::new();
    register_default_tools(&mut registry);

    match cli.command {
        None | Some(Commands::Serve) => {
            run_dispatch_loop(&registry, &context).await?;
        }
        Some(Commands::Run {
            command,
            timeout_ms,
        }) => {
            let result = manager.execute(&command, timeout_ms).await?;
            if result.blocked {
                eprintln!("{}", result.output.red());
                std::process::exit(1);
            }
            println!("{}", format!("Session {}", result.id).bold());
            print!("{}", result.output);
        }
        Some(Commands::Tools) => {
            for name in registry.get_tool_names() {
                if let Some(tool) = registry.get_tool(&name) {
                    println!("{}  {}", name.bold(), tool.description());
                }
            }
        }
        Some(Commands::Blocked) => {
            let patterns = manager.gate().list();
            if patterns.is_empty() {
                println!("No blocked command patterns");
            } else {
                for pattern in patterns {
                    println!("{}", pattern);
                }
            }
        }
    }

    Ok(())
}
