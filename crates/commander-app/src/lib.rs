//! Wiring for the `commander` binary: CLI parsing, configuration, and the
//! stdin/stdout JSON dispatch loop. The manager, gate and registry are built
//! once in `main` and passed down explicitly.

pub mod cli;
pub mod config;
pub mod dispatch;

pub use cli::{Cli, Commands};
pub use config::{default_config_dir, AppConfig};
pub use dispatch::run_dispatch_loop;
