//! Argument parsing for the `pm0` command-line front end.
//!
//! Kept deliberately plain: no color, no table rendering. The point is
//! to give the daemon's RPC surface a real consumer, not to reproduce a
//! polished CLI experience.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pm0", version, about = "user-level process supervisor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start a new unit.
    Start {
        bin: String,
        args: Vec<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cwd: Option<String>,
        #[arg(long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
    },
    /// List every unit.
    #[command(visible_alias = "ls")]
    List,
    /// Show one unit's full definition.
    Show { id: String },
    /// Stop one or more units, or `all` except a given list.
    Stop {
        targets: Vec<String>,
        #[arg(long)]
        force: bool,
        #[arg(long, value_delimiter = ',')]
        except: Vec<String>,
    },
    /// Restart one or more units, or `all` except a given list.
    Restart {
        targets: Vec<String>,
        #[arg(long)]
        force: bool,
        #[arg(long, value_delimiter = ',')]
        except: Vec<String>,
    },
    /// Delete one or more units, or `all` except a given list.
    #[command(visible_alias = "rm")]
    Delete {
        targets: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        except: Vec<String>,
    },
    /// Tail (and optionally follow) a unit's log.
    Logs {
        id: String,
        #[arg(long, default_value_t = 0)]
        lines: u32,
        #[arg(long)]
        follow: bool,
    },
    /// Truncate one or more units' log files.
    #[command(name = "logs-clear")]
    LogsClear { targets: Vec<String> },
    /// Rename a unit and/or merge environment variable updates.
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
    },
}
