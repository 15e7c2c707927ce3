use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::task::Priority;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "skiff",
    version,
    about = "Skiff: a small project and to-do tracker",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Override a config key for this invocation.
    #[arg(
        long = "rc",
        value_name = "KEY=VALUE",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    /// Path to the rc file (defaults to SKIFFRC, then ~/.skiffrc).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (defaults to the data.location config key).
    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a new to-do.
    Add {
        title: String,

        #[arg(short = 'd', long)]
        description: Option<String>,

        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,

        #[arg(short = 'p', long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,

        #[arg(long)]
        project: Option<String>,
    },

    /// List to-dos, optionally narrowed by project and date window.
    List {
        #[arg(long)]
        project: Option<String>,

        /// One of: all, today, tomorrow, week. Anything else lists all.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Change fields of an existing to-do. Unknown ids are ignored.
    Edit {
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(short = 'd', long)]
        description: Option<String>,

        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        #[arg(long)]
        clear_due: bool,

        #[arg(short = 'p', long, value_enum)]
        priority: Option<Priority>,

        #[arg(long, conflicts_with = "clear_project")]
        project: Option<String>,

        #[arg(long)]
        clear_project: bool,
    },

    /// Toggle completion of a to-do.
    Done { id: u64 },

    /// Delete a to-do. Deleting an unknown id is a no-op.
    Delete { id: u64 },

    /// Add a project.
    Project { name: String },

    /// List projects in the order they were added.
    Projects,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
