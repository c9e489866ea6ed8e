//! CLI commands

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use evas_core::{AgentCategory, AgentCost};

/// EVAS - agent registry, router and hand-off coordinator
#[derive(Parser, Debug)]
#[command(name = "evas")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: discovered evas.jsonc/json/yml/yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered agents
    Agents {
        /// Only agents in this category (exploration, specialist, advisor, ...)
        #[arg(long)]
        category: Option<AgentCategory>,

        /// Only agents with this cost tier (FREE, CHEAP, EXPENSIVE)
        #[arg(long)]
        cost: Option<AgentCost>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one agent by name or alias
    Show {
        name: String,

        /// Print the full prompt
        #[arg(long)]
        prompt: bool,
    },

    /// Rank agents for a task
    Route {
        /// Task text
        #[arg(required = true)]
        task: Vec<String>,

        /// Output the full ranking as JSON
        #[arg(long)]
        json: bool,

        /// Show matched signals and disqualifications
        #[arg(long)]
        explain: bool,
    },

    /// Validate the agent catalog
    Check,

    /// Check whether an agent may use a tool
    Authorize { agent: String, tool: String },

    /// Find and resolve the hand-off directive in an agent's output
    Handoff {
        /// Agent that produced the output
        #[arg(long)]
        from: String,

        /// Read the output from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
}
