//! CLI struct definitions for the cmdnav command-line interface.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "cmdnav",
    version = env!("CARGO_PKG_VERSION"),
    about = "Synthesize command-reference navigation and page models from a CLI's --spec output"
)]
pub(crate) struct Cli {
    /// Configuration file (defaults to ./cmdnav.toml when present).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Yaml,
    Json,
}

/// Where the command descriptors and optional protocol metadata come from.
#[derive(clap::Args, Debug)]
pub(crate) struct SourceArgs {
    /// CLI spec JSON file, or '-' for stdin.
    #[clap(long)]
    pub spec: PathBuf,
    /// Directory of OpenAPI documents used for namespaces and doc links.
    #[clap(long, conflicts_with = "protocol_index")]
    pub api_specs: Option<PathBuf>,
    /// Pre-built protocol index JSON file.
    #[clap(long)]
    pub protocol_index: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Emit the navigation document
    Nav {
        #[clap(flatten)]
        source: SourceArgs,
        /// Output format.
        #[clap(long, value_enum, default_value = "yaml")]
        format: OutputFormat,
        /// Emit only the entries for a site's Commands section.
        #[clap(long)]
        commands_section: bool,
    },
    /// Summarize the command tree
    Tree {
        /// CLI spec JSON file, or '-' for stdin.
        #[clap(long)]
        spec: PathBuf,
    },
    /// Resource/action matrix of one group, with categories (JSON)
    Resources {
        #[clap(flatten)]
        source: SourceArgs,
        /// Top-level group to inspect.
        #[clap(long, default_value = "configuration")]
        group: String,
    },
    /// RPC procedures grouped by service (JSON)
    Rpc {
        /// CLI spec JSON file, or '-' for stdin.
        #[clap(long)]
        spec: PathBuf,
        #[clap(long, default_value = "request")]
        group: String,
        #[clap(long, default_value = "rpc")]
        action: String,
    },
    /// Page models for every navigation entry (JSON)
    Pages {
        #[clap(flatten)]
        source: SourceArgs,
    },
    /// Resolve the category of a single resource
    Category {
        /// Resource name, e.g. http_loadbalancer.
        resource: String,
        /// Protocol namespace, e.g. ves.io.schema.views.http_loadbalancer.
        #[clap(long)]
        namespace: Option<String>,
    },
}
