//! cmdnav: command-reference navigation for CLI documentation sites.
//!
//! A CLI that can describe itself (`<binary> --spec --output-format json`)
//! emits a flat or nested list of command descriptors. cmdnav folds those
//! descriptors into a command tree and derives everything a static-site
//! renderer needs to publish a reference:
//!
//! - a deterministic `nav:` structure (`{label: path}` entries), diffable
//!   between regenerations
//! - resource/action matrices with a canonical action order
//! - RPC procedures grouped by service
//! - domain categories for resources, driven by protocol namespaces when
//!   OpenAPI metadata is available and by name patterns otherwise
//! - page models whose paths match the navigation exactly
//!
//! Rendering markdown from the page models is left to the caller.
//!
//! # Examples
//!
//! ```bash
//! vesctl --spec --output-format json > spec.json
//! cmdnav nav --spec spec.json --api-specs docs/specifications/api > nav.yml
//! cmdnav category http_loadbalancer
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: descriptor model, tree, grouping, categorization and synthesis

pub mod core;
mod cli;

use cli::{Cli, Command, OutputFormat, SourceArgs};
use crate::core::{
    actions,
    config::NavConfig,
    error::NavError,
    model::CliSpec,
    nav::NavBuilder,
    pages::PagePlanner,
    protocol::ProtocolIndex,
    rpc,
    tree::CommandTree,
};

use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

/// Read a spec document from `path`, or stdin when `path` is `-`.
pub fn read_spec(path: &Path) -> Result<CliSpec, NavError> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| NavError::NotFound(format!("spec file {}: {}", path.display(), e)))?
    };
    let spec = CliSpec::from_json(&content)?;
    debug!(commands = spec.commands.len(), "parsed spec document");
    Ok(spec)
}

/// Protocol metadata is optional; load failures degrade to an empty index.
fn load_protocol(source: &SourceArgs, config: &NavConfig) -> Option<ProtocolIndex> {
    if let Some(dir) = &source.api_specs {
        return Some(ProtocolIndex::load_dir(dir, &config.protocol_root));
    }
    source.protocol_index.as_deref().map(ProtocolIndex::load_file)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), NavError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_formatted<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<(), NavError> {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ResourceActionRow {
    action: String,
    command: String,
    short: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_url: Option<String>,
}

#[derive(Serialize)]
struct ResourceRow {
    resource: String,
    category: String,
    actions: Vec<ResourceActionRow>,
}

fn resource_rows(
    group: &CommandTree,
    config: &NavConfig,
    protocol: Option<&ProtocolIndex>,
) -> Vec<ResourceRow> {
    let rules = config.category_rules();
    actions::collect_resources(group)
        .into_iter()
        .map(|(resource, commands)| {
            let namespace = protocol.and_then(|idx| idx.namespace(&resource));
            let category = rules.resolve(&resource, namespace).to_string();
            let actions = commands
                .iter()
                .map(|cmd| {
                    let action = cmd.action().unwrap_or("").to_string();
                    let doc_url = protocol
                        .and_then(|idx| idx.doc_url(&resource, &action))
                        .map(str::to_string);
                    ResourceActionRow {
                        command: cmd.full_command(&config.binary_name),
                        short: cmd.short.clone(),
                        action,
                        doc_url,
                    }
                })
                .collect();
            ResourceRow {
                resource,
                category,
                actions,
            }
        })
        .collect()
}

fn run_tree(spec: &CliSpec, tree: &CommandTree, config: &NavConfig) {
    use colored::Colorize;

    let layout = config.layout_rules();
    let name = if spec.name.is_empty() {
        config.binary_name.as_str()
    } else {
        spec.name.as_str()
    };
    println!(
        "{} {}: {} commands in {} groups",
        name.bright_white().bold(),
        spec.version_or_dev().dimmed(),
        tree.count_commands().to_string().bright_cyan(),
        tree.children.len().to_string().bright_cyan()
    );
    for (group, node) in &tree.children {
        println!(
            "  {:<24} {:>5}  {}",
            group.bright_white(),
            node.count_commands(),
            layout.select(group).as_str().dimmed()
        );
    }
}

pub fn run() -> Result<(), NavError> {
    let cli = Cli::parse();
    let current_dir = std::env::current_dir()?;
    let config = NavConfig::load(cli.config.as_deref(), &current_dir)?;

    match cli.command {
        Command::Category {
            resource,
            namespace,
        } => {
            let rules = config.category_rules();
            println!("{}", rules.resolve(&resource, namespace.as_deref()));
        }
        Command::Tree { spec } => {
            let spec = read_spec(&spec)?;
            let tree = CommandTree::from_spec(&spec);
            run_tree(&spec, &tree, &config);
        }
        Command::Rpc {
            spec,
            group,
            action,
        } => {
            let spec = read_spec(&spec)?;
            let tree = CommandTree::from_spec(&spec);
            let node = tree
                .get(&[group.as_str(), action.as_str()])
                .ok_or_else(|| NavError::NotFound(format!("command '{group} {action}'")))?;
            print_json(&rpc::group_procedures(node))?;
        }
        Command::Resources { source, group } => {
            let spec = read_spec(&source.spec)?;
            let protocol = load_protocol(&source, &config);
            let tree = CommandTree::from_spec(&spec);
            let node = tree
                .child(&group)
                .ok_or_else(|| NavError::NotFound(format!("command group '{group}'")))?;
            print_json(&resource_rows(node, &config, protocol.as_ref()))?;
        }
        Command::Nav {
            source,
            format,
            commands_section,
        } => {
            let spec = read_spec(&source.spec)?;
            let protocol = load_protocol(&source, &config);
            let tree = CommandTree::from_spec(&spec);

            let layout = config.layout_rules();
            let rules = config.category_rules();
            let document = NavBuilder::new(&layout, &rules)
                .with_protocol_index(protocol.as_ref())
                .with_docs_root(config.docs_root.as_str())
                .generate(&tree);
            info!(
                groups = tree.children.len(),
                digest = %document.digest()?,
                "generated navigation"
            );

            if commands_section {
                print_formatted(&document.commands_section(), format)?;
            } else {
                print_formatted(&document, format)?;
            }
        }
        Command::Pages { source } => {
            let spec = read_spec(&source.spec)?;
            let protocol = load_protocol(&source, &config);
            let tree = CommandTree::from_spec(&spec);

            let layout = config.layout_rules();
            let rules = config.category_rules();
            let builder = NavBuilder::new(&layout, &rules)
                .with_protocol_index(protocol.as_ref())
                .with_docs_root(config.docs_root.as_str());
            let plan = PagePlanner::new(&builder, config.binary_name.as_str()).plan(&spec, &tree);
            info!(pages = plan.pages.len(), "planned pages");
            print_json(&plan)?;
        }
    }

    Ok(())
}
