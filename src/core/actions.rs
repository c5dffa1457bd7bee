//! Actions and the resources they operate on.
//!
//! A group such as `configuration` is laid out as group → action → resource.
//! This module inverts that into resource → actions and orders actions
//! canonically so every page lists them the same way.

use crate::core::model::Command;
use crate::core::tree::CommandTree;
use std::collections::BTreeMap;

/// Known actions in display order.
pub const ACTION_ORDER: &[&str] = &[
    "list",
    "get",
    "create",
    "delete",
    "replace",
    "apply",
    "patch",
    "status",
    "add-labels",
    "remove-labels",
];

/// Rank given to every action missing from [`ACTION_ORDER`].
pub const UNKNOWN_ACTION_RANK: usize = ACTION_ORDER.len();

/// resource name → commands for that resource, one per action, canonically ordered.
pub type ResourceActionMatrix = BTreeMap<String, Vec<Command>>;

pub fn action_rank(action: &str) -> usize {
    ACTION_ORDER
        .iter()
        .position(|known| *known == action)
        .unwrap_or(UNKNOWN_ACTION_RANK)
}

/// Stable sort by canonical action rank. Items sharing a rank keep their
/// relative input order.
pub fn sort_by_action<T, F>(items: &mut [T], action_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_key(|item| action_rank(action_of(item)));
}

/// Sort commands by the action segment of their path.
pub fn sort_commands(commands: &mut [Command]) {
    sort_by_action(commands, |cmd| cmd.action().unwrap_or(""));
}

/// Invert a group's action → resource subtree into resource → actions.
///
/// Only resource nodes carrying a command contribute, so every entry in the
/// result has at least one command.
pub fn collect_resources(group: &CommandTree) -> ResourceActionMatrix {
    let mut resources = ResourceActionMatrix::new();

    for action_node in group.children.values() {
        for (resource_name, resource_node) in &action_node.children {
            if let Some(cmd) = &resource_node.command {
                resources
                    .entry(resource_name.clone())
                    .or_default()
                    .push(cmd.clone());
            }
        }
    }

    for commands in resources.values_mut() {
        sort_commands(commands);
    }

    resources
}

/// Commands for `resource` under every action of `group`, ordered by action name.
pub fn related_commands<'a>(tree: &'a CommandTree, group: &str, resource: &str) -> Vec<&'a Command> {
    let Some(group_node) = tree.child(group) else {
        return Vec::new();
    };

    let mut related: Vec<&Command> = group_node
        .children
        .values()
        .filter_map(|action_node| action_node.child(resource))
        .filter_map(|resource_node| resource_node.command.as_ref())
        .collect();
    related.sort_by(|a, b| a.action().unwrap_or("").cmp(b.action().unwrap_or("")));
    related
}

/// API operation that documents a CLI action, if any.
pub fn operation_for_action(action: &str) -> Option<&'static str> {
    match action {
        "create" => Some("Create"),
        "list" => Some("List"),
        "get" => Some("Get"),
        "delete" => Some("Delete"),
        "replace" => Some("Replace"),
        "apply" => Some("Replace"),
        "status" => Some("Get"),
        "patch" => Some("Replace"),
        "add-labels" => Some("Create"),
        "remove-labels" => Some("Delete"),
        _ => None,
    }
}
