//! Hierarchical command tree keyed by path segment.
//!
//! Descriptors may arrive flat (siblings in the root list) or nested inside a
//! parent's `subcommands`; both shapes produce the same tree. Insertion walks
//! an explicit worklist so deeply nested descriptors never exhaust the stack.

use crate::core::model::{CliSpec, Command};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTree {
    pub name: String,
    /// Descriptor registered at exactly this path. Group nodes may have none.
    pub command: Option<Command>,
    pub children: BTreeMap<String, CommandTree>,
}

impl CommandTree {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: None,
            children: BTreeMap::new(),
        }
    }

    /// Build a tree rooted at `spec.name` from every descriptor in the spec.
    pub fn from_spec(spec: &CliSpec) -> Self {
        let root_name = if spec.name.is_empty() {
            "root"
        } else {
            spec.name.as_str()
        };
        let mut tree = Self::new(root_name);
        let mut placed = 0;
        for cmd in &spec.commands {
            placed += tree.insert(cmd.clone());
        }
        debug!(
            top_level = spec.commands.len(),
            placed, "built command tree from spec"
        );
        tree
    }

    /// Insert `command` and, depth-first, every nested subcommand.
    ///
    /// Descriptors with an empty path, or an empty segment anywhere in it,
    /// are skipped. A descriptor landing on an
    /// occupied path replaces the previous one. The stored command has its
    /// `subcommands` drained since they now live in the tree itself.
    /// Returns the number of descriptors placed.
    pub fn insert(&mut self, command: Command) -> usize {
        let mut pending = vec![command];
        let mut placed = 0;

        while let Some(mut cmd) = pending.pop() {
            let nested = std::mem::take(&mut cmd.subcommands);
            // Reverse so the first nested descriptor is handled next (preorder).
            pending.extend(nested.into_iter().rev());

            if cmd.path.is_empty() || cmd.path.iter().any(String::is_empty) {
                warn!(
                    use_line = %cmd.r#use,
                    path = ?cmd.path,
                    "skipping command descriptor with empty path segment"
                );
                continue;
            }
            self.place(cmd);
            placed += 1;
        }

        placed
    }

    fn place(&mut self, cmd: Command) {
        let mut node = self;
        for segment in &cmd.path {
            node = node
                .children
                .entry(segment.clone())
                .or_insert_with(|| CommandTree::new(segment.clone()));
        }
        if node.command.is_some() {
            debug!(path = %cmd.path.join(" "), "duplicate command path, last write wins");
        }
        node.command = Some(cmd);
    }

    /// Total number of nodes carrying a command, this node included.
    pub fn count_commands(&self) -> usize {
        let mut stack = vec![self];
        let mut count = 0;
        while let Some(node) = stack.pop() {
            if node.command.is_some() {
                count += 1;
            }
            stack.extend(node.children.values());
        }
        count
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&CommandTree> {
        self.children.get(name)
    }

    /// Follow `path` from this node.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandTree> {
        path.iter()
            .try_fold(self, |node, segment| node.children.get(segment.as_ref()))
    }

    /// Commands of the direct children, in ascending name order. Children
    /// without a registered command are left out.
    pub fn child_commands(&self) -> Vec<&Command> {
        self.children
            .values()
            .filter_map(|child| child.command.as_ref())
            .collect()
    }

    /// Names of the top-level groups in ascending order.
    pub fn group_names(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }
}
