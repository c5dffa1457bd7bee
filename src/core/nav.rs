//! Navigation synthesis.
//!
//! Builds the nested `label → path` structure a static-site renderer splices
//! into its configuration. Output is diffed between regenerations, so every
//! level is explicitly sorted; nothing depends on map iteration order.

use crate::core::actions;
use crate::core::category::CategoryRules;
use crate::core::error::NavError;
use crate::core::layout::{GroupKind, LayoutRules};
use crate::core::protocol::ProtocolIndex;
use crate::core::rpc;
use crate::core::tree::CommandTree;
use rayon::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_DOCS_ROOT: &str = "commands";
pub const COMMANDS_LABEL: &str = "Commands";
pub const OVERVIEW_LABEL: &str = "Overview";

/// One navigation entry: a page reference or a labelled list of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavNode {
    Leaf { label: String, path: String },
    Branch { label: String, children: Vec<NavNode> },
}

impl NavNode {
    pub fn leaf(label: impl Into<String>, path: impl Into<String>) -> Self {
        NavNode::Leaf {
            label: label.into(),
            path: path.into(),
        }
    }

    pub fn branch(label: impl Into<String>, children: Vec<NavNode>) -> Self {
        NavNode::Branch {
            label: label.into(),
            children,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NavNode::Leaf { label, .. } | NavNode::Branch { label, .. } => label,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            NavNode::Leaf { path, .. } => Some(path),
            NavNode::Branch { .. } => None,
        }
    }

    pub fn children(&self) -> &[NavNode] {
        match self {
            NavNode::Leaf { .. } => &[],
            NavNode::Branch { children, .. } => children,
        }
    }

    /// Direct child with `label`.
    pub fn find(&self, label: &str) -> Option<&NavNode> {
        self.children().iter().find(|child| child.label() == label)
    }

    /// Every page path below (and including) this entry, depth-first.
    pub fn paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                NavNode::Leaf { path, .. } => out.push(path.as_str()),
                NavNode::Branch { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        out
    }
}

// `{label: path}` or `{label: [...]}`, the shape site generators expect.
impl Serialize for NavNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            NavNode::Leaf { label, path } => map.serialize_entry(label, path)?,
            NavNode::Branch { label, children } => map.serialize_entry(label, children)?,
        }
        map.end()
    }
}

/// Complete navigation: the commands index followed by one entry per group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NavDocument {
    pub nav: Vec<NavNode>,
}

impl NavDocument {
    pub fn to_yaml(&self) -> Result<String, NavError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, NavError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA-256 of the canonical JSON form; equal digests mean identical navigation.
    pub fn digest(&self) -> Result<String, NavError> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Entries for a site's `Commands` section: the commands index becomes
    /// `Overview`, group entries pass through unchanged.
    pub fn commands_section(&self) -> Vec<NavNode> {
        self.nav
            .iter()
            .map(|item| match item {
                NavNode::Leaf { label, path } if label == COMMANDS_LABEL => {
                    NavNode::leaf(OVERVIEW_LABEL, path.clone())
                }
                other => other.clone(),
            })
            .collect()
    }

    pub fn group(&self, label: &str) -> Option<&NavNode> {
        self.nav.iter().find(|item| item.label() == label)
    }
}

/// Human label for a path segment: `http_loadbalancer` → `Http Loadbalancer`.
pub fn display_label(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for ch in name.chars() {
        let ch = if ch == '_' || ch == '-' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Children of `node` ordered by display label, name breaking ties.
pub(crate) fn sorted_children(node: &CommandTree) -> Vec<(String, &String, &CommandTree)> {
    let mut children: Vec<(String, &String, &CommandTree)> = node
        .children
        .iter()
        .map(|(name, child)| (display_label(name), name, child))
        .collect();
    children.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    children
}

pub struct NavBuilder<'a> {
    layout: &'a LayoutRules,
    categories: &'a CategoryRules,
    protocol: Option<&'a ProtocolIndex>,
    docs_root: String,
}

impl<'a> NavBuilder<'a> {
    pub fn new(layout: &'a LayoutRules, categories: &'a CategoryRules) -> Self {
        Self {
            layout,
            categories,
            protocol: None,
            docs_root: DEFAULT_DOCS_ROOT.to_string(),
        }
    }

    pub fn with_protocol_index(mut self, index: Option<&'a ProtocolIndex>) -> Self {
        self.protocol = index;
        self
    }

    pub fn with_docs_root(mut self, docs_root: impl Into<String>) -> Self {
        self.docs_root = docs_root.into();
        self
    }

    pub fn docs_root(&self) -> &str {
        &self.docs_root
    }

    pub fn layout(&self) -> &'a LayoutRules {
        self.layout
    }

    pub fn categories(&self) -> &'a CategoryRules {
        self.categories
    }

    pub fn protocol_index(&self) -> Option<&'a ProtocolIndex> {
        self.protocol
    }

    /// `<root>/<path>/index.md`
    pub fn index_path(&self, path: &str) -> String {
        format!("{}/{}/index.md", self.docs_root, path)
    }

    /// `<root>/<path>.md`
    pub fn page_path(&self, path: &str) -> String {
        format!("{}/{}.md", self.docs_root, path)
    }

    /// Full navigation for `tree`. Groups are synthesized in parallel and
    /// emitted in display-label order, like every nested level.
    pub fn generate(&self, tree: &CommandTree) -> NavDocument {
        let groups = sorted_children(tree);
        let group_nav: Vec<NavNode> = groups
            .par_iter()
            .map(|(_, name, node)| self.build_group(name, node))
            .collect();

        let mut nav = Vec::with_capacity(group_nav.len() + 1);
        nav.push(NavNode::leaf(
            COMMANDS_LABEL,
            format!("{}/index.md", self.docs_root),
        ));
        nav.extend(group_nav);

        debug!(groups = groups.len(), "synthesized navigation");
        NavDocument { nav }
    }

    /// Navigation entry for one top-level group.
    pub fn build_group(&self, name: &str, node: &CommandTree) -> NavNode {
        let kind = self.layout.select(name);
        let label = display_label(name);

        // Every group gets an index page, commands or not.
        if node.is_leaf() {
            return NavNode::leaf(label, self.index_path(name));
        }

        let mut children = vec![NavNode::leaf(
            format!("{label} {OVERVIEW_LABEL}"),
            self.index_path(name),
        )];

        match kind {
            GroupKind::ResourceFirst => children.extend(self.resource_first_entries(name, node)),
            _ => {
                for (_, child_name, child) in sorted_children(node) {
                    children.push(self.build_child(&kind, name, child_name, child, 2));
                }
            }
        }

        NavNode::branch(label, children)
    }

    /// Resources of a resource-first group bucketed by category. Buckets are
    /// alphabetical except the default category, which always comes last.
    pub fn resource_first_entries(&self, group: &str, node: &CommandTree) -> Vec<NavNode> {
        let matrix = actions::collect_resources(node);

        let mut buckets: BTreeMap<&str, Vec<&String>> = BTreeMap::new();
        for resource in matrix.keys() {
            let namespace = self.protocol.and_then(|idx| idx.namespace(resource));
            let category = self.categories.resolve(resource, namespace);
            buckets.entry(category).or_default().push(resource);
        }

        let mut categories: Vec<&str> = buckets.keys().copied().collect();
        self.categories.sort_categories(&mut categories);

        categories
            .into_iter()
            .map(|category| {
                let mut resources: Vec<(String, &String)> = buckets[category]
                    .iter()
                    .map(|resource| (display_label(resource), *resource))
                    .collect();
                resources.sort();

                let leaves = resources
                    .into_iter()
                    .map(|(label, resource)| {
                        NavNode::leaf(label, self.page_path(&format!("{group}/{resource}")))
                    })
                    .collect();
                NavNode::branch(category, leaves)
            })
            .collect()
    }

    /// One entry per RPC service, ordered by service name.
    pub fn service_entries(&self, path: &str, node: &CommandTree) -> Vec<NavNode> {
        rpc::group_procedures(node)
            .keys()
            .map(|service| {
                NavNode::leaf(
                    display_label(service),
                    self.page_path(&format!("{path}/{service}")),
                )
            })
            .collect()
    }

    fn build_child(
        &self,
        kind: &GroupKind,
        parent_path: &str,
        name: &str,
        node: &CommandTree,
        level: usize,
    ) -> NavNode {
        let label = display_label(name);
        let path = format!("{parent_path}/{name}");

        if node.is_leaf() {
            // group+action without resources is a directory; deeper is a flat page.
            let depth = node.command.as_ref().map_or(level, |cmd| cmd.depth());
            return if depth <= 2 {
                NavNode::leaf(label, self.index_path(&path))
            } else {
                NavNode::leaf(label, self.page_path(&path))
            };
        }

        let mut children = vec![NavNode::leaf(
            format!("{label} {OVERVIEW_LABEL}"),
            self.index_path(&path),
        )];

        if level == 2 && kind.is_service_grouped(name) {
            children.extend(self.service_entries(&path, node));
        } else {
            for (_, child_name, child) in sorted_children(node) {
                children.push(self.build_child(kind, &path, child_name, child, level + 1));
            }
        }

        NavNode::branch(label, children)
    }
}
