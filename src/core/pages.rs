//! Page models handed to the external renderer.
//!
//! Each [`Page`] carries the data one template needs plus the path the
//! navigation points at. The planner walks the tree with the same layout
//! decisions and path scheme as [`NavBuilder`], so every navigation leaf has
//! exactly one page and vice versa.

use crate::core::actions;
use crate::core::layout::GroupKind;
use crate::core::model::{CliSpec, Command};
use crate::core::nav::{self, NavBuilder};
use crate::core::rpc::{self, RpcProcedure};
use crate::core::tree::CommandTree;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    CommandsIndex,
    GroupIndex,
    SectionIndex,
    CommandPage,
    ResourcePage,
    RpcServicePage,
}

/// A row in an index listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub name: String,
    pub summary: String,
    pub link: String,
}

/// One action on a unified resource page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionEntry {
    pub action: String,
    pub command: Command,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub kind: PageKind,
    pub path: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<IndexEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub procedures: Vec<RpcProcedure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
}

impl Page {
    fn new(kind: PageKind, path: String, title: String, description: String) -> Self {
        Self {
            kind,
            path,
            title,
            description,
            command: None,
            entries: Vec::new(),
            category: None,
            actions: Vec::new(),
            procedures: Vec::new(),
            doc_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PagePlan {
    pub pages: Vec<Page>,
}

impl PagePlan {
    /// Page paths in plan order.
    pub fn paths(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.path.as_str()).collect()
    }

    pub fn find(&self, path: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.path == path)
    }

    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

/// "Manage http loadbalancer resources"
pub fn resource_summary(resource: &str) -> String {
    format!("Manage {} resources", resource.replace('_', " "))
}

/// "Alert service (2 procedures)"
pub fn service_summary(service: &str, procedures: usize) -> String {
    format!(
        "{} service ({} procedures)",
        nav::display_label(service),
        procedures
    )
}

pub struct PagePlanner<'a, 'b> {
    nav: &'b NavBuilder<'a>,
    binary: String,
}

impl<'a, 'b> PagePlanner<'a, 'b> {
    pub fn new(nav: &'b NavBuilder<'a>, binary: impl Into<String>) -> Self {
        Self {
            nav,
            binary: binary.into(),
        }
    }

    fn title(&self, path: &[&str]) -> String {
        format!("{} {}", self.binary, path.join(" "))
    }

    pub fn plan(&self, spec: &CliSpec, tree: &CommandTree) -> PagePlan {
        let mut pages = vec![self.commands_index(spec, tree)];
        for (_, group, node) in nav::sorted_children(tree) {
            self.plan_group(group, node, &mut pages);
        }
        PagePlan { pages }
    }

    fn commands_index(&self, spec: &CliSpec, tree: &CommandTree) -> Page {
        let mut page = Page::new(
            PageKind::CommandsIndex,
            format!("{}/index.md", self.nav.docs_root()),
            "Command Reference".to_string(),
            format!(
                "Complete reference for all {} CLI commands ({})",
                self.binary,
                spec.version_or_dev()
            ),
        );
        page.entries = nav::sorted_children(tree)
            .into_iter()
            .filter_map(|(_, name, child)| {
                child.command.as_ref().map(|cmd| IndexEntry {
                    name: name.clone(),
                    summary: cmd.short.clone(),
                    link: self.link(name, child, 1),
                })
            })
            .collect();
        page
    }

    fn plan_group(&self, group: &str, node: &CommandTree, pages: &mut Vec<Page>) {
        let kind = self.nav.layout().select(group);
        let description = node
            .command
            .as_ref()
            .map(|cmd| cmd.short.clone())
            .unwrap_or_default();
        let mut index = Page::new(
            PageKind::GroupIndex,
            self.nav.index_path(group),
            self.title(&[group]),
            description,
        );
        index.command = node.command.clone();

        if kind == GroupKind::ResourceFirst {
            let matrix = actions::collect_resources(node);
            index.entries = matrix
                .keys()
                .map(|resource| IndexEntry {
                    name: resource.clone(),
                    summary: resource_summary(resource),
                    link: self.nav.page_path(&format!("{group}/{resource}")),
                })
                .collect();
            pages.push(index);

            for (resource, commands) in matrix {
                pages.push(self.resource_page(group, &resource, commands));
            }
            return;
        }

        index.entries = self.child_entries(group, node, 2);
        pages.push(index);

        for (_, name, child) in nav::sorted_children(node) {
            self.plan_section(&kind, &[group, name.as_str()], child, pages);
        }
    }

    fn plan_section(&self, kind: &GroupKind, path: &[&str], node: &CommandTree, pages: &mut Vec<Page>) {
        let joined = path.join("/");
        let description = node
            .command
            .as_ref()
            .map(|cmd| cmd.short.clone())
            .unwrap_or_default();

        if node.is_leaf() {
            let depth = node.command.as_ref().map_or(path.len(), Command::depth);
            let mut page = if depth <= 2 {
                Page::new(
                    PageKind::SectionIndex,
                    self.nav.index_path(&joined),
                    self.title(path),
                    description,
                )
            } else {
                let mut page = Page::new(
                    PageKind::CommandPage,
                    self.nav.page_path(&joined),
                    self.title(path),
                    description,
                );
                if let (Some(action), Some(resource), Some(index)) =
                    (path.get(1), path.last(), self.nav.protocol_index())
                {
                    page.doc_url = index.doc_url(resource, action).map(str::to_string);
                }
                page
            };
            page.command = node.command.clone();
            pages.push(page);
            return;
        }

        let mut index = Page::new(
            PageKind::SectionIndex,
            self.nav.index_path(&joined),
            self.title(path),
            description,
        );
        index.command = node.command.clone();

        if path.len() == 2 && kind.is_service_grouped(path[1]) {
            let services = rpc::group_procedures(node);
            index.entries = services
                .iter()
                .map(|(service, procedures)| IndexEntry {
                    name: service.clone(),
                    summary: service_summary(service, procedures.len()),
                    link: self.nav.page_path(&format!("{joined}/{service}")),
                })
                .collect();
            pages.push(index);

            for (service, procedures) in services {
                let mut service_path = path.to_vec();
                service_path.push(&service);
                let mut page = Page::new(
                    PageKind::RpcServicePage,
                    self.nav.page_path(&format!("{joined}/{service}")),
                    self.title(&service_path),
                    format!("{} service RPC procedures", nav::display_label(&service)),
                );
                page.procedures = procedures;
                pages.push(page);
            }
            return;
        }

        index.entries = self.child_entries(&joined, node, path.len() + 1);
        pages.push(index);

        for (_, name, child) in nav::sorted_children(node) {
            let mut child_path = path.to_vec();
            child_path.push(name);
            self.plan_section(kind, &child_path, child, pages);
        }
    }

    /// Unified page: every action on `resource`, canonically ordered.
    fn resource_page(&self, group: &str, resource: &str, commands: Vec<Command>) -> Page {
        let namespace = self
            .nav
            .protocol_index()
            .and_then(|idx| idx.namespace(resource));
        let category = self.nav.categories().resolve(resource, namespace).to_string();

        let mut page = Page::new(
            PageKind::ResourcePage,
            self.nav.page_path(&format!("{group}/{resource}")),
            self.title(&[group, resource]),
            resource_summary(resource),
        );
        page.category = Some(category);
        page.actions = commands
            .into_iter()
            .map(|command| {
                let action = command.action().unwrap_or("").to_string();
                let doc_url = self
                    .nav
                    .protocol_index()
                    .and_then(|idx| idx.doc_url(resource, &action))
                    .map(str::to_string);
                ActionEntry {
                    action,
                    command,
                    doc_url,
                }
            })
            .collect();
        page
    }

    /// Child commands of `node` as index rows, in display-label order.
    fn child_entries(&self, parent: &str, node: &CommandTree, level: usize) -> Vec<IndexEntry> {
        nav::sorted_children(node)
            .into_iter()
            .filter_map(|(_, name, child)| {
                child.command.as_ref().map(|cmd| IndexEntry {
                    name: name.clone(),
                    summary: cmd.short.clone(),
                    link: self.link(&format!("{parent}/{name}"), child, level),
                })
            })
            .collect()
    }

    /// Path of the page describing `node`, matching the navigation depth rule.
    fn link(&self, path: &str, node: &CommandTree, level: usize) -> String {
        let depth = node.command.as_ref().map_or(level, Command::depth);
        if node.is_leaf() && depth > 2 {
            self.nav.page_path(path)
        } else {
            self.nav.index_path(path)
        }
    }
}
