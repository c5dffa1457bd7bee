//! Presentation shape per top-level command group.
//!
//! The set of special cases is small and closed: a handful of groups are
//! resource-first and a handful of group/action pairs hold RPC procedures.
//! Everything else is action-first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_RESOURCE_FIRST_GROUP: &str = "configuration";
pub const DEFAULT_RPC_GROUP: &str = "request";
pub const DEFAULT_RPC_ACTION: &str = "rpc";

/// Layout chosen once for a top-level group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// group → action → resource; one page per (action, resource).
    ActionFirst,
    /// One unified page per resource listing every action.
    ResourceFirst,
    /// Action-first, except the listed actions hold dotted RPC procedures
    /// grouped by service.
    ServiceGrouped { actions: BTreeSet<String> },
}

impl GroupKind {
    pub fn is_service_grouped(&self, action: &str) -> bool {
        match self {
            GroupKind::ServiceGrouped { actions } => actions.contains(action),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::ActionFirst => "action-first",
            GroupKind::ResourceFirst => "resource-first",
            GroupKind::ServiceGrouped { .. } => "service-grouped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceGroupedAction {
    pub group: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRules {
    resource_first_groups: BTreeSet<String>,
    service_grouped: BTreeSet<ServiceGroupedAction>,
}

impl LayoutRules {
    pub fn new<I, J>(resource_first_groups: I, service_grouped: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = ServiceGroupedAction>,
    {
        Self {
            resource_first_groups: resource_first_groups.into_iter().collect(),
            service_grouped: service_grouped.into_iter().collect(),
        }
    }

    /// Resource-first is checked before service grouping, so a group listed
    /// in both is resource-first.
    pub fn select(&self, group: &str) -> GroupKind {
        if self.resource_first_groups.contains(group) {
            return GroupKind::ResourceFirst;
        }

        let actions: BTreeSet<String> = self
            .service_grouped
            .iter()
            .filter(|pair| pair.group == group)
            .map(|pair| pair.action.clone())
            .collect();

        if actions.is_empty() {
            GroupKind::ActionFirst
        } else {
            GroupKind::ServiceGrouped { actions }
        }
    }
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self::new(
            [DEFAULT_RESOURCE_FIRST_GROUP.to_string()],
            [ServiceGroupedAction {
                group: DEFAULT_RPC_GROUP.to_string(),
                action: DEFAULT_RPC_ACTION.to_string(),
            }],
        )
    }
}
