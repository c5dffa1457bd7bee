//! Generator configuration (`cmdnav.toml`).
//!
//! Every field is optional. A missing file is not an error: the built-in
//! layout and category tables apply.

use crate::core::category::{CategoryRules, DEFAULT_CATEGORY, NamespaceRule, PROTOCOL_ROOT, PatternRule};
use crate::core::error::NavError;
use crate::core::layout::{
    DEFAULT_RESOURCE_FIRST_GROUP, DEFAULT_RPC_ACTION, DEFAULT_RPC_GROUP, LayoutRules,
    ServiceGroupedAction,
};
use crate::core::nav::DEFAULT_DOCS_ROOT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "cmdnav.toml";
pub const DEFAULT_BINARY_NAME: &str = "vesctl";

/// Extra category rules layered over the built-in tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryOverrides {
    pub namespace_rules: Vec<NamespaceRule>,
    pub pattern_rules: Vec<PatternRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub binary_name: String,
    pub docs_root: String,
    pub resource_first_groups: Vec<String>,
    pub service_grouped: Vec<ServiceGroupedAction>,
    pub protocol_root: String,
    pub default_category: String,
    pub categories: CategoryOverrides,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            binary_name: DEFAULT_BINARY_NAME.to_string(),
            docs_root: DEFAULT_DOCS_ROOT.to_string(),
            resource_first_groups: vec![DEFAULT_RESOURCE_FIRST_GROUP.to_string()],
            service_grouped: vec![ServiceGroupedAction {
                group: DEFAULT_RPC_GROUP.to_string(),
                action: DEFAULT_RPC_ACTION.to_string(),
            }],
            protocol_root: PROTOCOL_ROOT.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
            categories: CategoryOverrides::default(),
        }
    }
}

impl NavConfig {
    pub fn from_toml(content: &str) -> Result<Self, NavError> {
        toml::from_str(content).map_err(|e| NavError::ConfigError(e.to_string()))
    }

    /// Load `explicit` if given (it must exist), otherwise `cmdnav.toml` in
    /// `cwd` when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, NavError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(NavError::NotFound(format!(
                    "config file {}",
                    path.display()
                )));
            }
            return Self::read(path);
        }

        let implicit = cwd.join(CONFIG_FILE_NAME);
        if implicit.exists() {
            return Self::read(&implicit);
        }

        // No config = built-in tables
        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self, NavError> {
        let content = fs::read_to_string(path).map_err(NavError::IoError)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| NavError::ConfigError(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn layout_rules(&self) -> LayoutRules {
        LayoutRules::new(
            self.resource_first_groups.iter().cloned(),
            self.service_grouped.iter().cloned(),
        )
    }

    pub fn category_rules(&self) -> CategoryRules {
        CategoryRules::with_overrides(
            self.protocol_root.clone(),
            self.categories.namespace_rules.clone(),
            self.categories.pattern_rules.clone(),
            self.default_category.clone(),
        )
    }
}
