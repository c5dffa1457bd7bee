//! Resource categorization for navigation.
//!
//! A resource's category comes from, in order:
//! 1. its protocol namespace, matched against namespace rules longest prefix first;
//! 2. its lowercased name, scanned against substring patterns in declared order;
//! 3. the default category.
//!
//! The rule tables are immutable once built, so resolution is a pure function
//! of `(resource, namespace)` and the renderer and the navigation builder
//! always agree.

use crate::core::protocol::ProtocolIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const DEFAULT_CATEGORY: &str = "General";

/// Dotted root shared by every protocol namespace.
pub const PROTOCOL_ROOT: &str = "ves.io.schema.";

/// Namespace prefix → category. Order here is irrelevant; rules are tried
/// longest prefix first.
const NAMESPACE_RULES: &[(&str, &str)] = &[
    ("views.http_loadbalancer", "Load Balancing"),
    ("views.tcp_loadbalancer", "Load Balancing"),
    ("views.udp_loadbalancer", "Load Balancing"),
    ("views.origin_pool", "Load Balancing"),
    ("views.cdn_loadbalancer", "CDN"),
    ("views.aws_vpc_site", "Sites"),
    ("views.aws_tgw_site", "Sites"),
    ("views.azure_vnet_site", "Sites"),
    ("views.gcp_vpc_site", "Sites"),
    ("views.voltstack_site", "Sites"),
    ("views.securemesh_site", "Sites"),
    ("views.forward_proxy_policy", "Security"),
    ("views.rate_limiter_policy", "Security"),
    ("views.api_definition", "API Security"),
    ("views", "Views"),
    ("app_firewall", "Security"),
    ("service_policy", "Security"),
    ("waf", "Security"),
    ("malicious_user_mitigation", "Security"),
    ("bot_defense", "Bot Defense"),
    ("shape", "Bot Defense"),
    ("api_sec", "API Security"),
    ("dns_zone", "DNS"),
    ("dns_domain", "DNS"),
    ("dns_load_balancer", "DNS"),
    ("network_firewall", "Networking"),
    ("network_policy", "Networking"),
    ("virtual_network", "Networking"),
    ("network_connector", "Networking"),
    ("bgp", "Networking"),
    ("site", "Sites"),
    ("fleet", "Sites"),
    ("cloud_credentials", "Cloud Credentials"),
    ("certificate", "Certificates"),
    ("trusted_ca_list", "Certificates"),
    ("secret_management", "Secrets"),
    ("namespace", "Identity"),
    ("role", "Identity"),
    ("user", "Identity"),
    ("tenant", "Identity"),
    ("alert_policy", "Observability"),
    ("alert_receiver", "Observability"),
    ("log_receiver", "Observability"),
    ("global_log_receiver", "Observability"),
    ("discovery", "Service Discovery"),
    ("k8s_cluster", "Kubernetes"),
    ("virtual_k8s", "Kubernetes"),
];

/// Name substring → category. First match wins, so order matters.
const PATTERN_RULES: &[(&str, &str)] = &[
    ("loadbalancer", "Load Balancing"),
    ("origin_pool", "Load Balancing"),
    ("healthcheck", "Load Balancing"),
    ("cdn", "CDN"),
    ("dns", "DNS"),
    ("alert", "Observability"),
    ("log_receiver", "Observability"),
    ("monitor", "Observability"),
    ("firewall", "Security"),
    ("waf", "Security"),
    ("bot", "Bot Defense"),
    ("api_", "API Security"),
    ("policy", "Security"),
    ("certificate", "Certificates"),
    ("secret", "Secrets"),
    ("credential", "Cloud Credentials"),
    ("site", "Sites"),
    ("fleet", "Sites"),
    ("network", "Networking"),
    ("bgp", "Networking"),
    ("route", "Networking"),
    ("tunnel", "Networking"),
    ("k8s", "Kubernetes"),
    ("namespace", "Identity"),
    ("role", "Identity"),
    ("user", "Identity"),
    ("token", "Identity"),
    ("discovery", "Service Discovery"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRule {
    pub prefix: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub pattern: String,
    pub category: String,
}

/// Immutable rule tables plus the default label.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    protocol_root: String,
    /// Sorted by descending prefix length; ties keep declared order.
    namespace_rules: Vec<NamespaceRule>,
    pattern_rules: Vec<PatternRule>,
    default_category: String,
}

static BUILTIN: LazyLock<CategoryRules> = LazyLock::new(CategoryRules::builtin);

/// Shared instance of the built-in tables.
pub fn builtin_rules() -> &'static CategoryRules {
    &BUILTIN
}

/// Resolve against the built-in tables.
pub fn resolve(resource: &str, protocol_namespace: Option<&str>) -> &'static str {
    BUILTIN.resolve(resource, protocol_namespace)
}

impl CategoryRules {
    pub fn new(
        protocol_root: impl Into<String>,
        namespace_rules: Vec<NamespaceRule>,
        pattern_rules: Vec<PatternRule>,
        default_category: impl Into<String>,
    ) -> Self {
        let mut namespace_rules: Vec<NamespaceRule> = namespace_rules
            .into_iter()
            .filter(|rule| !rule.prefix.is_empty())
            .collect();
        // Stable: equal-length prefixes keep their declared order.
        namespace_rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        let pattern_rules = pattern_rules
            .into_iter()
            .filter(|rule| !rule.pattern.is_empty())
            .map(|rule| PatternRule {
                pattern: rule.pattern.to_lowercase(),
                category: rule.category,
            })
            .collect();

        Self {
            protocol_root: protocol_root.into(),
            namespace_rules,
            pattern_rules,
            default_category: default_category.into(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(
            PROTOCOL_ROOT,
            NAMESPACE_RULES
                .iter()
                .map(|(prefix, category)| NamespaceRule {
                    prefix: prefix.to_string(),
                    category: category.to_string(),
                })
                .collect(),
            PATTERN_RULES
                .iter()
                .map(|(pattern, category)| PatternRule {
                    pattern: pattern.to_string(),
                    category: category.to_string(),
                })
                .collect(),
            DEFAULT_CATEGORY,
        )
    }

    /// Built-in tables extended with user rules. User namespace rules join the
    /// longest-prefix ordering (winning ties); user patterns are scanned first.
    pub fn with_overrides(
        protocol_root: impl Into<String>,
        namespace_rules: Vec<NamespaceRule>,
        pattern_rules: Vec<PatternRule>,
        default_category: impl Into<String>,
    ) -> Self {
        let builtin = Self::builtin();
        let mut namespaces = namespace_rules;
        namespaces.extend(builtin.namespace_rules);
        let mut patterns = pattern_rules;
        patterns.extend(builtin.pattern_rules);
        Self::new(protocol_root, namespaces, patterns, default_category)
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    pub fn is_default(&self, category: &str) -> bool {
        category == self.default_category
    }

    pub fn resolve(&self, resource: &str, protocol_namespace: Option<&str>) -> &str {
        protocol_namespace
            .filter(|ns| !ns.is_empty())
            .and_then(|ns| self.match_namespace(ns))
            .or_else(|| self.match_pattern(resource))
            .unwrap_or(&self.default_category)
    }

    /// Namespace tier only.
    pub fn match_namespace(&self, protocol_namespace: &str) -> Option<&str> {
        let path = protocol_namespace
            .strip_prefix(self.protocol_root.as_str())
            .unwrap_or(protocol_namespace);

        self.namespace_rules
            .iter()
            .find(|rule| namespace_matches(path, &rule.prefix))
            .map(|rule| rule.category.as_str())
    }

    /// Name-pattern tier only.
    pub fn match_pattern(&self, resource: &str) -> Option<&str> {
        let name = resource.to_lowercase();
        self.pattern_rules
            .iter()
            .find(|rule| name.contains(&rule.pattern))
            .map(|rule| rule.category.as_str())
    }

    /// Category for each resource, using namespaces from `index` when present.
    pub fn categorize<'r, I>(&self, resources: I, index: Option<&ProtocolIndex>) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = &'r str>,
    {
        resources
            .into_iter()
            .map(|resource| {
                let namespace = index.and_then(|idx| idx.namespace(resource));
                (
                    resource.to_string(),
                    self.resolve(resource, namespace).to_string(),
                )
            })
            .collect()
    }

    /// Order category labels alphabetically with the default label last.
    pub fn sort_categories<S: AsRef<str>>(&self, categories: &mut [S]) {
        categories.sort_by(|a, b| {
            let (a, b) = (a.as_ref(), b.as_ref());
            self.is_default(a)
                .cmp(&self.is_default(b))
                .then_with(|| a.cmp(b))
        });
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `path` equals `prefix`, starts with it, or contains it right after a `.`.
fn namespace_matches(path: &str, prefix: &str) -> bool {
    path.starts_with(prefix)
        || path
            .match_indices(prefix)
            .any(|(at, _)| at > 0 && path.as_bytes()[at - 1] == b'.')
}
