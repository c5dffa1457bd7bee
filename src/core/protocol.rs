//! Protocol-metadata index: resource name → protocol namespace and per-operation doc links.
//!
//! The index is optional everywhere. When it is missing, categorization falls
//! back to name patterns and no doc links are produced.

use crate::core::actions;
use crate::core::error::NavError;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Suffix of a standard CRUD operation id, e.g. `ves.io.schema.namespace.API.List`.
static API_OPERATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.API\.([A-Za-z0-9_]+)$").expect("static regex is valid"));

const OPENAPI_FILE_SUFFIX: &str = "ves-swagger";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolEntry {
    #[serde(default)]
    pub protocol_namespace: String,
    /// Operation name (`List`, `Create`, ...) → documentation URL.
    #[serde(default)]
    pub operation_doc_urls: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProtocolIndex {
    entries: FxHashMap<String, ProtocolEntry>,
}

impl ProtocolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry unless the resource is already indexed. Returns whether it was added.
    pub fn insert(&mut self, resource: impl Into<String>, entry: ProtocolEntry) -> bool {
        let resource = resource.into();
        if self.entries.contains_key(&resource) {
            return false;
        }
        self.entries.insert(resource, entry);
        true
    }

    pub fn get(&self, resource: &str) -> Option<&ProtocolEntry> {
        self.entries.get(resource)
    }

    pub fn namespace(&self, resource: &str) -> Option<&str> {
        self.get(resource)
            .map(|entry| entry.protocol_namespace.as_str())
            .filter(|ns| !ns.is_empty())
    }

    /// Documentation URL for a CLI action on a resource.
    pub fn doc_url(&self, resource: &str, action: &str) -> Option<&str> {
        let operation = actions::operation_for_action(action)?;
        self.get(resource)?
            .operation_doc_urls
            .get(operation)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexed resource names in ascending order.
    pub fn resources(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Index every `*.json` OpenAPI document in `dir`.
    ///
    /// Files are visited in name order and the first file for a resource
    /// wins. Unreadable or malformed files are skipped with a warning, and a
    /// missing or unreadable directory yields an empty index.
    pub fn load_dir(dir: &Path, protocol_root: &str) -> Self {
        let mut index = Self::new();

        if !dir.is_dir() {
            warn!(dir = %dir.display(), "protocol metadata directory not found, using name patterns only");
            return index;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot read protocol metadata directory, using name patterns only");
                return index;
            }
        };
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for path in files {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some((resource, namespace)) = parse_file_stem(stem, protocol_root) else {
                debug!(file = %path.display(), "file name does not name a schema resource");
                continue;
            };
            if index.entries.contains_key(&resource) {
                continue;
            }

            let document = match fs::read_to_string(&path)
                .map_err(NavError::from)
                .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).map_err(NavError::from))
            {
                Ok(document) => document,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping protocol metadata file");
                    continue;
                }
            };

            let entry = ProtocolEntry {
                protocol_namespace: namespace,
                operation_doc_urls: operation_doc_urls(&document),
            };
            index.insert(resource, entry);
        }

        info!(resources = index.len(), dir = %dir.display(), "loaded protocol metadata");
        index
    }

    /// Load a pre-built JSON index `{resource: {protocol_namespace, operation_doc_urls}}`.
    /// Entries of the wrong shape are skipped with a warning. A file that
    /// cannot be read or parsed yields an empty index.
    pub fn load_file(path: &Path) -> Self {
        let mut index = Self::new();

        let raw = match read_index_file(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping protocol index file, using name patterns only");
                return index;
            }
        };

        for (resource, value) in raw {
            match serde_json::from_value::<ProtocolEntry>(value) {
                Ok(entry) => {
                    index.insert(resource, entry);
                }
                Err(e) => {
                    warn!(resource = %resource, error = %e, "skipping malformed protocol index entry");
                }
            }
        }
        info!(resources = index.len(), file = %path.display(), "loaded protocol index");
        index
    }
}

fn read_index_file(path: &Path) -> Result<BTreeMap<String, serde_json::Value>, NavError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Split an OpenAPI file stem such as
/// `docs-cloud-f5-com.0073.public.ves.io.schema.views.http_loadbalancer.ves-swagger`
/// into the resource name and its protocol namespace.
pub fn parse_file_stem(stem: &str, protocol_root: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = stem.split('.').collect();
    let schema_idx = parts.iter().position(|p| *p == "schema")?;
    if parts.len() < 2 {
        return None;
    }
    let resource_idx = parts.len() - 2;
    let resource = parts[resource_idx];
    if resource.is_empty() || resource == OPENAPI_FILE_SUFFIX || resource_idx <= schema_idx {
        return None;
    }

    let namespace = format!(
        "{}{}",
        protocol_root,
        parts[schema_idx + 1..=resource_idx].join(".")
    );
    Some((resource.to_string(), namespace))
}

/// Collect `externalDocs.url` for every standard API operation in an OpenAPI document.
pub fn operation_doc_urls(document: &serde_json::Value) -> BTreeMap<String, String> {
    let mut urls = BTreeMap::new();
    let Some(paths) = document.get("paths").and_then(|p| p.as_object()) else {
        return urls;
    };

    for methods in paths.values() {
        let Some(methods) = methods.as_object() else {
            continue;
        };
        for details in methods.values() {
            let Some(rpc) = details.get("x-ves-proto-rpc").and_then(|v| v.as_str()) else {
                continue;
            };
            let Some(caps) = API_OPERATION_RE.captures(rpc) else {
                continue;
            };
            let Some(url) = details
                .get("externalDocs")
                .and_then(|d| d.get("url"))
                .and_then(|u| u.as_str())
            else {
                continue;
            };
            urls.entry(caps[1].to_string()).or_insert_with(|| url.to_string());
        }
    }

    urls
}
