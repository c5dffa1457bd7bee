//! Command descriptors as emitted by a CLI's `--spec` introspection mode.
//!
//! These types mirror the JSON document one-to-one. Missing fields default
//! to empty values so partially populated descriptors still load; a
//! document that is not valid JSON at all is rejected by [`CliSpec::from_json`].

use crate::core::error::NavError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single flag accepted by a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shorthand: String,
    #[serde(default)]
    pub default: String,
}

/// One command descriptor. `subcommands` may nest further descriptors
/// whose `path` is already fully qualified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub r#use: String,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub long: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub flags: Vec<Flag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<Command>,
}

impl Command {
    /// Build a bare descriptor for `path`, mostly useful for listings and tests.
    pub fn new<S: AsRef<str>>(path: &[S], short: &str) -> Self {
        let path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
        Self {
            r#use: path.last().cloned().unwrap_or_default(),
            path,
            short: short.to_string(),
            ..Self::default()
        }
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Top-level group segment (`path[0]`).
    pub fn group(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    /// Action segment (`path[1]`).
    pub fn action(&self) -> Option<&str> {
        self.path.get(1).map(String::as_str)
    }

    /// Resource segment (`path[2]`).
    pub fn resource(&self) -> Option<&str> {
        self.path.get(2).map(String::as_str)
    }

    /// Full invocation, e.g. `vesctl configuration list namespace`.
    pub fn full_command(&self, binary: &str) -> String {
        if self.path.is_empty() {
            return binary.to_string();
        }
        format!("{} {}", binary, self.path.join(" "))
    }
}

/// The whole introspection document.
///
/// Only `commands` and `global_flags` are interpreted; every other
/// top-level key is carried through untouched in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub global_flags: Vec<Flag>,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CliSpec {
    pub fn from_json(input: &str) -> Result<Self, NavError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Version string, `"dev"` when the document does not carry one.
    pub fn version_or_dev(&self) -> &str {
        if self.version.is_empty() {
            "dev"
        } else {
            &self.version
        }
    }
}
