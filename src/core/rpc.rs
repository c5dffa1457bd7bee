//! RPC procedure grouping.
//!
//! Children of an RPC action node are dotted procedure identifiers such as
//! `alert.CustomAPI.Alerts`. They are grouped by their first segment (the
//! service) and ordered by their last segment (the procedure).

use crate::core::model::Command;
use crate::core::tree::CommandTree;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcProcedure {
    pub full_name: String,
    pub service: String,
    pub procedure_name: String,
    pub command: Command,
}

/// service → procedures sorted by `procedure_name`.
pub type RpcServiceGroups = BTreeMap<String, Vec<RpcProcedure>>;

/// First dot segment, or the whole name when there is no dot.
pub fn extract_service(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Last dot segment, or the whole name when there is no dot.
pub fn extract_procedure(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

pub fn group_procedures(rpc_node: &CommandTree) -> RpcServiceGroups {
    let mut services = RpcServiceGroups::new();

    for (full_name, proc_node) in &rpc_node.children {
        let Some(command) = &proc_node.command else {
            continue;
        };
        let service = extract_service(full_name);
        services
            .entry(service.to_string())
            .or_default()
            .push(RpcProcedure {
                full_name: full_name.clone(),
                service: service.to_string(),
                procedure_name: extract_procedure(full_name).to_string(),
                command: command.clone(),
            });
    }

    for procedures in services.values_mut() {
        procedures.sort_by(|a, b| a.procedure_name.cmp(&b.procedure_name));
    }

    services
}
