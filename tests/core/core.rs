use cmdnav::core::actions::{self, ACTION_ORDER, UNKNOWN_ACTION_RANK};
use cmdnav::core::category::{self, CategoryRules, NamespaceRule, PatternRule};
use cmdnav::core::error::NavError;
use cmdnav::core::model::{CliSpec, Command};
use cmdnav::core::rpc;
use cmdnav::core::tree::CommandTree;
use proptest::prelude::*;
use std::fs;
use std::path::PathBuf;

fn fixture_spec() -> CliSpec {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/spec.json");
    let content = fs::read_to_string(path).expect("fixture readable");
    CliSpec::from_json(&content).expect("fixture parses")
}

#[test]
fn fixture_builds_expected_tree() {
    let spec = fixture_spec();
    let tree = CommandTree::from_spec(&spec);

    assert_eq!(tree.name, "vesctl");
    assert_eq!(
        tree.group_names(),
        vec!["api-endpoint", "completion", "configuration", "login", "request", "version"]
    );
    // Every descriptor except the one with an empty path.
    assert_eq!(tree.count_commands(), 39);

    let list_ns = tree
        .get(&["configuration", "list", "namespace"])
        .and_then(|node| node.command.as_ref())
        .expect("nested descriptor placed");
    assert_eq!(list_ns.short, "List namespaces");
    assert!(list_ns.subcommands.is_empty());
    assert!(spec.extra.contains_key("ai_hints"));
}

#[test]
fn nested_and_flat_inputs_are_equivalent() {
    let nested = CliSpec::from_json(
        r#"{"commands":[{"path":["a"],"subcommands":[{"path":["a","b"],"subcommands":[{"path":["a","b","c"]}]}]}]}"#,
    )
    .expect("nested parses");
    let flat = CliSpec::from_json(
        r#"{"commands":[{"path":["a","b","c"]},{"path":["a"]},{"path":["a","b"]}]}"#,
    )
    .expect("flat parses");

    assert_eq!(
        CommandTree::from_spec(&nested),
        CommandTree::from_spec(&flat)
    );
}

#[test]
fn malformed_spec_is_a_json_error() {
    let err = CliSpec::from_json("[1, 2").expect_err("must fail");
    assert!(matches!(err, NavError::JsonError(_)));
}

#[test]
fn resource_matrix_orders_actions_canonically() {
    let tree = CommandTree::from_spec(&fixture_spec());
    let matrix = actions::collect_resources(tree.child("configuration").expect("group"));

    assert_eq!(
        matrix.keys().map(String::as_str).collect::<Vec<_>>(),
        vec![
            "alert_policy",
            "aws_vpc_site",
            "dns_zone",
            "http_loadbalancer",
            "namespace",
            "widget_thing"
        ]
    );

    let lb: Vec<&str> = matrix["http_loadbalancer"]
        .iter()
        .filter_map(Command::action)
        .collect();
    assert_eq!(lb, vec!["list", "get", "create", "delete", "status"]);

    let ns: Vec<&str> = matrix["namespace"]
        .iter()
        .filter_map(Command::action)
        .collect();
    assert_eq!(ns, vec!["list", "get", "add-labels"]);
}

#[test]
fn related_commands_are_ordered_by_action_name() {
    let tree = CommandTree::from_spec(&fixture_spec());
    let related = actions::related_commands(&tree, "configuration", "http_loadbalancer");
    let names: Vec<String> = related.iter().map(|cmd| cmd.full_command("vesctl")).collect();
    assert_eq!(
        names,
        vec![
            "vesctl configuration create http_loadbalancer",
            "vesctl configuration delete http_loadbalancer",
            "vesctl configuration get http_loadbalancer",
            "vesctl configuration list http_loadbalancer",
            "vesctl configuration status http_loadbalancer",
        ]
    );
    assert!(actions::related_commands(&tree, "missing", "x").is_empty());
}

#[test]
fn rpc_procedures_group_by_service() {
    let tree = CommandTree::from_spec(&fixture_spec());
    let groups = rpc::group_procedures(tree.get(&["request", "rpc"]).expect("rpc node"));

    assert_eq!(
        groups.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["alert", "api_sec", "dns_zone"]
    );
    let alert: Vec<&str> = groups["alert"]
        .iter()
        .map(|p| p.procedure_name.as_str())
        .collect();
    assert_eq!(alert, vec!["Alerts", "AlertsHistory"]);
    assert_eq!(groups["api_sec"][0].full_name, "api_sec.APIGroupsApiep.GetApiGroups");
}

#[test]
fn builtin_categories_resolve() {
    assert_eq!(category::resolve("http_loadbalancer", None), "Load Balancing");
    assert_eq!(category::resolve("dns_zone", None), "DNS");
    assert_eq!(category::resolve("alert_policy", None), "Observability");
    assert_eq!(category::resolve("widget_thing", None), "General");
    assert_eq!(
        category::resolve("widget_thing", Some("ves.io.schema.views.widget_thing")),
        "Views"
    );
    assert_eq!(
        category::resolve("http_loadbalancer", Some("ves.io.schema.views.http_loadbalancer")),
        "Load Balancing"
    );
    // Empty namespace behaves like no namespace.
    assert_eq!(category::resolve("dns_zone", Some("")), "DNS");
}

#[test]
fn user_rules_take_precedence() {
    let rules = CategoryRules::with_overrides(
        "ves.io.schema.",
        vec![NamespaceRule {
            prefix: "views".to_string(),
            category: "Virtual Hosts".to_string(),
        }],
        vec![PatternRule {
            pattern: "DNS".to_string(),
            category: "Name Service".to_string(),
        }],
        "Misc",
    );

    assert_eq!(rules.resolve("anything", Some("ves.io.schema.views.thing")), "Virtual Hosts");
    assert_eq!(
        rules.resolve("x", Some("ves.io.schema.views.http_loadbalancer")),
        "Load Balancing"
    );
    assert_eq!(rules.resolve("dns_zone", None), "Name Service");
    assert_eq!(rules.resolve("unknown", None), "Misc");
}

#[test]
fn categorize_covers_every_resource() {
    let rules = CategoryRules::builtin();
    let map = rules.categorize(["namespace", "widget_thing"], None);
    assert_eq!(map["namespace"], "Identity");
    assert_eq!(map["widget_thing"], "General");
}

fn action_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(ACTION_ORDER.to_vec()).prop_map(str::to_string),
        "[a-z]{1,6}".prop_map(|s| format!("x-{s}")),
    ]
}

proptest! {
    #[test]
    fn sort_by_action_is_stable_and_canonical(actions in proptest::collection::vec(action_strategy(), 0..24)) {
        let mut indexed: Vec<(usize, String)> = actions.into_iter().enumerate().collect();
        actions::sort_by_action(&mut indexed, |(_, action)| action.as_str());

        for pair in indexed.windows(2) {
            let (ia, a) = &pair[0];
            let (ib, b) = &pair[1];
            let (ra, rb) = (actions::action_rank(a), actions::action_rank(b));
            prop_assert!(ra <= rb);
            if ra == rb {
                prop_assert!(ia < ib);
            }
        }
        prop_assert!(indexed.iter().all(|(_, a)| actions::action_rank(a) <= UNKNOWN_ACTION_RANK));
    }

    #[test]
    fn tree_is_insertion_order_independent(seed in proptest::collection::vec(0usize..6, 1..12)) {
        let paths: Vec<Vec<String>> = seed
            .iter()
            .map(|n| ["g".to_string(), format!("a{}", n % 3), format!("r{n}")].to_vec())
            .collect();

        let mut forward = CommandTree::new("root");
        for path in &paths {
            forward.insert(Command::new(path.as_slice(), ""));
        }
        let mut backward = CommandTree::new("root");
        for path in paths.iter().rev() {
            backward.insert(Command::new(path.as_slice(), ""));
        }
        prop_assert_eq!(forward, backward);
    }
}
