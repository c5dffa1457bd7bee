use cmdnav::core::category::PROTOCOL_ROOT;
use cmdnav::core::protocol::ProtocolIndex;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn openapi_file(dir: &Path, stem: &str, operations: &[(&str, &str)]) {
    let mut methods = serde_json::Map::new();
    for (i, (rpc, url)) in operations.iter().enumerate() {
        methods.insert(
            format!("op{i}"),
            json!({"x-ves-proto-rpc": rpc, "externalDocs": {"url": url}}),
        );
    }
    let document = json!({"paths": {"/api/object": methods}});
    fs::write(
        dir.join(format!("{stem}.json")),
        serde_json::to_string(&document).expect("serialize"),
    )
    .expect("write openapi file");
}

#[test]
fn load_dir_indexes_namespaces_and_doc_urls() {
    let tmp = tempdir().expect("tempdir");
    let dir = tmp.path();

    openapi_file(
        dir,
        "docs-cloud-f5-com.0002.public.ves.io.schema.dns_zone.ves-swagger",
        &[
            ("ves.io.schema.dns_zone.API.List", "https://docs.example/dns_zone/list"),
            ("ves.io.schema.dns_zone.API.Create", "https://docs.example/dns_zone/create"),
            ("ves.io.schema.dns_zone.CustomAPI.Import", "https://docs.example/dns_zone/import"),
        ],
    );
    openapi_file(
        dir,
        "docs-cloud-f5-com.0001.public.ves.io.schema.views.http_loadbalancer.ves-swagger",
        &[("ves.io.schema.views.http_loadbalancer.API.Get", "https://docs.example/lb/get")],
    );
    fs::write(dir.join("notes.txt"), "ignored").expect("write");

    let index = ProtocolIndex::load_dir(dir, PROTOCOL_ROOT);
    assert_eq!(index.resources(), vec!["dns_zone", "http_loadbalancer"]);
    assert_eq!(
        index.namespace("http_loadbalancer"),
        Some("ves.io.schema.views.http_loadbalancer")
    );
    assert_eq!(index.namespace("dns_zone"), Some("ves.io.schema.dns_zone"));

    assert_eq!(
        index.doc_url("dns_zone", "list"),
        Some("https://docs.example/dns_zone/list")
    );
    assert_eq!(
        index.doc_url("dns_zone", "add-labels"),
        Some("https://docs.example/dns_zone/create")
    );
    assert_eq!(index.doc_url("dns_zone", "delete"), None);
    assert_eq!(
        index.doc_url("http_loadbalancer", "status"),
        Some("https://docs.example/lb/get")
    );
}

#[test]
fn first_file_per_resource_wins() {
    let tmp = tempdir().expect("tempdir");
    let dir = tmp.path();
    openapi_file(
        dir,
        "a.ves.io.schema.site.ves-swagger",
        &[("ves.io.schema.site.API.List", "https://docs.example/first")],
    );
    openapi_file(
        dir,
        "b.ves.io.schema.site.ves-swagger",
        &[("ves.io.schema.site.API.List", "https://docs.example/second")],
    );

    let index = ProtocolIndex::load_dir(dir, PROTOCOL_ROOT);
    assert_eq!(index.len(), 1);
    assert_eq!(index.doc_url("site", "list"), Some("https://docs.example/first"));
}

#[test]
fn malformed_files_are_skipped() {
    let tmp = tempdir().expect("tempdir");
    let dir = tmp.path();
    fs::write(
        dir.join("docs.ves.io.schema.namespace.ves-swagger.json"),
        "{not json",
    )
    .expect("write");
    openapi_file(
        dir,
        "docs.ves.io.schema.role.ves-swagger",
        &[("ves.io.schema.role.API.Get", "https://docs.example/role/get")],
    );

    let index = ProtocolIndex::load_dir(dir, PROTOCOL_ROOT);
    assert_eq!(index.resources(), vec!["role"]);
    assert_eq!(index.namespace("namespace"), None);
}

#[test]
fn missing_dir_yields_empty_index() {
    let tmp = tempdir().expect("tempdir");
    let index = ProtocolIndex::load_dir(&tmp.path().join("absent"), PROTOCOL_ROOT);
    assert!(index.is_empty());
}

#[test]
fn load_file_reads_prebuilt_index() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("index.json");
    fs::write(
        &path,
        serde_json::to_string(&json!({
            "widget_thing": {
                "protocol_namespace": "ves.io.schema.views.widget_thing",
                "operation_doc_urls": {"List": "https://docs.example/widget/list"}
            },
            "broken": "not an object"
        }))
        .expect("serialize"),
    )
    .expect("write");

    let index = ProtocolIndex::load_file(&path);
    assert_eq!(index.len(), 1);
    assert_eq!(
        index.namespace("widget_thing"),
        Some("ves.io.schema.views.widget_thing")
    );
    assert_eq!(
        index.doc_url("widget_thing", "list"),
        Some("https://docs.example/widget/list")
    );
}

#[test]
fn load_file_with_invalid_json_yields_empty_index() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("index.json");
    fs::write(&path, "{not json").expect("write");

    assert!(ProtocolIndex::load_file(&path).is_empty());
}

#[test]
fn load_file_missing_yields_empty_index() {
    let tmp = tempdir().expect("tempdir");
    assert!(ProtocolIndex::load_file(&tmp.path().join("absent.json")).is_empty());
}

#[test]
fn load_dir_on_a_file_yields_empty_index() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("not-a-dir.json");
    fs::write(&path, "{}").expect("write");

    assert!(ProtocolIndex::load_dir(&path, PROTOCOL_ROOT).is_empty());
}
