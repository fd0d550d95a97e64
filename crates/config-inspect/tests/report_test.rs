//! End-to-end report generation from export files.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

use tenantdoc_common::FaultKind;
use tenantdoc_config::{ConfigExport, Inventory};
use tenantdoc_inspect::{
    generate, Block, DocumentFormat, DotSourceWriter, ImageFormat, ReportBuilder, ReportSettings,
};

fn export(tenant_children: Value) -> Value {
    json!({
        "totalCount": "1",
        "imdata": [
            {"fvTenant": {
                "attributes": {"name": "acme", "dn": "uni/tn-acme"},
                "children": tenant_children
            }}
        ]
    })
}

fn networking_fixture() -> Value {
    export(json!([
        {"fvCtx": {"attributes": {"name": "prod"}}},
        {"fvCtx": {"attributes": {"name": "lab"}}},
        {"fvBD": {"attributes": {"name": "web"}, "children": [
            {"fvRsCtx": {"attributes": {"tnFvCtxName": "prod"}}},
            {"fvSubnet": {"attributes": {"ip": "10.0.0.1/24"}}},
            {"fvSubnet": {"attributes": {"ip": "10.0.0.2/24"}}}
        ]}},
        {"fvBD": {"attributes": {"name": "orphan"}, "children": []}},
        {"l3extOut": {"attributes": {"name": "wan"}, "children": [
            {"l3extRsEctx": {"attributes": {"tnFvCtxName": "prod"}}},
            {"l3extLNodeP": {"attributes": {"name": "border"}, "children": [
                {"l3extRsNodeL3OutAtt": {"attributes": {"rtrId": "1.1.1.1"}, "children": [
                    {"ipRouteP": {"attributes": {"ip": "10.0.1.1"}}}
                ]}}
            ]}},
            {"l3extInstP": {"attributes": {"name": "any"}, "children": [
                {"l3extSubnet": {"attributes": {"ip": "0.0.0.0/0", "scope": "import-security"}}},
                {"fvRsCons": {"attributes": {"tnVzBrCPName": "web"}}}
            ]}}
        ]}},
        {"vzBrCP": {"attributes": {"name": "web"}}},
        {"vzBrCP": {"attributes": {"name": "unused"}}},
        {"fvAp": {"attributes": {"name": "shop"}, "children": [
            {"fvAEPg": {"attributes": {"name": "front", "descr": "storefront"}, "children": [
                {"fvRsBd": {"attributes": {"tnFvBDName": "web"}}},
                {"fvRsProv": {"attributes": {"tnVzBrCPName": "web"}}},
                {"fvRsPathAtt": {"attributes": {
                    "tDn": "topology/pod-1/paths-101/pathep-[eth1/1]",
                    "encap": "vlan-100",
                    "mode": "regular"
                }}},
                {"fvRsPathAtt": {"attributes": {
                    "tDn": "topology/pod-1/paths-101/pathep-[eth1/1]",
                    "encap": "vlan-200",
                    "mode": "regular"
                }}}
            ]}}
        ]}}
    ]))
}

fn write_export(dir: &Path, value: &Value) -> PathBuf {
    let path = dir.join("tenant.json");
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn settings(dir: &Path) -> ReportSettings {
    ReportSettings {
        image_dir: dir.join("images"),
        image_format: ImageFormat::Dot,
        ..ReportSettings::default()
    }
}

fn paragraphs(blocks: &[Block]) -> Vec<&str> {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Paragraph { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Blocks between the heading `title` and the next heading at the same
/// level or above.
fn section<'a>(blocks: &'a [Block], title: &str) -> &'a [Block] {
    let start = blocks
        .iter()
        .position(|b| matches!(b, Block::Heading { text, .. } if text == title))
        .unwrap_or_else(|| panic!("no heading '{title}'"));
    let level = match &blocks[start] {
        Block::Heading { level, .. } => *level,
        _ => unreachable!(),
    };
    let end = blocks[start + 1..]
        .iter()
        .position(|b| matches!(b, Block::Heading { level: l, .. } if *l <= level))
        .map(|offset| start + 1 + offset)
        .unwrap_or(blocks.len());
    &blocks[start + 1..end]
}

#[test]
fn vrf_section_lists_members_and_diagram() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());
    let settings = settings(dir.path());

    let report = generate(
        &settings,
        &input,
        &dir.path().join("report.md"),
        DocumentFormat::Markdown,
    )
    .unwrap();

    let prod = section(report.document.blocks(), "prod");
    let text = paragraphs(prod);
    assert!(text.contains(&"web. subnets: 10.0.0.1/24, 10.0.0.2/24"));
    assert!(text.contains(&"wan. static routes: 10.0.1.1"));
    assert!(text.contains(&"imported subnets: 0.0.0.0/0"));
    assert!(text.contains(&"consumed contracts: web"));
    assert!(!text.iter().any(|t| t.starts_with("exported subnets")));

    let diagram = fs::read_to_string(settings.image_dir.join("prod.dot")).unwrap();
    let edges: Vec<&str> = diagram.lines().filter(|l| l.contains(" -- ")).collect();
    assert_eq!(
        edges,
        vec![
            "    \"VRF prod\" -- \"BD web\";",
            "    \"BD web\" -- \"10.0.0.1/24\";",
            "    \"BD web\" -- \"10.0.0.2/24\";",
            "    \"VRF prod\" -- \"L3out wan\";",
        ]
    );
}

#[test]
fn empty_vrf_has_no_diagram() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());
    let settings = settings(dir.path());

    let report = generate(
        &settings,
        &input,
        &dir.path().join("report.md"),
        DocumentFormat::Markdown,
    )
    .unwrap();

    let lab = section(report.document.blocks(), "lab");
    assert_eq!(
        paragraphs(lab),
        vec![
            "No bridge domains associated to this VRF.",
            "No external IP connections associated to this VRF.",
        ]
    );
    assert!(!lab.iter().any(|b| matches!(b, Block::Picture { .. })));
    assert!(!settings.image_dir.join("lab.dot").exists());
}

#[test]
fn unbound_bridge_domain_is_in_no_vrf() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());

    let report = generate(
        &settings(dir.path()),
        &input,
        &dir.path().join("report.md"),
        DocumentFormat::Markdown,
    )
    .unwrap();

    let networking = section(report.document.blocks(), "Networking configuration");
    assert!(!paragraphs(networking).iter().any(|t| t.contains("orphan")));
}

#[test]
fn unused_contract_is_single_node() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());
    let settings = settings(dir.path());

    let report = generate(
        &settings,
        &input,
        &dir.path().join("report.md"),
        DocumentFormat::Markdown,
    )
    .unwrap();

    let unused = section(report.document.blocks(), "Contract unused");
    assert_eq!(
        paragraphs(unused),
        vec![
            "This contract is not used by EPGs.",
            "This contract is not used by L3 Outs.",
        ]
    );

    let diagram = fs::read_to_string(settings.image_dir.join("unused.dot")).unwrap();
    assert!(diagram.starts_with("digraph \"unused\""));
    assert!(diagram.contains("\"Contract unused\";"));
    assert!(!diagram.contains(" -> "));
}

#[test]
fn used_contract_lists_roles() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());

    let report = generate(
        &settings(dir.path()),
        &input,
        &dir.path().join("report.md"),
        DocumentFormat::Markdown,
    )
    .unwrap();

    let web = section(report.document.blocks(), "Contract web");
    assert_eq!(
        paragraphs(web),
        vec![
            "The following EPGs use this contract:",
            "EPG front",
            "Provided by:",
            "front - storefront",
            "The following L3 Outs use this contract:",
            "L3 Out wan",
        ]
    );
}

#[test]
fn path_attachments_keep_input_order() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());

    let report = generate(
        &settings(dir.path()),
        &input,
        &dir.path().join("report.md"),
        DocumentFormat::Markdown,
    )
    .unwrap();

    let front = section(report.document.blocks(), "EPG front");
    let text = paragraphs(front);
    let path_rows: Vec<&str> = text
        .iter()
        .copied()
        .filter(|t| t.starts_with("topology/"))
        .collect();
    assert_eq!(
        path_rows,
        vec![
            "topology/pod-1/paths-101/pathep-[eth1/1]; vlan-100; regular",
            "topology/pod-1/paths-101/pathep-[eth1/1]; vlan-200; regular",
        ]
    );
    assert!(text.contains(&"Bridge Domain: web"));
    assert!(text.contains(&"web - storefront"));
}

#[test]
fn rendering_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());
    let settings = settings(dir.path());
    let first = dir.path().join("first.md");
    let second = dir.path().join("second.md");

    generate(&settings, &input, &first, DocumentFormat::Markdown).unwrap();
    generate(&settings, &input, &second, DocumentFormat::Markdown).unwrap();

    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn schema_fault_writes_no_document() {
    let dir = TempDir::new().unwrap();
    let broken = export(json!([
        {"fvAp": {"attributes": {"name": "shop"}, "children": [
            {"fvAEPg": {"attributes": {"name": "front"}, "children": [
                {"fvRsPathAtt": {"attributes": {"tDn": "topology/pod-1/paths-101"}}}
            ]}}
        ]}}
    ]));
    let input = write_export(dir.path(), &broken);
    let output = dir.path().join("report.md");

    let err = generate(&settings(dir.path()), &input, &output, DocumentFormat::Markdown)
        .unwrap_err();

    assert_eq!(err.kind(), FaultKind::Schema);
    assert!(!output.exists());
}

#[test]
fn tenant_without_objects() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &export(json!([])));
    let output = dir.path().join("report.md");

    let report = generate(&settings(dir.path()), &input, &output, DocumentFormat::Markdown)
        .unwrap();

    assert!(report.images.is_empty());
    let markdown = fs::read_to_string(&output).unwrap();
    assert!(markdown.starts_with("# ACI Configuration for tenant acme\n"));
    assert!(markdown.contains("using a private network defined in the common tenant."));
    assert!(markdown.contains("This tenant has no EPGs defined."));
    assert!(markdown.contains("This tenant has no contracts defined."));
}

#[test]
fn builder_uses_writer_format() {
    let dir = TempDir::new().unwrap();
    let export = ConfigExport::from_json(&networking_fixture().to_string()).unwrap();
    let inventory = Inventory::classify(export.tenant().unwrap());
    let settings = ReportSettings {
        image_dir: dir.path().to_path_buf(),
        ..ReportSettings::default()
    };

    let report = ReportBuilder::new(&settings, &DotSourceWriter)
        .build(&inventory)
        .unwrap();

    assert_eq!(
        report.images,
        vec![
            dir.path().join("prod.dot"),
            dir.path().join("web.dot"),
            dir.path().join("unused.dot"),
        ]
    );
    assert!(report.images.iter().all(|p| p.exists()));
}

#[test]
fn json_output() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());
    let output = dir.path().join("report.json");

    generate(&settings(dir.path()), &input, &output, DocumentFormat::Json).unwrap();

    let value: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["blocks"][0]["type"], "heading");
    assert_eq!(value["blocks"][0]["text"], "ACI Configuration for tenant acme");
    assert!(value["styles"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["name"] == "Code Style"));
}

#[test]
fn pictures_resolve_from_document_directory() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());
    let out_dir = dir.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();
    let output = out_dir.join("report.md");

    for (image_dir, expected) in [
        (dir.path().join("diagrams"), "../diagrams/prod.dot"),
        (out_dir.clone(), "prod.dot"),
    ] {
        let settings = ReportSettings {
            image_dir,
            image_format: ImageFormat::Dot,
            ..ReportSettings::default()
        };
        let report = generate(&settings, &input, &output, DocumentFormat::Markdown).unwrap();

        let picture = report
            .document
            .blocks()
            .iter()
            .find_map(|b| match b {
                Block::Picture { path, .. } => Some(path.clone()),
                _ => None,
            })
            .unwrap();
        assert!(picture.is_relative());
        assert_eq!(picture, PathBuf::from(expected));
        assert!(out_dir.join(&picture).is_file());

        let markdown = fs::read_to_string(&output).unwrap();
        assert!(markdown.contains(&format!("![](<{}>){{width=18cm}}", expected)));
    }
}

#[test]
fn sections_open_with_lead_in() {
    let dir = TempDir::new().unwrap();
    let input = write_export(dir.path(), &networking_fixture());

    let report = generate(
        &settings(dir.path()),
        &input,
        &dir.path().join("report.md"),
        DocumentFormat::Markdown,
    )
    .unwrap();
    let blocks = report.document.blocks();

    assert_eq!(
        paragraphs(section(blocks, "Private networks (VRFs)")).first(),
        Some(&"This tenant has the following private networks (VRFs) defined:")
    );
    assert_eq!(
        paragraphs(section(blocks, "EPGs")).first(),
        Some(&"The following EPGs are defined in this tenant:")
    );
    assert_eq!(
        paragraphs(section(blocks, "Contracts")).first(),
        Some(&"The following contracts are defined in this tenant:")
    );
}
