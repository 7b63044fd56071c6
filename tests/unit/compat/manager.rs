use super::*;
use crate::compat::detector::XmlDetector;
use crate::compat::layer::{MigrationLog, TreeLayer};
use crate::xml::Element;

const A: VersionId = VersionId::new("fake a");
const B: VersionId = VersionId::new("fake b");
const C: VersionId = VersionId::new("fake c");

fn set(root: Element, v: &str) -> Element {
    let mut root = root;
    root.insert_attr_front("version", v);
    root
}

fn a_to_b(root: Element, log: &mut MigrationLog) -> MigrateResult<Element> {
    log.warn("a->b note");
    Ok(set(root, "b"))
}

fn b_to_c(root: Element, _log: &mut MigrationLog) -> MigrateResult<Element> {
    Ok(set(root, "c"))
}

fn c_to_b(root: Element, _log: &mut MigrationLog) -> MigrateResult<Element> {
    Ok(set(root, "b"))
}

fn b_to_a(mut root: Element, _log: &mut MigrationLog) -> MigrateResult<Element> {
    root.remove_attr("version");
    Ok(root)
}

fn failing(root: Element, _log: &mut MigrationLog) -> MigrateResult<Element> {
    Err(MigrateError::malformed_reference(
        root.attr("ref").unwrap_or_default(),
        "test",
    ))
}

fn fake(with_b_to_c: bool) -> CompatibilityManager {
    let mut layers: Vec<Box<dyn Layer>> = vec![
        Box::new(TreeLayer::new(A, B, a_to_b)),
        Box::new(TreeLayer::new(B, A, b_to_a)),
        Box::new(TreeLayer::new(C, B, c_to_b)),
    ];
    if with_b_to_c {
        layers.push(Box::new(TreeLayer::new(B, C, b_to_c)));
    }
    CompatibilityManager::new(
        Category::Layout,
        vec![A, B, C],
        vec![
            Box::new(XmlDetector::versioned(C, "Doc", &["doc"], "c")),
            Box::new(XmlDetector::versioned(B, "Doc", &["doc"], "b")),
            Box::new(XmlDetector::unversioned(A, "Doc", &["doc"])),
        ],
        layers,
    )
}

#[test]
fn same_version_returns_input_untouched() {
    let m = fake(true);
    let data = b"<Doc   keep=\"exact bytes\" />";
    let out = m.migrate(data, "", &TargetVersion::from(A), None).unwrap();
    assert!(out.is_unchanged());
    assert_eq!(out.data, data.to_vec());
    assert_eq!(out.detected, A);
}

#[test]
fn chain_runs_in_order_and_keeps_step_provenance() {
    let m = fake(true);
    let out = m
        .migrate(b"<Doc/>", "doc", &TargetVersion::Latest, None)
        .unwrap();
    assert_eq!(out.detected, A);
    assert_eq!(out.target, C);
    let hops: Vec<_> = out.steps.iter().map(|s| (s.source, s.target)).collect();
    assert_eq!(hops, vec![(A, B), (B, C)]);
    assert_eq!(m.detect(&out.data, ""), Some(C));
    assert_eq!(out.warnings().collect::<Vec<_>>(), vec!["a->b note"]);
    assert_eq!(out.log_text(), "fake a -> fake b:\n    a->b note\n");
}

#[test]
fn downgrade_walks_backwards() {
    let m = fake(true);
    let plan = m.plan(C, A).unwrap();
    let hops: Vec<_> = plan.iter().map(|l| (l.source(), l.target())).collect();
    assert_eq!(hops, vec![(C, B), (B, A)]);
    assert!(m.plan(B, B).unwrap().is_empty());
}

#[test]
fn missing_edge_is_no_migration_path() {
    let m = fake(false);
    let err = m
        .migrate(b"<Doc/>", "", &TargetVersion::exact("fake c"), Some("x.doc"))
        .unwrap_err();
    match err {
        MigrateError::NoMigrationPath { from, to, origin, .. } => {
            assert_eq!(from, A);
            assert_eq!(to, "fake c");
            assert_eq!(origin.as_deref(), Some("x.doc"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_target_is_no_migration_path() {
    let m = fake(true);
    let err = m
        .migrate(b"<Doc/>", "", &TargetVersion::exact("fake z"), None)
        .unwrap_err();
    assert!(matches!(err, MigrateError::NoMigrationPath { .. }));
}

#[test]
fn unmatched_input_is_unrecognized() {
    let m = fake(true);
    for data in [&b"garbage"[..], b"<Other/>", b""] {
        let err = m
            .migrate(data, "", &TargetVersion::Latest, Some("bad.doc"))
            .unwrap_err();
        match err {
            MigrateError::UnrecognizedFormat { category, origin, target } => {
                assert_eq!(category, Category::Layout);
                assert_eq!(origin.as_deref(), Some("bad.doc"));
                assert_eq!(target, "latest");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn failing_layer_aborts_whole_chain() {
    let m = CompatibilityManager::new(
        Category::Font,
        vec![A, B],
        vec![Box::new(XmlDetector::unversioned(A, "Doc", &["doc"]))],
        vec![Box::new(TreeLayer::new(A, B, failing))],
    );
    let err = m
        .migrate(b"<Doc ref=\"bad\"/>", "", &TargetVersion::Latest, None)
        .unwrap_err();
    assert!(matches!(err, MigrateError::MalformedReference { ref value, .. } if value == "bad"));
}

#[test]
fn extensions_are_deduplicated() {
    assert_eq!(fake(true).extensions(), vec!["doc"]);
    assert_eq!(fake(true).latest(), Some(C));
}
