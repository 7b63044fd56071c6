use super::*;

#[test]
fn category_from_extension_accepts_dot_and_case() {
    assert_eq!(Category::from_extension("layout"), Some(Category::Layout));
    assert_eq!(Category::from_extension(".Imageset"), Some(Category::Imageset));
    assert_eq!(Category::from_extension("FONT"), Some(Category::Font));
    assert_eq!(Category::from_extension("looknfeel"), None);
    assert_eq!(Category::from_extension(""), None);
}

#[test]
fn target_version_parses_latest_keyword() {
    assert_eq!(TargetVersion::from("latest"), TargetVersion::Latest);
    assert_eq!(TargetVersion::from(" LATEST "), TargetVersion::Latest);
    assert_eq!(
        TargetVersion::from("CEGUI layout 3"),
        TargetVersion::exact("CEGUI layout 3")
    );
}

#[test]
fn version_id_compares_with_str() {
    let v = VersionId::new("CEGUI font 3");
    assert_eq!(v, "CEGUI font 3");
    assert_eq!(v.to_string(), "CEGUI font 3");
    assert_eq!(
        serde_json::to_string(&v).unwrap(),
        "\"CEGUI font 3\"".to_string()
    );
}
