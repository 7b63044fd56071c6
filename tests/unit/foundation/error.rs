use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MigrateError::xml("x")
            .to_string()
            .contains("xml error:")
    );
    assert!(
        MigrateError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MigrateError::malformed_reference("oops", "property 'Image'")
            .to_string()
            .contains("malformed image reference 'oops'")
    );
}

#[test]
fn with_origin_names_the_input() {
    let err = MigrateError::UnrecognizedFormat {
        category: Category::Layout,
        origin: None,
        target: "latest".to_string(),
    }
    .with_origin("menus/main.layout");
    let msg = err.to_string();
    assert!(msg.contains("unrecognized layout data in 'menus/main.layout'"));
    assert!(msg.contains("latest"));

    let err = MigrateError::NoMigrationPath {
        category: Category::Font,
        origin: None,
        from: VersionId::new("CEGUI font 2"),
        to: "CEGUI font 9".to_string(),
    }
    .with_origin("a.font");
    assert!(err.to_string().contains("'CEGUI font 2' to 'CEGUI font 9' in 'a.font'"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MigrateError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
