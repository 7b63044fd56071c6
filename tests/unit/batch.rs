use super::*;

const IMAGESET_V1: &str = r#"<Imageset Name="X" Imagefile="x.png"><Image Name="a" XPos="0" YPos="0" Width="1" Height="1"/></Imageset>"#;
const IMAGESET_V2: &str = r#"<Imageset version="2" name="X" imagefile="x.png"/>"#;

fn tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("b.imageset"), IMAGESET_V1).unwrap();
    fs::write(dir.path().join("sub/a.imageset"), IMAGESET_V2).unwrap();
    fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    dir
}

#[test]
fn collect_walks_sorted_and_filters_by_extension() {
    let dir = tree();
    let registry = Registry::builtin();
    let inputs = collect_inputs(&[dir.path().to_path_buf()], None, &registry).unwrap();
    let rel: Vec<_> = inputs.iter().map(|i| i.relative.clone()).collect();
    assert_eq!(
        rel,
        [PathBuf::from("b.imageset"), PathBuf::from("sub/a.imageset")]
    );

    let fonts_only =
        collect_inputs(&[dir.path().to_path_buf()], Some(Category::Font), &registry).unwrap();
    assert!(fonts_only.is_empty());

    let missing = collect_inputs(&[dir.path().join("missing")], None, &registry).unwrap_err();
    assert!(matches!(missing, MigrateError::Validation(_)));
}

#[test]
fn explicit_files_are_taken_regardless_of_extension() {
    let dir = tree();
    let registry = Registry::builtin();
    let txt = dir.path().join("notes.txt");
    let inputs = collect_inputs(&[txt.clone(), txt.clone()], None, &registry).unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].relative, PathBuf::from("notes.txt"));
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = tree();
    let registry = Registry::builtin();
    let inputs = collect_inputs(&[dir.path().to_path_buf()], None, &registry).unwrap();
    let reports = migrate_files(&registry, &inputs, &BatchOpts::default()).unwrap();

    assert!(matches!(
        reports[0].outcome,
        FileOutcome::Migrated { written: None, .. }
    ));
    assert!(matches!(
        reports[1].outcome,
        FileOutcome::Unchanged { written: None, .. }
    ));
    assert_eq!(
        fs::read_to_string(dir.path().join("b.imageset")).unwrap(),
        IMAGESET_V1
    );

    let summary = BatchSummary::from_reports(&reports);
    assert_eq!(summary.migrated, 1);
    assert_eq!(summary.unchanged, 1);
    assert!(!summary.has_failures());
}

#[test]
fn in_place_keeps_a_backup() {
    let dir = tree();
    let registry = Registry::builtin();
    let file = dir.path().join("b.imageset");
    let inputs = collect_inputs(&[file.clone()], None, &registry).unwrap();
    let opts = BatchOpts {
        write: WriteMode::InPlace {
            backup_suffix: Some(".orig".to_string()),
        },
        ..BatchOpts::default()
    };
    let reports = migrate_files(&registry, &inputs, &opts).unwrap();
    assert!(!reports[0].is_failure());

    let backup = dir.path().join("b.imageset.orig");
    assert_eq!(fs::read_to_string(backup).unwrap(), IMAGESET_V1);
    let migrated = fs::read_to_string(&file).unwrap();
    assert!(migrated.contains(r#"version="2""#));
}

#[test]
fn output_dir_mirrors_relative_paths() {
    let dir = tree();
    let out = tempfile::tempdir().unwrap();
    let registry = Registry::builtin();
    let inputs = collect_inputs(&[dir.path().to_path_buf()], None, &registry).unwrap();
    let opts = BatchOpts {
        write: WriteMode::OutputDir(out.path().to_path_buf()),
        parallel: true,
        threads: Some(2),
        ..BatchOpts::default()
    };
    let reports = migrate_files(&registry, &inputs, &opts).unwrap();
    assert_eq!(reports.len(), 2);
    assert!(out.path().join("b.imageset").is_file());
    assert_eq!(
        fs::read_to_string(out.path().join("sub/a.imageset")).unwrap(),
        IMAGESET_V2
    );
}

#[test]
fn output_dir_rejects_inputs_mapping_to_the_same_path() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    for (sub, name) in [("a", "FromA"), ("b", "FromB")] {
        fs::create_dir_all(dir.path().join(sub)).unwrap();
        fs::write(
            dir.path().join(sub).join("x.layout"),
            format!(r#"<GUILayout><Window Type="DefaultWindow" Name="{name}"/></GUILayout>"#),
        )
        .unwrap();
    }
    let registry = Registry::builtin();
    let inputs = collect_inputs(
        &[dir.path().join("a"), dir.path().join("b/x.layout")],
        None,
        &registry,
    )
    .unwrap();
    assert_eq!(inputs.len(), 2);

    let opts = BatchOpts {
        write: WriteMode::OutputDir(out.path().to_path_buf()),
        ..BatchOpts::default()
    };
    let err = migrate_files(&registry, &inputs, &opts).unwrap_err();
    assert!(matches!(err, MigrateError::Validation(_)));
    assert!(err.to_string().contains("x.layout"));
    assert!(!out.path().join("x.layout").exists());

    // Dry runs never write, so the same inputs are fine there.
    let reports = migrate_files(&registry, &inputs, &BatchOpts::default()).unwrap();
    assert_eq!(BatchSummary::from_reports(&reports).migrated, 2);
}

#[test]
fn failures_are_per_file() {
    let dir = tree();
    let registry = Registry::builtin();
    fs::write(dir.path().join("broken.imageset"), "not xml").unwrap();
    let inputs = collect_inputs(&[dir.path().to_path_buf()], None, &registry).unwrap();
    let reports = migrate_files(&registry, &inputs, &BatchOpts::default()).unwrap();
    assert_eq!(reports.len(), 3);

    let broken = reports
        .iter()
        .find(|r| r.path.ends_with("broken.imageset"))
        .unwrap();
    match &broken.outcome {
        FileOutcome::Failed { error } => assert!(error.contains("unrecognized imageset")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(BatchSummary::from_reports(&reports).failed, 1);
}

#[test]
fn category_is_inferred_from_content_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("mystery");
    fs::write(&file, IMAGESET_V1).unwrap();
    let registry = Registry::builtin();
    let inputs = collect_inputs(&[file], None, &registry).unwrap();
    let reports = migrate_files(&registry, &inputs, &BatchOpts::default()).unwrap();
    assert!(matches!(
        reports[0].outcome,
        FileOutcome::Migrated {
            category: Category::Imageset,
            ..
        }
    ));

    let detected = detect_files(&registry, &inputs, None);
    assert_eq!(detected[0].category, Some(Category::Imageset));
    assert_eq!(
        detected[0].version.map(VersionId::as_str),
        Some("CEGUI imageset 1")
    );
}

#[test]
fn zero_threads_is_rejected() {
    let registry = Registry::builtin();
    let opts = BatchOpts {
        parallel: true,
        threads: Some(0),
        ..BatchOpts::default()
    };
    let err = migrate_files(&registry, &[], &opts).unwrap_err();
    assert!(matches!(err, MigrateError::Validation(_)));
}
