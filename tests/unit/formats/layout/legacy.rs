use super::*;
use crate::xml;

const LAYOUT_06: &[u8] = br#"<GUILayout>
    <Window Type="TaharezLook/FrameWindow" Name="Root">
        <Window Name="Root__auto_titlebar__">
            <Property Name="Text" Value="Title"/>
            <Window Name="Root__auto_titlebar____auto_pin__"/>
        </Window>
        <Window Type="TaharezLook/Button" Name="Root/Ok"/>
    </Window>
</GUILayout>"#;

#[test]
fn legacy_marker_needs_untyped_suffixed_children() {
    assert!(has_legacy_auto_windows(&xml::parse(LAYOUT_06).unwrap()));

    let plain = br#"<GUILayout><Window Type="DefaultWindow" Name="Root"><Window Type="Button" Name="Root/Ok"/></Window></GUILayout>"#;
    assert!(!has_legacy_auto_windows(&xml::parse(plain).unwrap()));

    let modern = br#"<GUILayout><Window Type="FrameWindow" Name="Root"><AutoWindow NameSuffix="__auto_titlebar__"/><Window Name="Root__auto_x__"/></Window></GUILayout>"#;
    assert!(!has_legacy_auto_windows(&xml::parse(modern).unwrap()));
}

#[test]
fn upgrade_turns_legacy_children_into_auto_windows() {
    let mut log = MigrationLog::default();
    let root = upgrade(xml::parse(LAYOUT_06).unwrap(), &mut log).unwrap();
    let frame = root.elements().next().unwrap();

    let titlebar = frame.elements().next().unwrap();
    assert!(titlebar.is("AutoWindow"));
    assert_eq!(
        titlebar.attrs,
        vec![("NameSuffix".to_string(), "__auto_titlebar__".to_string())]
    );
    let pin = titlebar.elements().find(|e| e.is("AutoWindow")).unwrap();
    assert_eq!(pin.attr("NameSuffix"), Some("__auto_pin__"));

    let ok = frame.elements().nth(1).unwrap();
    assert!(ok.is("Window"));
    assert_eq!(ok.attr("Name"), Some("Root/Ok"));
    assert!(log.is_empty());
}

#[test]
fn downgrade_restores_the_legacy_spelling() {
    let original = xml::parse(LAYOUT_06).unwrap();
    let mut log = MigrationLog::default();
    let up = upgrade(original.clone(), &mut log).unwrap();
    let down = downgrade(up, &mut log).unwrap();
    assert_eq!(down, original);
    assert!(log.is_empty());
}

#[test]
fn downgrade_warns_on_suffix_older_readers_cannot_recognise() {
    let src = br#"<GUILayout><Window Type="FrameWindow" Name="Root"><AutoWindow NameSuffix="Title"/></Window></GUILayout>"#;
    let mut log = MigrationLog::default();
    let root = downgrade(xml::parse(src).unwrap(), &mut log).unwrap();
    let child = root.elements().next().unwrap().elements().next().unwrap();
    assert!(child.is("Window"));
    assert_eq!(child.attr("Name"), Some("RootTitle"));
    assert_eq!(log.lines().len(), 2);
    assert!(log.lines()[0].contains("'Title'"));
    assert!(log.lines()[1].contains("indistinguishable"));
}

#[test]
fn downgrade_without_auto_windows_warns_that_the_version_is_lost() {
    let src = br#"<GUILayout><Window Type="DefaultWindow" Name="Root"><Window Type="Button" Name="Root/Ok"/></Window></GUILayout>"#;
    let mut log = MigrationLog::default();
    let root = downgrade(xml::parse(src).unwrap(), &mut log).unwrap();
    assert_eq!(root, xml::parse(src).unwrap());
    assert_eq!(log.lines().len(), 1);
    assert!(log.lines()[0].contains("indistinguishable"));
    assert!(lacks_legacy_auto_windows(&root));
}
