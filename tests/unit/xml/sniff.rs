use super::*;

#[test]
fn peek_reads_tag_and_version() {
    let info = peek_root(br#"<?xml version="1.0"?><GUILayout version="4"><Window/></GUILayout>"#)
        .unwrap();
    assert_eq!(info.tag, "GUILayout");
    assert_eq!(info.version.as_deref(), Some("4"));

    let info = peek_root(b"<Font Name=\"a\"/>").unwrap();
    assert_eq!(info.tag, "Font");
    assert_eq!(info.version, None);
}

#[test]
fn peek_stops_at_first_element() {
    // The unterminated tail is never read.
    let info = peek_root(b"<Imageset version=\"2\"><Image name=").unwrap();
    assert_eq!(info.tag, "Imageset");
}

#[test]
fn peek_skips_prolog_and_bom() {
    let mut data = vec![0xEF, 0xBB, 0xBF];
    data.extend_from_slice(b"<?xml version=\"1.0\"?>\n<!-- c -->\n<GUIScheme/>");
    assert_eq!(peek_root(&data).unwrap().tag, "GUIScheme");
}

#[test]
fn peek_rejects_non_xml() {
    assert_eq!(peek_root(b""), None);
    assert_eq!(peek_root(b"just some text"), None);
    assert_eq!(peek_root(b"text before <Font/>"), None);
    assert_eq!(peek_root(b"<<<"), None);
}

#[test]
fn check_data_version_distinguishes_absence() {
    let v1 = br#"<Imageset Name="a"/>"#;
    let v2 = br#"<Imageset version="2" name="a"/>"#;
    assert!(check_data_version("Imageset", None, v1));
    assert!(!check_data_version("Imageset", Some("2"), v1));
    assert!(check_data_version("Imageset", Some("2"), v2));
    assert!(!check_data_version("Imageset", None, v2));
    assert!(!check_data_version("Font", None, v1));
}
