use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Name and `version` attribute of a document element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootInfo {
    pub tag: String,
    pub version: Option<String>,
}

/// Stream the input until the first element start and report it.
///
/// Stops at the first element; nothing after it is read, so the rest of the document
/// is not checked for well-formedness. Returns `None` for anything that is not XML.
pub fn peek_root(data: &[u8]) -> Option<RootInfo> {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(data);
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => return root_info(&e),
            Ok(Event::Text(t)) if !t.iter().all(u8::is_ascii_whitespace) => return None,
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
        buf.clear();
    }
}

fn root_info(start: &BytesStart<'_>) -> Option<RootInfo> {
    let tag = std::str::from_utf8(start.local_name().as_ref())
        .ok()?
        .to_owned();
    let mut version = None;
    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"version" {
            version = Some(attr.unescape_value().ok()?.into_owned());
        }
    }
    Some(RootInfo { tag, version })
}

/// Check the root tag and the version marker.
///
/// `version == None` requires the attribute to be absent; `Some(v)` requires it present
/// and equal to `v`.
pub fn check_data_version(root_tag: &str, version: Option<&str>, data: &[u8]) -> bool {
    let Some(info) = peek_root(data) else {
        return false;
    };
    info.tag == root_tag && info.version.as_deref() == version
}

#[cfg(test)]
#[path = "../../tests/unit/xml/sniff.rs"]
mod tests;
