use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::foundation::error::{MigrateError, MigrateResult};

/// One child of an [`Element`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// Owned XML element.
///
/// Attribute order is preserved so a rename keeps the attribute where it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    /// Replace the value in place, or append a new attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Put an attribute first, dropping any previous occurrence.
    pub fn insert_attr_front(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.attrs.retain(|(k, _)| *k != name);
        self.attrs.insert(0, (name, value.into()));
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// Rename `from` to `to` in place. Returns false when `from` is absent.
    ///
    /// An existing `to` attribute is replaced by the renamed one.
    pub fn rename_attr(&mut self, from: &str, to: &str) -> bool {
        let Some(idx) = self.attrs.iter().position(|(k, _)| k == from) else {
            return false;
        };
        if from != to {
            self.attrs.retain(|(k, _)| k != to);
            let idx = self
                .attrs
                .iter()
                .position(|(k, _)| k == from)
                .unwrap_or(idx);
            self.attrs[idx].0 = to.to_owned();
        }
        true
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.elements().any(|e| e.is(name))
    }

    /// Keep only the child elements for which `keep` returns true; text and comments stay.
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&Element) -> bool) {
        self.children.retain(|n| match n {
            Node::Element(e) => keep(e),
            _ => true,
        });
    }

    /// True if this element or any descendant satisfies `pred`.
    pub fn any_descendant(&self, pred: &impl Fn(&Element) -> bool) -> bool {
        pred(self) || self.elements().any(|e| e.any_descendant(pred))
    }

    /// Concatenated character data, `None` when the element has no text children.
    pub fn text(&self) -> Option<String> {
        let mut out: Option<String> = None;
        for n in &self.children {
            if let Node::Text(t) = n {
                out.get_or_insert_with(String::new).push_str(t);
            }
        }
        out
    }

    /// Replace all character data with a single text node at the first text position.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let pos = self
            .children
            .iter()
            .position(|n| matches!(n, Node::Text(_)))
            .unwrap_or(self.children.len());
        self.children.retain(|n| !matches!(n, Node::Text(_)));
        let pos = pos.min(self.children.len());
        self.children.insert(pos, Node::Text(text.into()));
    }
}

/// Parse a UTF-8 document into an owned tree rooted at its document element.
///
/// Whitespace-only character data is dropped; indentation is regenerated on output.
pub fn parse(data: &[u8]) -> MigrateResult<Element> {
    let text = std::str::from_utf8(data)
        .map_err(|e| MigrateError::xml(format!("document is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| MigrateError::xml(format!("parse document: {e}")))?;
    let root = doc.root_element();

    let mut el = convert(root);
    let mut decls = Vec::new();
    for ns in root.namespaces() {
        match ns.name() {
            Some("xml") => {}
            Some(prefix) => decls.push((format!("xmlns:{prefix}"), ns.uri().to_owned())),
            None => decls.push(("xmlns".to_owned(), ns.uri().to_owned())),
        }
    }
    el.attrs.splice(0..0, decls);
    Ok(el)
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let mut el = Element::new(node.tag_name().name());
    for a in node.attributes() {
        let name = match a.namespace().and_then(|uri| node.lookup_prefix(uri)) {
            Some(prefix) => format!("{prefix}:{}", a.name()),
            None => a.name().to_owned(),
        };
        el.attrs.push((name, a.value().to_owned()));
    }
    for child in node.children() {
        if child.is_element() {
            el.children.push(Node::Element(convert(child)));
        } else if child.is_text() {
            if let Some(t) = child.text()
                && !t.trim().is_empty()
            {
                el.children.push(Node::Text(t.to_owned()));
            }
        } else if child.is_comment()
            && let Some(t) = child.text()
        {
            el.children.push(Node::Comment(t.to_owned()));
        }
    }
    el
}

/// Serialize with an XML declaration and 4-space indentation.
pub fn to_bytes(root: &Element) -> MigrateResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_err)?;
    write_element(&mut writer, root)?;
    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element) -> MigrateResult<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (k, v) in &el.attrs {
        start.push_attribute((k.as_str(), v.as_str()));
    }

    if el.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_err);
    }

    writer.write_event(Event::Start(start)).map_err(write_err)?;
    for child in &el.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(write_err)?,
            Node::Comment(c) => writer
                .write_event(Event::Comment(BytesText::from_escaped(c.as_str())))
                .map_err(write_err)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(write_err)
}

fn write_err(e: impl std::fmt::Display) -> MigrateError {
    MigrateError::xml(format!("write document: {e}"))
}

#[cfg(test)]
#[path = "../../tests/unit/xml/tree.rs"]
mod tests;
