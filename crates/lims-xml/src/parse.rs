use quick_xml::{
    events::{BytesStart, Event},
    name::{Namespace, ResolveResult},
    NsReader,
};

use crate::{
    element::{Element, Name},
    XmlError,
};

/// Parse a document into an owned element tree.
///
/// Namespace prefixes are resolved while reading, so equal elements compare
/// equal regardless of which prefixes the server chose to declare.
pub fn parse(xml: &str) -> Result<Element, XmlError> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_resolved_event()? {
            (resolution, Event::Start(start)) => {
                stack.push(element_from_start(resolution, &start)?);
            }
            (resolution, Event::Empty(start)) => {
                let element = element_from_start(resolution, &start)?;
                attach(element, &mut stack, &mut root);
            }
            (_, Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Unbalanced(reader.buffer_position() as u64))?;
                attach(element, &mut stack, &mut root);
            }
            (_, Event::Text(text)) => {
                let unescaped = text.unescape()?;
                append_text(&mut stack, unescaped.trim());
            }
            (_, Event::CData(cdata)) => {
                let bytes = cdata.into_inner();
                let text = std::str::from_utf8(&bytes)?.to_owned();
                append_text(&mut stack, &text);
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    root.ok_or(XmlError::NoRoot)
}

fn element_from_start(
    resolution: ResolveResult<'_>,
    start: &BytesStart<'_>,
) -> Result<Element, XmlError> {
    let local = std::str::from_utf8(start.local_name().as_ref())?.to_owned();
    let ns = match resolution {
        ResolveResult::Bound(Namespace(uri)) => Some(std::str::from_utf8(uri)?.to_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(XmlError::UnknownPrefix(
                String::from_utf8_lossy(&prefix).into_owned(),
            ))
        }
    };

    let mut element = Element::new(Name { ns, local });
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = attribute.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let key = std::str::from_utf8(attribute.key.local_name().as_ref())?.to_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.set_attr(key, value);
    }
    Ok(element)
}

fn attach(element: Element, stack: &mut Vec<Element>, root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_child(element);
        }
        None => {
            // Only the first top-level element is the document root; the
            // server never sends more than one.
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn append_text(stack: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(current) = stack.last_mut() {
        match current.text() {
            Some(existing) => {
                let joined = format!("{existing}{text}");
                current.set_text(joined);
            }
            None => current.set_text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Path;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<smp:sample xmlns:smp="http://genologics.com/ri/sample"
            xmlns:udf="http://genologics.com/ri/userdefined"
            uri="https://lims.example.com/api/v1/samples/S1" limsid="S1">
  <name>Alpha</name>
  <date-received>2012-05-01</date-received>
  <project uri="https://lims.example.com/api/v1/projects/P1"/>
  <udf:field type="Numeric" name="Reads">12</udf:field>
</smp:sample>"#;

    #[test]
    fn parses_namespaced_root() {
        let root = parse(SAMPLE).unwrap();
        assert_eq!(root.name().local, "sample");
        assert_eq!(
            root.name().ns.as_deref(),
            Some("http://genologics.com/ri/sample")
        );
        assert_eq!(
            root.attr("uri"),
            Some("https://lims.example.com/api/v1/samples/S1")
        );
        assert_eq!(root.attr("limsid"), Some("S1"));
    }

    #[test]
    fn resolves_prefixes_to_namespaces() {
        let root = parse(SAMPLE).unwrap();
        let field = root.find(&Path::parse("udf:field").unwrap()).unwrap();
        assert_eq!(field.attr("name"), Some("Reads"));
        assert_eq!(field.text(), Some("12"));
        // Unqualified children carry no namespace.
        let name = root.find(&Path::parse("name").unwrap()).unwrap();
        assert_eq!(name.name().ns, None);
        assert_eq!(name.text(), Some("Alpha"));
    }

    #[test]
    fn empty_elements_become_childless_nodes() {
        let root = parse(SAMPLE).unwrap();
        let project = root.find(&Path::parse("project").unwrap()).unwrap();
        assert!(project.children().is_empty());
        assert_eq!(
            project.attr("uri"),
            Some("https://lims.example.com/api/v1/projects/P1")
        );
    }

    #[test]
    fn undeclared_prefix_fails() {
        let result = parse("<x:thing>1</x:thing>");
        assert!(matches!(result, Err(XmlError::UnknownPrefix(_))));
    }

    #[test]
    fn missing_root_fails() {
        assert!(matches!(parse("  "), Err(XmlError::NoRoot)));
    }

    #[test]
    fn escaped_text_is_unescaped() {
        let root = parse("<note>a &lt; b &amp; c</note>").unwrap();
        assert_eq!(root.text(), Some("a < b & c"));
    }
}
