use crate::{element::Element, ns, XmlError};

/// Serialize a tree back to a UTF-8 document.
///
/// Prefix declarations are re-derived from the schema namespace table and
/// emitted on the root element, so a parsed and re-serialized document stays
/// within the dialect even though original prefixes are not preserved.
pub fn to_string(root: &Element) -> Result<String, XmlError> {
    let mut used = Vec::new();
    collect_namespaces(root, &mut used)?;

    let mut out = String::with_capacity(256);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_element(root, &used, true, &mut out)?;
    Ok(out)
}

fn collect_namespaces<'a>(
    element: &'a Element,
    used: &mut Vec<&'a str>,
) -> Result<(), XmlError> {
    if let Some(uri) = element.name().ns.as_deref() {
        if ns::prefix_for_uri(uri).is_none() {
            return Err(XmlError::UnknownNamespace(uri.to_owned()));
        }
        if !used.contains(&uri) {
            used.push(uri);
        }
    }
    for child in element.children() {
        collect_namespaces(child, used)?;
    }
    Ok(())
}

fn qualified_name(element: &Element) -> String {
    match element.name().ns.as_deref() {
        Some(uri) => {
            let prefix = ns::prefix_for_uri(uri).expect("namespaces were validated");
            format!("{}:{}", prefix, element.name().local)
        }
        None => element.name().local.clone(),
    }
}

fn write_element(
    element: &Element,
    used: &[&str],
    is_root: bool,
    out: &mut String,
) -> Result<(), XmlError> {
    let name = qualified_name(element);
    out.push('<');
    out.push_str(&name);

    if is_root {
        for uri in used {
            let prefix = ns::prefix_for_uri(uri).expect("namespaces were validated");
            out.push_str(&format!(" xmlns:{}=\"{}\"", prefix, escape_attr(uri)));
        }
    }
    for (key, value) in element.attributes() {
        out.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
    }

    if element.text().is_none() && element.children().is_empty() {
        out.push_str("/>");
        return Ok(());
    }

    out.push('>');
    if let Some(text) = element.text() {
        out.push_str(&escape_text(text));
    }
    for child in element.children() {
        write_element(child, used, false, out)?;
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
    Ok(())
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
