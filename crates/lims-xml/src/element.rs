use crate::{ns, path::Path, XmlError};

/// A namespace-qualified element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// Namespace URI, or `None` for unqualified elements.
    pub ns: Option<String>,
    /// Local part of the name.
    pub local: String,
}

impl Name {
    /// An unqualified name, as used by most child elements in the dialect.
    pub fn local(local: impl Into<String>) -> Self {
        Name {
            ns: None,
            local: local.into(),
        }
    }

    /// A name qualified by a schema prefix, e.g. `("smp", "sample")`.
    pub fn qualified(prefix: &str, local: impl Into<String>) -> Result<Self, XmlError> {
        let uri = ns::uri_for_prefix(prefix)
            .ok_or_else(|| XmlError::UnknownPrefix(prefix.to_owned()))?;
        Ok(Name {
            ns: Some(uri.to_owned()),
            local: local.into(),
        })
    }

    /// Parse `"local"` or `"prefix:local"` against the schema namespace table.
    pub fn parse(name: &str) -> Result<Self, XmlError> {
        match name.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
                Name::qualified(prefix, local)
            }
            Some(_) => Err(XmlError::InvalidPath(name.to_owned())),
            None if name.is_empty() => Err(XmlError::InvalidPath(name.to_owned())),
            None => Ok(Name::local(name)),
        }
    }
}

/// One element of an owned, mutable XML tree.
///
/// The tree holds element text separately from child elements; mixed content
/// is not produced by the server and is not modeled.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: Name,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    #[allow(missing_docs)]
    pub fn new(name: Name) -> Self {
        Element {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    #[allow(missing_docs)]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Attribute value by (unqualified) attribute name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    #[allow(missing_docs)]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    #[allow(missing_docs)]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[allow(missing_docs)]
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    #[allow(missing_docs)]
    pub fn clear_text(&mut self) {
        self.text = None;
    }

    #[allow(missing_docs)]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    #[allow(missing_docs)]
    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    /// Append a child, returning a mutable reference to it.
    pub fn push_child(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        self.children.last_mut().expect("child was just pushed")
    }

    /// Remove all children for which the predicate returns false.
    pub fn retain_children(&mut self, keep: impl FnMut(&Element) -> bool) {
        self.children.retain(keep);
    }

    /// First child with the given name, in document order.
    pub fn child(&self, name: &Name) -> Option<&Element> {
        self.children.iter().find(|c| &c.name == name)
    }

    #[allow(missing_docs)]
    pub fn child_mut(&mut self, name: &Name) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == *name)
    }

    /// First element at the path below this element, in document order.
    pub fn find(&self, path: &Path) -> Option<&Element> {
        let mut current = self;
        for step in path.steps() {
            current = current.child(step)?;
        }
        Some(current)
    }

    #[allow(missing_docs)]
    pub fn find_mut(&mut self, path: &Path) -> Option<&mut Element> {
        let mut current = self;
        for step in path.steps() {
            current = current.child_mut(step)?;
        }
        Some(current)
    }

    /// Walk the path, creating any missing intermediate elements.
    pub fn find_or_create(&mut self, path: &Path) -> &mut Element {
        let mut current = self;
        for step in path.steps() {
            let missing = current.child(step).is_none();
            if missing {
                current.children.push(Element::new(step.clone()));
            }
            current = current
                .child_mut(step)
                .expect("child exists or was just created");
        }
        current
    }

    /// All elements matching the path's final step, in document order.
    ///
    /// Intermediate steps select the first matching element, as `find` does;
    /// only the last step is multi-valued.
    pub fn find_all(&self, path: &Path) -> Vec<&Element> {
        let (last, init) = match path.steps().split_last() {
            Some(split) => split,
            None => return Vec::new(),
        };
        let mut current = self;
        for step in init {
            match current.child(step) {
                Some(child) => current = child,
                None => return Vec::new(),
            }
        }
        current
            .children
            .iter()
            .filter(|c| &c.name == last)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Element {
        let mut root = Element::new(Name::qualified("smp", "sample").unwrap());
        root.set_attr("uri", "https://lims.example.com/api/v1/samples/S1");
        let mut name = Element::new(Name::local("name"));
        name.set_text("Alpha");
        root.push_child(name);
        let mut location = Element::new(Name::local("location"));
        let mut value = Element::new(Name::local("value"));
        value.set_text("A:1");
        location.push_child(value);
        root.push_child(location);
        root
    }

    #[test]
    fn find_descends_in_document_order() {
        let root = sample_tree();
        let path = Path::parse("location/value").unwrap();
        assert_eq!(root.find(&path).unwrap().text(), Some("A:1"));
        assert!(root.find(&Path::parse("location/missing").unwrap()).is_none());
    }

    #[test]
    fn find_or_create_builds_intermediates() {
        let mut root = sample_tree();
        let path = Path::parse("billing/address/city").unwrap();
        root.find_or_create(&path).set_text("Stockholm");
        assert_eq!(root.find(&path).unwrap().text(), Some("Stockholm"));
        // A second walk reuses the same nodes.
        root.find_or_create(&path).set_text("Uppsala");
        assert_eq!(root.find_all(&Path::parse("billing").unwrap()).len(), 1);
        assert_eq!(root.find(&path).unwrap().text(), Some("Uppsala"));
    }

    #[test]
    fn qualified_names_compare_by_namespace() {
        let qualified = Name::qualified("file", "file").unwrap();
        assert_ne!(qualified, Name::local("file"));
        assert_eq!(qualified, Name::parse("file:file").unwrap());
    }

    #[test]
    fn unknown_prefix_is_an_error() {
        assert!(matches!(
            Name::parse("nope:thing"),
            Err(XmlError::UnknownPrefix(_))
        ));
    }
}
