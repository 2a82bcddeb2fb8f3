use thiserror::Error;

/// Errors from parsing, navigating or serializing a LIMS XML document.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error(transparent)]
    Syntax(#[from] quick_xml::Error),
    #[error(transparent)]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// A path expression used a prefix that is not part of the server schema.
    #[error("unknown namespace prefix '{0}'")]
    UnknownPrefix(String),

    /// A path expression was empty or contained an empty step.
    #[error("invalid path expression '{0}'")]
    InvalidPath(String),

    /// The document ended before the root element was closed, or contained
    /// no root element at all.
    #[error("document has no root element")]
    NoRoot,

    /// A closing tag appeared without a matching opening tag.
    #[error("unbalanced closing tag near position {0}")]
    Unbalanced(u64),

    /// A namespace in a received document cannot be serialized because it is
    /// not part of the server schema's namespace table.
    #[error("no prefix registered for namespace '{0}'")]
    UnknownNamespace(String),

    /// The document is not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}
