use crate::{element::Name, XmlError};

/// A slash path of element names, e.g. `"location/value"` or `"udf:field"`.
///
/// Each step may carry a schema prefix; prefixes outside the namespace table
/// fail at parse time rather than silently matching nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Name>,
}

impl Path {
    /// Parse a path expression.
    pub fn parse(expr: &str) -> Result<Self, XmlError> {
        if expr.is_empty() {
            return Err(XmlError::InvalidPath(expr.to_owned()));
        }
        let steps = expr
            .split('/')
            .map(Name::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| match err {
                XmlError::InvalidPath(_) => XmlError::InvalidPath(expr.to_owned()),
                other => other,
            })?;
        Ok(Path { steps })
    }

    #[allow(missing_docs)]
    pub fn steps(&self) -> &[Name] {
        &self.steps
    }
}
