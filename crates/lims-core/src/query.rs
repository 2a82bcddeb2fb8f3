/// Accumulated filter parameters for a collection query.
///
/// Typed per-entity query builders flatten into this; keys follow the
/// server's convention (`last-modified`, `udf.NAME`, `udt.name`, ...), and a
/// key may repeat to match any of several values.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `key=value` filter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Append a filter on a user-defined field, keyed `udf.NAME`. The name
    /// may carry a comparison operator suffix, e.g. `Reads[min]`.
    pub fn push_udf(&mut self, name: &str, value: impl Into<String>) {
        self.push(format!("udf.{name}"), value);
    }

    /// Filter on the name of the user-defined type, keyed `udt.name`.
    pub fn push_udt_name(&mut self, name: impl Into<String>) {
        self.push("udt.name", name);
    }

    /// Append a filter on a field within a user-defined type, keyed
    /// `udt.UDTNAME.FIELDNAME`.
    pub fn push_udt_field(&mut self, key: &str, value: impl Into<String>) {
        self.push(format!("udt.{key}"), value);
    }

    /// Request a single result page instead of following `next-page` links.
    pub fn push_start_index(&mut self, index: u32) {
        self.push("start-index", index.to_string());
    }

    /// Whether the query pins a result page.
    pub fn has_start_index(&self) -> bool {
        self.pairs.iter().any(|(key, _)| key == "start-index")
    }

    #[allow(missing_docs)]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
