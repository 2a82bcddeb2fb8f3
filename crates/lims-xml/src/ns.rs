//! The server schema's namespace table.
//!
//! The REST dialect qualifies every document root (and a handful of embedded
//! elements such as `udf:field` and `file:file`) with one of these fixed
//! namespaces. The table is closed: paths and serialization both refuse
//! prefixes or namespaces outside of it rather than inventing one.

/// Prefix to namespace URI, in the order the server documents them.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("artgr", "http://genologics.com/ri/artifactgroup"),
    ("art", "http://genologics.com/ri/artifact"),
    ("cnf", "http://genologics.com/ri/configuration"),
    ("con", "http://genologics.com/ri/container"),
    ("ctp", "http://genologics.com/ri/containertype"),
    ("exc", "http://genologics.com/ri/exception"),
    ("file", "http://genologics.com/ri/file"),
    ("lab", "http://genologics.com/ri/lab"),
    ("perm", "http://genologics.com/ri/permissions"),
    ("prc", "http://genologics.com/ri/process"),
    ("prj", "http://genologics.com/ri/project"),
    ("prop", "http://genologics.com/ri/property"),
    ("prx", "http://genologics.com/ri/processexecution"),
    ("ptp", "http://genologics.com/ri/processtype"),
    ("res", "http://genologics.com/ri/researcher"),
    ("rgt", "http://genologics.com/ri/reagent"),
    ("ri", "http://genologics.com/ri"),
    ("rtp", "http://genologics.com/ri/reagenttype"),
    ("smp", "http://genologics.com/ri/sample"),
    ("udf", "http://genologics.com/ri/userdefined"),
    ("ver", "http://genologics.com/ri/version"),
];

/// Resolve a schema prefix to its namespace URI.
pub fn uri_for_prefix(prefix: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
}

/// Reverse lookup: the schema prefix for a namespace URI.
pub fn prefix_for_uri(uri: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(_, u)| *u == uri)
        .map(|(p, _)| *p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_bidirectional() {
        for (prefix, uri) in NAMESPACES {
            assert_eq!(uri_for_prefix(prefix), Some(*uri));
            assert_eq!(prefix_for_uri(uri), Some(*prefix));
        }
    }

    #[test]
    fn unknown_prefix_is_rejected() {
        assert_eq!(uri_for_prefix("bogus"), None);
    }
}
