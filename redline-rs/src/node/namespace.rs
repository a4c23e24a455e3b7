//! Namespace handling for markup elements.

use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::XML_NAMESPACE;

/// An expanded element name (namespace URI + local name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    /// The namespace URI (empty string for no namespace).
    pub namespace_uri: Arc<str>,
    /// The local part of the name (without prefix).
    pub local_name: String,
}

impl ExpandedName {
    /// Creates a new expanded name with a namespace.
    pub fn new(uri: impl Into<Arc<str>>, local: impl Into<String>) -> Self {
        Self {
            namespace_uri: uri.into(),
            local_name: local.into(),
        }
    }

    /// Creates an expanded name with no namespace.
    pub fn no_namespace(local: impl Into<String>) -> Self {
        Self {
            namespace_uri: "".into(),
            local_name: local.into(),
        }
    }
}

/// Tracks namespace bindings while a document is being read.
pub struct NamespaceContext {
    /// URI interning cache; trees share one `Arc<str>` per distinct URI.
    uri_cache: HashMap<String, Arc<str>>,
    /// Stack of scopes, each containing prefix -> URI bindings.
    scopes: Vec<HashMap<String, Arc<str>>>,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceContext {
    /// Creates a new namespace context with the `xml` prefix pre-bound.
    pub fn new() -> Self {
        let mut ctx = NamespaceContext {
            uri_cache: HashMap::new(),
            scopes: vec![HashMap::new()],
        };
        ctx.bind("xml", XML_NAMESPACE);
        ctx
    }

    /// Pushes a new scope for entering an element.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the current scope when leaving an element.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a prefix to a URI in the current scope.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        let uri_arc = self.intern_uri(uri);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(prefix.to_string(), uri_arc);
        }
    }

    /// Resolves a prefix to its URI, searching from the innermost scope.
    pub fn resolve(&self, prefix: &str) -> Option<Arc<str>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(prefix).cloned())
    }

    /// Returns the default namespace (empty prefix binding).
    pub fn default_namespace(&self) -> Option<Arc<str>> {
        self.resolve("")
    }

    /// Expands a qualified element name against the current bindings.
    ///
    /// Unbound prefixes still yield a name so that the local part stays
    /// usable; their namespace URI is empty.
    pub fn expand(&self, qname: &str) -> ExpandedName {
        let (prefix, local) = split_qname(qname);
        let uri = match prefix {
            Some(p) => self.resolve(p),
            None => self.default_namespace(),
        };
        match uri {
            Some(uri) => ExpandedName::new(uri, local),
            None => ExpandedName::no_namespace(local),
        }
    }

    /// Interns a URI string.
    fn intern_uri(&mut self, uri: &str) -> Arc<str> {
        if let Some(cached) = self.uri_cache.get(uri) {
            cached.clone()
        } else {
            let arc: Arc<str> = uri.into();
            self.uri_cache.insert(uri.to_string(), arc.clone());
            arc
        }
    }
}

/// Splits a qualified name into prefix and local name.
///
/// Returns (Some(prefix), local) for "prefix:local"
/// Returns (None, name) for "name" without prefix
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Returns the local part of a qualified name.
pub fn local_name(qname: &str) -> &str {
    split_qname(qname).1
}

/// Checks if an attribute name is a namespace declaration.
///
/// Returns the declared prefix (`""` for the default namespace).
pub fn xmlns_prefix(name: &str) -> Option<&str> {
    if name == "xmlns" {
        Some("")
    } else {
        name.strip_prefix("xmlns:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("w:del"), (Some("w"), "del"));
        assert_eq!(split_qname("del"), (None, "del"));
        assert_eq!(split_qname("ns:foo:bar"), (Some("ns"), "foo:bar"));
        assert_eq!(local_name("w14:moveTo"), "moveTo");
    }

    #[test]
    fn test_namespace_context() {
        let mut ctx = NamespaceContext::new();
        ctx.push_scope();
        ctx.bind("w", "urn:w");

        assert_eq!(ctx.resolve("w").as_deref(), Some("urn:w"));

        ctx.pop_scope();
        assert!(ctx.resolve("w").is_none());
    }

    #[test]
    fn test_xmlns_prefix() {
        assert_eq!(xmlns_prefix("xmlns"), Some(""));
        assert_eq!(xmlns_prefix("xmlns:w"), Some("w"));
        assert_eq!(xmlns_prefix("xml:space"), None);
        assert_eq!(xmlns_prefix("w:author"), None);
    }

    #[test]
    fn test_default_namespace() {
        let mut ctx = NamespaceContext::new();
        assert!(ctx.default_namespace().is_none());

        ctx.push_scope();
        ctx.bind("", "http://www.w3.org/1999/xhtml");
        assert_eq!(
            ctx.default_namespace().as_deref(),
            Some("http://www.w3.org/1999/xhtml")
        );

        ctx.pop_scope();
        assert!(ctx.default_namespace().is_none());
    }

    #[test]
    fn test_xml_prefix_always_bound() {
        let ctx = NamespaceContext::new();
        assert_eq!(ctx.resolve("xml").as_deref(), Some(XML_NAMESPACE));
    }

    #[test]
    fn test_expand_with_two_prefixes_for_one_uri() {
        let mut ctx = NamespaceContext::new();
        ctx.push_scope();
        ctx.bind("w", "urn:w");
        ctx.bind("x", "urn:w");

        assert_eq!(ctx.expand("w:del"), ctx.expand("x:del"));
        assert_eq!(ctx.expand("q:del"), ExpandedName::no_namespace("del"));
    }
}
