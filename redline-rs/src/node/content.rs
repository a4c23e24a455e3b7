//! Content carried by tree nodes.
//!
//! A node is either an element (tag with attributes) or a run of text.

use std::collections::HashMap;

use super::namespace::{local_name, ExpandedName};

/// The content of a markup node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    /// An element with a qualified name and attributes.
    Element(MarkupElement),
    /// Character data.
    Text(MarkupText),
}

impl NodeContent {
    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, NodeContent::Element(_))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, NodeContent::Text(_))
    }

    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&MarkupElement> {
        match self {
            NodeContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a reference to the text, if this is a text node.
    pub fn as_text(&self) -> Option<&MarkupText> {
        match self {
            NodeContent::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// An element with a qualified name and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    /// The qualified name as written (e.g. "w:del").
    name: String,
    /// Namespace URI + local name, when the host resolved namespaces.
    expanded_name: Option<ExpandedName>,
    /// Attributes keyed by qualified name. Opaque to extraction.
    attributes: HashMap<String, String>,
}

impl MarkupElement {
    /// Creates a new element with the given name and attributes.
    pub fn new(name: impl Into<String>, attributes: HashMap<String, String>) -> Self {
        MarkupElement {
            name: name.into(),
            expanded_name: None,
            attributes,
        }
    }

    /// Creates a new element with a resolved namespace.
    pub fn new_with_namespace(
        name: impl Into<String>,
        expanded_name: ExpandedName,
        attributes: HashMap<String, String>,
    ) -> Self {
        MarkupElement {
            name: name.into(),
            expanded_name: Some(expanded_name),
            attributes,
        }
    }

    /// Returns the qualified name of the element.
    pub fn qname(&self) -> &str {
        &self.name
    }

    /// Returns the name with any namespace prefix stripped.
    pub fn local_name(&self) -> &str {
        match &self.expanded_name {
            Some(expanded) => &expanded.local_name,
            None => local_name(&self.name),
        }
    }

    /// Returns the expanded name, if available.
    pub fn expanded_name(&self) -> Option<&ExpandedName> {
        self.expanded_name.as_ref()
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Looks up an attribute by local name, ignoring its prefix.
    ///
    /// `w:author` and `author` both match `"author"`. When several prefixed
    /// spellings are present the lexicographically first key wins.
    pub fn attribute_local(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .filter(|(key, _)| local_name(key) == name)
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, value)| value.as_str())
    }
}

impl std::fmt::Display for MarkupElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}", self.name)?;
        let mut attr_names: Vec<&String> = self.attributes.keys().collect();
        attr_names.sort();
        for name in attr_names {
            write!(f, " {}=\"{}\"", name, self.attributes[name])?;
        }
        write!(f, ">")
    }
}

/// A run of character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupText {
    text: String,
}

impl MarkupText {
    /// Creates a text node.
    pub fn new(text: impl Into<String>) -> Self {
        MarkupText { text: text.into() }
    }

    /// Returns the text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_local_name_strips_prefix() {
        let e = MarkupElement::new("w:moveFrom", HashMap::new());
        assert_eq!(e.qname(), "w:moveFrom");
        assert_eq!(e.local_name(), "moveFrom");

        let plain = MarkupElement::new("ins", HashMap::new());
        assert_eq!(plain.local_name(), "ins");
    }

    #[test]
    fn test_local_name_prefers_expanded_name() {
        let e = MarkupElement::new_with_namespace(
            "w:del",
            ExpandedName::new("urn:w", "del"),
            HashMap::new(),
        );
        assert_eq!(e.local_name(), "del");
        assert_eq!(e.expanded_name().map(|n| &*n.namespace_uri), Some("urn:w"));
    }

    #[test]
    fn test_attribute_local() {
        let e = MarkupElement::new(
            "w:ins",
            attrs(&[("w:author", "Ana"), ("w:date", "2024-01-02T00:00:00Z")]),
        );
        assert_eq!(e.attribute_local("author"), Some("Ana"));
        assert_eq!(e.attribute_local("date"), Some("2024-01-02T00:00:00Z"));
        assert_eq!(e.attribute_local("id"), None);
    }

    #[test]
    fn test_display_sorts_attributes() {
        let e = MarkupElement::new("w:del", attrs(&[("w:id", "3"), ("w:author", "Bo")]));
        assert_eq!(e.to_string(), "<w:del w:author=\"Bo\" w:id=\"3\">");
    }

    #[test]
    fn test_text_blank() {
        assert!(MarkupText::new(" \t\n").is_blank());
        assert!(MarkupText::new("").is_blank());
        assert!(!MarkupText::new(" a ").is_blank());
        assert!(NodeContent::Text(MarkupText::new("x")).is_text());
    }
}
