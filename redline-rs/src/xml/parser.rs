//! XML parser that builds markup trees.
//!
//! This is the reference host layer: it turns raw tracked-changes XML into
//! the immutable [`MarkupTree`] the extractor reads. It uses quick-xml's
//! streaming API and keeps character data verbatim.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::constants::DEFAULT_SKIP_ELEMENTS;
use crate::error::{Error, Result};
use crate::node::namespace::{local_name, xmlns_prefix, NamespaceContext};
use crate::node::{MarkupElement, MarkupTree, NodeId, TreeBuilder};

/// Options controlling how markup becomes a tree.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Keep whitespace-only text everywhere, not just under
    /// `xml:space="preserve"`.
    pub keep_whitespace: bool,
    /// Local names of elements dropped together with their subtree.
    pub skip_elements: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            keep_whitespace: false,
            skip_elements: DEFAULT_SKIP_ELEMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ParseOptions {
    /// Sets whether whitespace-only text is always kept.
    pub fn keep_whitespace(mut self, keep: bool) -> Self {
        self.keep_whitespace = keep;
        self
    }

    /// Adds an element local name to the skip list.
    pub fn skip_element(mut self, name: impl Into<String>) -> Self {
        self.skip_elements.push(name.into());
        self
    }

    /// Clears the skip list.
    pub fn skip_nothing(mut self) -> Self {
        self.skip_elements.clear();
        self
    }

    fn skips(&self, local: &str) -> bool {
        self.skip_elements.iter().any(|s| s == local)
    }
}

/// An element still waiting for its end tag.
struct OpenElement {
    id: NodeId,
    /// Whether `xml:space="preserve"` is in effect.
    preserve: bool,
}

/// XML parser that builds [`MarkupTree`]s.
#[derive(Debug, Clone, Default)]
pub struct XmlTreeParser {
    options: ParseOptions,
}

impl XmlTreeParser {
    /// Creates a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    pub fn with_options(options: ParseOptions) -> Self {
        XmlTreeParser { options }
    }

    /// Parses XML from a string.
    pub fn parse_str(&self, xml: &str) -> Result<MarkupTree> {
        let mut reader = Reader::from_str(xml);
        // Text is kept verbatim; whitespace policy is applied per node
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<MarkupTree> {
        let file = File::open(path)?;
        let mut reader = Reader::from_reader(BufReader::new(file));
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a quick-xml Reader.
    fn parse_reader<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<MarkupTree> {
        let mut state = ParseState::new(&self.options);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    if state.skip_depth > 0 {
                        state.skip_depth += 1;
                    } else {
                        state.flush_text();
                        let (qname, attributes, decls) = parse_element(e, reader)?;
                        if self.options.skips(local_name(&qname)) {
                            state.skip_depth = 1;
                        } else {
                            let open = state.open_element(qname, attributes, decls)?;
                            state.stack.push(open);
                        }
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    if state.skip_depth == 0 {
                        state.flush_text();
                        let (qname, attributes, decls) = parse_element(e, reader)?;
                        if !self.options.skips(local_name(&qname)) {
                            state.open_element(qname, attributes, decls)?;
                            state.ns.pop_scope();
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    if state.skip_depth > 0 {
                        state.skip_depth -= 1;
                    } else {
                        state.flush_text();
                        state.stack.pop();
                        state.ns.pop_scope();
                    }
                }
                Ok(Event::Text(e)) => {
                    if state.collecting() {
                        let raw = std::str::from_utf8(e.as_ref())
                            .map_err(|e| Error::Parse(e.to_string()))?;
                        let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                        state.push_text(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if state.collecting() {
                        state.push_text(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::GeneralRef(ref e)) => {
                    if state.collecting() {
                        let name = std::str::from_utf8(e.as_ref())
                            .map_err(|e| Error::Parse(e.to_string()))?;
                        state.push_text(&resolve_reference(name));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(Event::Comment(_)) | Ok(Event::Decl(_)) | Ok(Event::PI(_)) => {}
                Ok(Event::DocType(_)) => {}
                Err(e) => return Err(e.into()),
            }
            buf.clear();
        }

        state.finish()
    }
}

/// Tree under construction plus the reader's position in it.
struct ParseState<'o> {
    options: &'o ParseOptions,
    builder: TreeBuilder,
    has_root: bool,
    stack: Vec<OpenElement>,
    ns: NamespaceContext,
    current_text: Option<String>,
    /// Depth inside a skipped element; zero when not skipping.
    skip_depth: usize,
}

impl<'o> ParseState<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        ParseState {
            options,
            builder: TreeBuilder::new(),
            has_root: false,
            stack: Vec::new(),
            ns: NamespaceContext::new(),
            current_text: None,
            skip_depth: 0,
        }
    }

    /// Character data only counts inside the document element and outside
    /// skipped subtrees.
    fn collecting(&self) -> bool {
        self.skip_depth == 0 && !self.stack.is_empty()
    }

    fn push_text(&mut self, text: &str) {
        self.current_text
            .get_or_insert_with(String::new)
            .push_str(text);
    }

    /// Adds an element under the innermost open element, or as the root.
    ///
    /// Opens a namespace scope that the caller closes.
    fn open_element(
        &mut self,
        qname: String,
        attributes: HashMap<String, String>,
        decls: Vec<(String, String)>,
    ) -> Result<OpenElement> {
        self.ns.push_scope();
        for (prefix, uri) in &decls {
            self.ns.bind(prefix, uri);
        }
        let inherited = self.stack.last().is_some_and(|open| open.preserve);
        let preserve = match attributes.get("xml:space").map(String::as_str) {
            Some("preserve") => true,
            Some("default") => false,
            _ => inherited,
        };

        let expanded = self.ns.expand(&qname);
        let element = MarkupElement::new_with_namespace(qname, expanded, attributes);
        let id = match self.stack.last() {
            Some(parent) => self.builder.element(parent.id, element),
            None if self.has_root => {
                return Err(Error::Parse(format!(
                    "second document element {}",
                    element.qname()
                )))
            }
            None => {
                self.has_root = true;
                self.builder.root(element)
            }
        };
        Ok(OpenElement { id, preserve })
    }

    /// Emits accumulated text as a leaf of the innermost open element.
    fn flush_text(&mut self) {
        let (Some(text), Some(parent)) = (self.current_text.take(), self.stack.last()) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let blank = text.trim().is_empty();
        if blank && !(parent.preserve || self.options.keep_whitespace) {
            return;
        }
        self.builder.text(parent.id, text);
    }

    fn finish(self) -> Result<MarkupTree> {
        if !self.has_root {
            return Err(Error::MissingDocumentRoot);
        }
        Ok(self.builder.finish())
    }
}

/// Parses an element's name, attributes and namespace declarations.
fn parse_element<R>(
    e: &BytesStart,
    reader: &Reader<R>,
) -> Result<(String, HashMap<String, String>, Vec<(String, String)>)> {
    let name = reader
        .decoder()
        .decode(e.name().as_ref())
        .map_err(|e| Error::Parse(e.to_string()))?
        .to_string();

    let mut attributes = HashMap::new();
    let mut decls = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| Error::Parse(format!("Attribute error: {}", e)))?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();
        match xmlns_prefix(&key) {
            Some(prefix) => decls.push((prefix.to_string(), value)),
            None => {
                attributes.insert(key, value);
            }
        }
    }

    Ok((name, attributes, decls))
}

/// Resolves an entity or character reference body (`amp`, `#38`, `#x26`).
///
/// Unknown entities are kept literally rather than failing the document.
fn resolve_reference(name: &str) -> String {
    if let Some(resolved) = resolve_predefined_entity(name) {
        return resolved.to_string();
    }
    let code = name.strip_prefix('#').and_then(|num| {
        match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse::<u32>().ok(),
        }
    });
    match code.and_then(char::from_u32) {
        Some(c) => c.to_string(),
        None => {
            debug!(reference = name, "keeping unresolved reference literally");
            format!("&{};", name)
        }
    }
}

/// Parses XML from a file with default options.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<MarkupTree> {
    XmlTreeParser::new().parse_file(path)
}

/// Parses XML from a string with default options.
pub fn parse_str(xml: &str) -> Result<MarkupTree> {
    XmlTreeParser::new().parse_str(xml)
}
