//! Tag and namespace constants for tracked-changes markup.
//!
//! Revision markers are matched on local name only, so these are the
//! unprefixed spellings.

/// Local name of a deletion marker (`w:del`, `<del>`).
pub const TAG_DELETED: &str = "del";

/// Local name of an insertion marker (`w:ins`, `<ins>`).
pub const TAG_INSERTED: &str = "ins";

/// Local name of a move-source marker (`w:moveFrom`).
pub const TAG_MOVE_FROM: &str = "moveFrom";

/// Local name of a move-destination marker (`w:moveTo`).
pub const TAG_MOVE_TO: &str = "moveTo";

/// Local name of the revision author attribute (`w:author`).
pub const ATTR_AUTHOR: &str = "author";

/// Local name of the revision timestamp attribute (`w:date`).
pub const ATTR_DATE: &str = "date";

/// The reserved `xml` namespace.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// WordprocessingML main namespace.
pub const WORDPROCESSINGML_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Elements dropped by the XML host by default: field instructions are
/// markup, not document text.
pub const DEFAULT_SKIP_ELEMENTS: &[&str] = &["instrText", "delInstrText"];
