//! Error types for redline extraction.

use thiserror::Error;

/// Result type alias for redline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or reading a markup tree.
///
/// Extraction itself only fails when there is no document root; every other
/// irregularity degrades to a warning on the result.
#[derive(Error, Debug)]
pub enum Error {
    /// The tree has no root node, or the root id does not resolve.
    #[error("document root is missing or unreadable")]
    MissingDocumentRoot,

    /// Markup parsing error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
