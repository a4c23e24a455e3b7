//! Redline - original and revised text from tracked-changes markup
//!
//! This library reads a revision-marked document tree (deletions,
//! insertions and moves recorded inline, as in WordprocessingML
//! `w:del` / `w:ins` / `w:moveFrom` / `w:moveTo`) and rebuilds two plain-text
//! readings of it:
//!
//! - the *original* projection, as the document read before any pending edit
//! - the *revised* projection, as it will read once every edit is accepted
//!
//! # Inclusion rules
//!
//! Each text leaf takes the state of its innermost revision-marked ancestor.
//! Deleted and move-source text belongs to the original projection only;
//! inserted and move-destination text to the revised projection only;
//! unmarked text to both. When markers nest (an insertion later struck
//! through, say) the innermost marker decides.
//!
//! # Example
//!
//! ```
//! use xml_redline::{extract, xml::parse_str};
//!
//! let tree = parse_str(
//!     r#"<w:p xmlns:w="urn:w">
//!          <w:r><w:t xml:space="preserve">The party shall </w:t></w:r>
//!          <w:del><w:r><w:delText xml:space="preserve">not </w:delText></w:r></w:del>
//!          <w:r><w:t>indemnify.</w:t></w:r>
//!        </w:p>"#,
//! )?;
//! let result = extract(&tree)?;
//! assert_eq!(result.original(), "The party shall not indemnify.");
//! assert_eq!(result.revised(), "The party shall indemnify.");
//! # Ok::<(), xml_redline::Error>(())
//! ```

pub mod constants;
pub mod error;
pub mod extract;
pub mod node;
pub mod reconstruct;
pub mod revision;
pub mod summary;
pub mod xml;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{
    extract, CurrentText, CurrentTextFallback, ExtractionResult, ExtractionWarning, Extractor,
    FallbackPolicy, NoFallback, Substitution, TextFn,
};
pub use node::{
    ExpandedName, MarkupElement, MarkupNode, MarkupText, MarkupTree, NodeContent, NodeId,
    TreeBuilder,
};
pub use reconstruct::{reconstruct, Reconstruction, SkipReason, SkippedChild, TextReconstructor};
pub use revision::{ProjectionKind, RevisionState};
pub use summary::RevisionSummary;
pub use xml::{ParseOptions, XmlTreeParser};
