//! XML host layer.
//!
//! Builds [`crate::MarkupTree`]s from raw markup. The extractor itself never
//! parses; anything that can produce a tree can stand in for this module.

mod parser;

pub use parser::{parse_file, parse_str, ParseOptions, XmlTreeParser};
