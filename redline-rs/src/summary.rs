//! Inventory of the revision markers in a tree.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::constants::ATTR_AUTHOR;
use crate::node::MarkupTree;
use crate::revision::RevisionState;

/// Marker counts and authors for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevisionSummary {
    pub deletions: usize,
    pub insertions: usize,
    pub moves_from: usize,
    pub moves_to: usize,
    /// Distinct `author` attribute values, sorted.
    pub authors: BTreeSet<String>,
}

impl RevisionSummary {
    /// Walks `tree` once and tallies its markers.
    pub fn from_tree(tree: &MarkupTree) -> Self {
        let mut summary = RevisionSummary::default();
        for (_, node, state) in tree.revisions() {
            match state {
                RevisionState::Deleted => summary.deletions += 1,
                RevisionState::Inserted => summary.insertions += 1,
                RevisionState::MoveFrom => summary.moves_from += 1,
                RevisionState::MoveTo => summary.moves_to += 1,
                RevisionState::None => {}
            }
            if let Some(author) = node
                .as_element()
                .and_then(|e| e.attribute_local(ATTR_AUTHOR))
            {
                summary.authors.insert(author.to_string());
            }
        }
        summary
    }

    /// Total number of markers.
    pub fn total(&self) -> usize {
        self.deletions + self.insertions + self.moves_from + self.moves_to
    }

    /// True when the document carries no pending edits.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn test_summary_counts_and_authors() {
        let xml = r#"<w:body xmlns:w="urn:w">
            <w:p>
              <w:del w:author="Ana"><w:r><w:delText>a</w:delText></w:r></w:del>
              <w:ins w:author="Bo"><w:r><w:t>b</w:t></w:r></w:ins>
              <w:ins w:author="Ana"><w:r><w:t>c</w:t></w:r></w:ins>
            </w:p>
            <w:moveFrom w:author="Cy"/>
            <w:moveTo/>
        </w:body>"#;
        let summary = RevisionSummary::from_tree(&parse_str(xml).unwrap());

        assert_eq!(summary.deletions, 1);
        assert_eq!(summary.insertions, 2);
        assert_eq!(summary.moves_from, 1);
        assert_eq!(summary.moves_to, 1);
        assert_eq!(summary.total(), 5);
        let authors: Vec<&str> = summary.authors.iter().map(String::as_str).collect();
        assert_eq!(authors, vec!["Ana", "Bo", "Cy"]);
    }

    #[test]
    fn test_clean_document() {
        let summary = RevisionSummary::from_tree(&parse_str("<p>plain</p>").unwrap());
        assert!(summary.is_clean());
        assert!(summary.authors.is_empty());
    }
}
