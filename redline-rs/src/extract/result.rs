//! Extraction output and its diagnostics.

use std::fmt;

use serde::Serialize;

use crate::reconstruct::SkippedChild;
use crate::revision::ProjectionKind;

/// Something a caller should know about an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionWarning {
    /// A child reference could not be followed and was skipped.
    MalformedNode(SkippedChild),
    /// A projection was degenerate and the fallback policy replaced it.
    FallbackUsed {
        projection: ProjectionKind,
        policy: &'static str,
        lossy: bool,
    },
    /// A projection was degenerate and nothing replaced it.
    EmptyProjection { projection: ProjectionKind },
}

impl ExtractionWarning {
    /// The projection this warning concerns, if it is projection-specific.
    pub fn projection(&self) -> Option<ProjectionKind> {
        match self {
            ExtractionWarning::MalformedNode(_) => None,
            ExtractionWarning::FallbackUsed { projection, .. }
            | ExtractionWarning::EmptyProjection { projection } => Some(*projection),
        }
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::MalformedNode(skipped) => write!(
                f,
                "skipped child {} of node {} ({}): {}",
                skipped.position, skipped.parent, skipped.child, skipped.reason
            ),
            ExtractionWarning::FallbackUsed {
                projection,
                policy,
                lossy,
            } => {
                write!(
                    f,
                    "{projection} projection was empty; substituted fallback text ({policy})"
                )?;
                if *lossy {
                    write!(f, "; deleted content cannot be recovered")?;
                }
                Ok(())
            }
            ExtractionWarning::EmptyProjection { projection } => write!(
                f,
                "{projection} projection is empty and no fallback was applied"
            ),
        }
    }
}

/// Both projections of a document plus diagnostics.
///
/// Owns its text outright; nothing here points back into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    original: String,
    revised: String,
    used_fallback: bool,
    warnings: Vec<ExtractionWarning>,
}

impl ExtractionResult {
    pub(crate) fn new(
        original: String,
        revised: String,
        used_fallback: bool,
        warnings: Vec<ExtractionWarning>,
    ) -> Self {
        ExtractionResult {
            original,
            revised,
            used_fallback,
            warnings,
        }
    }

    /// The document before any pending edit.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The document once every pending edit is accepted.
    pub fn revised(&self) -> &str {
        &self.revised
    }

    /// The text for `projection`.
    pub fn projection(&self, projection: ProjectionKind) -> &str {
        match projection {
            ProjectionKind::Original => &self.original,
            ProjectionKind::Revised => &self.revised,
        }
    }

    /// Whether any projection was replaced by fallback text.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    /// Warnings in the order they were raised.
    pub fn warnings(&self) -> &[ExtractionWarning] {
        &self.warnings
    }

    /// True when a projection is fallback text or was left empty.
    pub fn is_degraded(&self) -> bool {
        self.warnings.iter().any(|w| w.projection().is_some())
    }

    /// Consumes the result, yielding `(original, revised)`.
    pub fn into_texts(self) -> (String, String) {
        (self.original, self.revised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;
    use crate::reconstruct::SkipReason;

    #[test]
    fn test_fallback_warning_names_projection() {
        let warning = ExtractionWarning::FallbackUsed {
            projection: ProjectionKind::Original,
            policy: "current-text",
            lossy: true,
        };
        let message = warning.to_string();
        assert!(message.starts_with("original projection was empty"));
        assert!(message.contains("cannot be recovered"));
        assert_eq!(warning.projection(), Some(ProjectionKind::Original));
    }

    #[test]
    fn test_malformed_warning_message() {
        let warning = ExtractionWarning::MalformedNode(SkippedChild {
            parent: NodeId::new(0),
            position: 2,
            child: NodeId::new(17),
            reason: SkipReason::Dangling,
        });
        assert_eq!(
            warning.to_string(),
            "skipped child 2 of node #0 (#17): reference does not resolve"
        );
        assert_eq!(warning.projection(), None);
    }

    #[test]
    fn test_degraded_only_for_projection_warnings() {
        let clean = ExtractionResult::new("a".into(), "b".into(), false, vec![]);
        assert!(!clean.is_degraded());

        let empty = ExtractionResult::new(
            "".into(),
            "b".into(),
            false,
            vec![ExtractionWarning::EmptyProjection {
                projection: ProjectionKind::Original,
            }],
        );
        assert!(empty.is_degraded());
        assert!(!empty.used_fallback());
        assert_eq!(empty.projection(ProjectionKind::Revised), "b");
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = ExtractionResult::new(
            "old".into(),
            "new".into(),
            true,
            vec![ExtractionWarning::FallbackUsed {
                projection: ProjectionKind::Revised,
                policy: "current-text",
                lossy: false,
            }],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["original"], "old");
        assert_eq!(json["usedFallback"], true);
        assert_eq!(json["warnings"][0]["kind"], "fallback_used");
        assert_eq!(json["warnings"][0]["projection"], "revised");
    }
}
