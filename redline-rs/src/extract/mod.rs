//! Extraction of both projections from one tree.
//!
//! [`Extractor`] runs the original and revised reconstructions, folds the
//! traversal diagnostics into warnings, and hands degenerate projections to
//! its [`FallbackPolicy`].

mod fallback;
mod result;

pub use fallback::{
    CurrentText, CurrentTextFallback, FallbackPolicy, NoFallback, Substitution, TextFn,
};
pub use result::{ExtractionResult, ExtractionWarning};

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::Result;
use crate::node::MarkupTree;
use crate::reconstruct::{Reconstruction, TextReconstructor};
use crate::revision::ProjectionKind;

/// Produces an [`ExtractionResult`] per call.
///
/// Stateless between calls; one extractor can serve many trees, from many
/// threads when the policy allows it.
#[derive(Debug, Clone, Default)]
pub struct Extractor<P = NoFallback> {
    policy: P,
}

impl Extractor<NoFallback> {
    /// Creates an extractor that never substitutes fallback text.
    pub fn new() -> Self {
        Extractor { policy: NoFallback }
    }
}

impl<P: FallbackPolicy> Extractor<P> {
    /// Creates an extractor with the given fallback policy.
    pub fn with_policy(policy: P) -> Self {
        Extractor { policy }
    }

    /// Returns the fallback policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Extracts both projections of `tree`.
    ///
    /// Fails only with [`crate::Error::MissingDocumentRoot`].
    #[tracing::instrument(skip_all, fields(nodes = tree.len(), policy = self.policy.name()))]
    pub fn extract(&self, tree: &MarkupTree) -> Result<ExtractionResult> {
        let reconstructor = TextReconstructor::new(tree);
        let original = reconstructor.reconstruct_with_diagnostics(ProjectionKind::Original)?;
        let revised = reconstructor.reconstruct_with_diagnostics(ProjectionKind::Revised)?;

        let mut warnings = malformed_warnings(&original, &revised);
        let mut used_fallback = false;

        let mut settle = |projection: ProjectionKind, text: String| -> String {
            debug!(%projection, len = text.len(), "projection reconstructed");
            if !text.trim().is_empty() {
                return text;
            }
            match self.policy.substitute(projection) {
                Some(substitution) => {
                    warn!(
                        %projection,
                        policy = self.policy.name(),
                        lossy = substitution.lossy,
                        "projection empty, using fallback text"
                    );
                    used_fallback = true;
                    warnings.push(ExtractionWarning::FallbackUsed {
                        projection,
                        policy: self.policy.name(),
                        lossy: substitution.lossy,
                    });
                    substitution.text
                }
                None => {
                    warn!(%projection, "projection empty, no fallback applied");
                    warnings.push(ExtractionWarning::EmptyProjection { projection });
                    text
                }
            }
        };

        let original = settle(ProjectionKind::Original, original.text);
        let revised = settle(ProjectionKind::Revised, revised.text);

        Ok(ExtractionResult::new(
            original,
            revised,
            used_fallback,
            warnings,
        ))
    }
}

/// Merges the skip lists of both passes, keeping document order and
/// reporting each bad reference once.
fn malformed_warnings(
    original: &Reconstruction,
    revised: &Reconstruction,
) -> Vec<ExtractionWarning> {
    let mut seen = HashSet::new();
    original
        .skipped
        .iter()
        .chain(&revised.skipped)
        .filter(|skipped| seen.insert(**skipped))
        .map(|skipped| {
            warn!(
                parent = %skipped.parent,
                position = skipped.position,
                child = %skipped.child,
                reason = %skipped.reason,
                "skipped malformed child reference"
            );
            ExtractionWarning::MalformedNode(*skipped)
        })
        .collect()
}

/// Extracts both projections of `tree` without any fallback.
pub fn extract(tree: &MarkupTree) -> Result<ExtractionResult> {
    Extractor::new().extract(tree)
}
