//! Fallback policies for degenerate projections.
//!
//! When a projection comes out empty or whitespace-only the extractor asks
//! its policy for a substitute. Whatever the policy answers, the result
//! records a warning, so a degraded extraction is never mistaken for a
//! clean one.

use crate::revision::ProjectionKind;

/// Replacement text offered for a degenerate projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Text to use in place of the projection.
    pub text: String,
    /// True when the substitute is known to miss content the projection
    /// should contain.
    pub lossy: bool,
}

/// Decides what replaces an empty projection.
pub trait FallbackPolicy {
    /// Short name used in warnings and logs.
    fn name(&self) -> &'static str;

    /// Returns the substitute for `projection`, or `None` to keep the
    /// projection as produced.
    fn substitute(&self, projection: ProjectionKind) -> Option<Substitution>;
}

impl<P: FallbackPolicy + ?Sized> FallbackPolicy for &P {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn substitute(&self, projection: ProjectionKind) -> Option<Substitution> {
        (**self).substitute(projection)
    }
}

/// Never substitutes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FallbackPolicy for NoFallback {
    fn name(&self) -> &'static str {
        "none"
    }

    fn substitute(&self, _projection: ProjectionKind) -> Option<Substitution> {
        None
    }
}

/// The host's current rendered plain-text view of the document.
///
/// That view shows the document as it currently reads, i.e. with pending
/// edits applied, so it says nothing about deleted text.
pub trait CurrentText {
    /// Renders the current text.
    fn current_text(&self) -> String;
}

impl CurrentText for String {
    fn current_text(&self) -> String {
        self.clone()
    }
}

impl CurrentText for &str {
    fn current_text(&self) -> String {
        (*self).to_string()
    }
}

/// Adapts a closure into a [`CurrentText`] source, rendered lazily only
/// when a fallback actually fires.
pub struct TextFn<F>(pub F);

impl<F: Fn() -> String> CurrentText for TextFn<F> {
    fn current_text(&self) -> String {
        (self.0)()
    }
}

/// Substitutes the host's current text for any degenerate projection.
///
/// For the original projection this is an approximation at best: deleted
/// and moved-away text cannot be recovered from the current view, so the
/// substitution is flagged lossy.
#[derive(Debug, Clone)]
pub struct CurrentTextFallback<S> {
    source: S,
}

impl<S: CurrentText> CurrentTextFallback<S> {
    /// Creates the policy over a host text source.
    pub fn new(source: S) -> Self {
        CurrentTextFallback { source }
    }
}

impl<S: CurrentText> FallbackPolicy for CurrentTextFallback<S> {
    fn name(&self) -> &'static str {
        "current-text"
    }

    fn substitute(&self, projection: ProjectionKind) -> Option<Substitution> {
        Some(Substitution {
            text: self.source.current_text(),
            lossy: projection == ProjectionKind::Original,
        })
    }
}
