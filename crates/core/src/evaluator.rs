//! Multi-criteria evaluation of candidate files
//!
//! Metadata criteria are checked first. Content is only read when every
//! metadata criterion passes, and then only once for all content criteria.

use std::path::Path;

use tracing::debug;

use crate::context::MatchContext;
use crate::error::{MatchError, Result};
use crate::inspect::{ContentInspector, Inspect};
use crate::pattern::PatternSet;

/// Evaluates files against a fixed group of pattern sets.
///
/// Sets are split into metadata and content lists once, at construction.
/// No per-file state survives a call; only the sets' observed values
/// accumulate across [`observe`](Self::observe) calls.
pub struct MatchEvaluator<I = ContentInspector> {
    metadata_sets: Vec<PatternSet>,
    content_sets: Vec<PatternSet>,
    inspector: I,
}

impl MatchEvaluator {
    /// Evaluator reading content with the default [`ContentInspector`]
    ///
    /// # Errors
    /// Returns [`MatchError::NoPatterns`] if `sets` is empty.
    pub fn new(sets: Vec<PatternSet>) -> Result<Self> {
        Self::with_inspector(sets, ContentInspector::new())
    }
}

impl<I: Inspect> MatchEvaluator<I> {
    /// Evaluator using a custom content inspector
    ///
    /// # Errors
    /// Returns [`MatchError::NoPatterns`] if `sets` is empty.
    pub fn with_inspector(sets: Vec<PatternSet>, inspector: I) -> Result<Self> {
        if sets.is_empty() {
            return Err(MatchError::NoPatterns);
        }

        let (content_sets, metadata_sets): (Vec<_>, Vec<_>) =
            sets.into_iter().partition(PatternSet::requires_content);

        Ok(Self {
            metadata_sets,
            content_sets,
            inspector,
        })
    }

    /// Whether `path` satisfies every pattern set.
    ///
    /// # Errors
    /// Returns an error if the content has to be read and that fails; an
    /// unreadable file is not treated as a non-match.
    pub fn matches(&self, path: &Path) -> Result<bool> {
        let mut ctx = MatchContext::new(path);

        if !self.metadata_sets.iter().all(|set| set.test(&ctx)) {
            return Ok(false);
        }

        self.inspect(&mut ctx)?;
        Ok(self.content_sets.iter().all(|set| set.test(&ctx)))
    }

    /// Feed `path` to every pattern set so unseen values are recorded.
    ///
    /// Content is always read when any set needs it, whether or not the file
    /// currently matches.
    ///
    /// # Errors
    /// Returns an error if reading the content fails; no set is updated then.
    pub fn observe(&mut self, path: &Path) -> Result<()> {
        let mut ctx = MatchContext::new(path);
        self.inspect(&mut ctx)?;

        for set in self.metadata_sets.iter_mut().chain(&mut self.content_sets) {
            set.add(&ctx);
        }
        Ok(())
    }

    fn inspect(&self, ctx: &mut MatchContext) -> Result<()> {
        if self.content_sets.is_empty() {
            return Ok(());
        }
        let digests = self.inspector.digests_for(ctx.path(), &self.content_sets)?;
        debug!("Digests for {}: {digests:?}", ctx.path().display());
        ctx.record_digests(digests);
        Ok(())
    }

    /// All pattern sets, metadata sets first
    pub fn sets(&self) -> impl Iterator<Item = &PatternSet> {
        self.metadata_sets.iter().chain(&self.content_sets)
    }

    #[must_use]
    pub fn requires_content(&self) -> bool {
        !self.content_sets.is_empty()
    }

    #[must_use]
    pub fn inspector(&self) -> &I {
        &self.inspector
    }

    /// Hand the sets back, e.g. to persist observed values
    #[must_use]
    pub fn into_sets(self) -> Vec<PatternSet> {
        let mut sets = self.metadata_sets;
        sets.extend(self.content_sets);
        sets
    }
}
