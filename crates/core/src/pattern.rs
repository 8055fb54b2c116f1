//! Pattern sets: accepted values for one matching criterion
//!
//! A set is seeded from the lines of a pattern file, answers membership
//! questions for a [`MatchContext`], and collects values observed on new
//! files so they can be written back.

use std::collections::BTreeSet;
use std::fmt;

use crate::context::MatchContext;
use crate::hash::DigestAlgorithm;
use crate::piece::gcid_piece_size;

/// Which property of a file a pattern set compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternKind {
    /// Base name, exact
    Name,
    /// Base name, case-insensitive
    IName,
    /// SHA-1 of the whole file
    Sha1,
    /// Chunked two-level SHA-1 ("gcid")
    Gcid,
}

impl PatternKind {
    pub const ALL: [Self; 4] = [Self::Name, Self::IName, Self::Sha1, Self::Gcid];

    /// Short label, also the stem of the default pattern file
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::IName => "iname",
            Self::Sha1 => "sha1",
            Self::Gcid => "gcid",
        }
    }

    /// File looked up inside a patterns directory
    #[must_use]
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Name => "name.txt",
            Self::IName => "iname.txt",
            Self::Sha1 => "sha1.txt",
            Self::Gcid => "gcid.txt",
        }
    }

    #[must_use]
    pub fn digest_algorithm(self) -> Option<DigestAlgorithm> {
        match self {
            Self::Name | Self::IName => None,
            Self::Sha1 => Some(DigestAlgorithm::Sha1),
            Self::Gcid => Some(DigestAlgorithm::Gcid),
        }
    }

    #[must_use]
    pub fn requires_content(self) -> bool {
        self.digest_algorithm().is_some()
    }

    /// Whether values are compared after lower-casing.
    ///
    /// Hex digests fold too, so upper-case digests from other tools match.
    #[must_use]
    pub fn folds_case(self) -> bool {
        !matches!(self, Self::Name)
    }

    fn normalize(self, value: &str) -> String {
        if self.folds_case() {
            value.to_lowercase()
        } else {
            value.to_string()
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named collection of accepted values plus values observed during a run.
///
/// `accepted` and `observed` never overlap: a value is only observed if it
/// was not already accepted.
#[derive(Debug, Clone)]
pub struct PatternSet {
    name: String,
    kind: PatternKind,
    accepted: BTreeSet<String>,
    observed: BTreeSet<String>,
}

impl PatternSet {
    /// Build a set from raw seed lines.
    ///
    /// Lines are trimmed and blank lines dropped; case-folding kinds
    /// lower-case every value.
    pub fn new<I, S>(name: impl Into<String>, kind: PatternKind, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted = lines
            .into_iter()
            .filter_map(|line| {
                let line = line.as_ref().trim();
                (!line.is_empty()).then(|| kind.normalize(line))
            })
            .collect();

        Self {
            name: name.into(),
            kind,
            accepted,
            observed: BTreeSet::new(),
        }
    }

    /// Source identifier, usually the pattern file path
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    #[must_use]
    pub fn requires_content(&self) -> bool {
        self.kind.requires_content()
    }

    #[must_use]
    pub fn digest_algorithm(&self) -> Option<DigestAlgorithm> {
        self.kind.digest_algorithm()
    }

    /// Read buffer size this set needs for a file of `total_bytes`.
    ///
    /// Only gcid cares: each read must cover exactly one piece.
    #[must_use]
    pub fn buffer_hint(&self, total_bytes: u64) -> Option<usize> {
        match self.kind {
            PatternKind::Gcid => Some(gcid_piece_size(total_bytes)),
            PatternKind::Name | PatternKind::IName | PatternKind::Sha1 => None,
        }
    }

    /// Derive this set's value from the context.
    ///
    /// `None` when the file has no usable base name (missing or not UTF-8).
    ///
    /// # Panics
    /// Panics if a content digest is required but was never recorded in
    /// `ctx`. The evaluator always inspects content before testing content
    /// sets, so this only fires on a sequencing bug.
    fn read_value(&self, ctx: &MatchContext) -> Option<String> {
        match self.kind.digest_algorithm() {
            None => ctx.file_name().map(|name| self.kind.normalize(name)),
            Some(algorithm) => match ctx.digest(algorithm) {
                Some(hex) => Some(self.kind.normalize(hex)),
                None => panic!(
                    "{algorithm} digest missing for {} while testing {}",
                    ctx.path().display(),
                    self.name
                ),
            },
        }
    }

    /// Whether the file described by `ctx` is accepted by this set
    #[must_use]
    pub fn test(&self, ctx: &MatchContext) -> bool {
        self.read_value(ctx).is_some_and(|value| self.accepted.contains(&value))
    }

    /// Record the file's value if it is not already accepted.
    ///
    /// Values that would not read back as the same single line from a
    /// pattern file (empty, surrounding whitespace, line breaks) are skipped.
    pub fn add(&mut self, ctx: &MatchContext) {
        let Some(value) = self.read_value(ctx) else {
            return;
        };
        if is_storable(&value) && !self.accepted.contains(&value) {
            self.observed.insert(value);
        }
    }

    /// Whether [`add`](Self::add) found anything new
    #[must_use]
    pub fn has_observed(&self) -> bool {
        !self.observed.is_empty()
    }

    /// Newly observed values, sorted
    pub fn observed(&self) -> impl Iterator<Item = &str> {
        self.observed.iter().map(String::as_str)
    }

    #[must_use]
    pub fn accepted_len(&self) -> usize {
        self.accepted.len()
    }

    /// Accepted and observed values merged, sorted
    #[must_use]
    pub fn all_values(&self) -> Vec<String> {
        self.accepted.union(&self.observed).cloned().collect()
    }
}

fn is_storable(value: &str) -> bool {
    !value.is_empty() && value.trim() == value && !value.contains(['\n', '\r'])
}
