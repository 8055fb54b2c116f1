//! rmfile-core: matching engine for rmfile
//!
//! Decides whether files match sets of name, SHA-1 or gcid patterns, and
//! learns new pattern values from files it is shown.

pub mod config;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod gcid;
pub mod hash;
pub mod inspect;
pub mod pattern;
pub mod piece;
pub mod scan;
pub mod store;

pub use config::RmfileConfig;
pub use context::{Digests, MatchContext};
pub use error::{MatchError, Result};
pub use evaluator::MatchEvaluator;
pub use gcid::GcidHasher;
pub use hash::{DigestAlgorithm, Digester};
pub use inspect::{ContentInspector, Inspect};
pub use pattern::{PatternKind, PatternSet};
pub use piece::gcid_piece_size;
pub use scan::Scanner;
