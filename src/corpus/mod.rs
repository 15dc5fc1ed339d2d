//! Corpus loading: the request/answer parsers and the bullet store built from them.
mod answers;
mod phase;
mod requests;
mod store;
mod types;


use std::path::PathBuf;
use std::sync::LazyLock;

use regex::bytes::Regex;

pub use answers::AnswerReader;
#[cfg(feature = "fuzzing")]
pub(crate) use answers::split_answer_line;
pub use phase::Phase;
pub use requests::{RequestFilters, RequestReader};
pub use store::{BulletStore, Pairing};
pub use types::{Bullet, Header, Request, Response};

/// Channel depth between a corpus producer and the pairing consumer.
pub(crate) const CORPUS_QUEUE_CAPACITY: usize = 100;

/// Where the corpus lives and which part of it to replay.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub root: PathBuf,
    pub phase: Phase,
    pub filters: RequestFilters,
}

/// A corpus line format, compiled on first use. Blanks are `[\t\n\f\r ]`
/// and every pattern runs byte-wise, so non-UTF-8 bodies still match.
pub(crate) type LinePattern = LazyLock<Result<Regex, regex::Error>>;
