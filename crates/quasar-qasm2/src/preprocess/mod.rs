//! Textual rewriting passes run before the statement parser.
//!
//! 1. `include "<file>";` directives are replaced by the file content,
//!    recursively, each file at most once.
//! 2. `gate` definitions are removed and every call of a defined gate is
//!    rewritten in place into the primitive statements of its body.
//!
//! Both passes record where their output came from, so errors found in the
//! rewritten text can be reported against the file the user wrote.

mod flatten;
mod include;
mod source_map;

use tracing::instrument;

use crate::config::ParserConfig;
use crate::error::{ParseError, ParseResult};

use self::source_map::SourceMap;

/// Preprocessed source, ready for the statement parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    text: String,
    map: SourceMap,
}

impl Preprocessed {
    /// The rewritten text: plain QASM without includes or gate definitions.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Take the rewritten text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Move an error whose span points into [`Preprocessed::text`] back to
    /// the source it came from. Errors in included files are wrapped in
    /// [`ParseError::InInclude`].
    pub fn relocate(&self, error: ParseError) -> ParseError {
        self.map.relocate(error)
    }
}

/// Run every preprocessing pass over `source`.
///
/// Error spans point into `source`, or into an included file through
/// [`ParseError::InInclude`].
#[instrument(skip_all, fields(bytes = source.len()))]
pub fn preprocess(source: &str, config: &ParserConfig) -> ParseResult<Preprocessed> {
    let (inlined, mut map) = include::inline_includes(source, config)?;
    let (text, rewrites) = flatten::flatten_gates(&inlined).map_err(|e| map.relocate(e))?;
    map.rewrites = rewrites;
    Ok(Preprocessed { text, map })
}
