//! Include inlining.

use rustc_hash::FxHashSet;
use tracing::trace;

use super::source_map::{MAIN, SourceMap};
use crate::config::ParserConfig;
use crate::cursor::TokenCursor;
use crate::error::{Construct, ParseError, ParseResult};
use crate::lexer::{Token, lex};

/// Replace every `include "<file>";` in `source` by the file's content,
/// recording where each run of the output came from.
///
/// Each path is inlined at most once; a repeated or cyclic include is
/// dropped. Errors inside an included file are relative to that file and
/// wrapped in [`ParseError::InInclude`].
pub(crate) fn inline_includes(
    source: &str,
    config: &ParserConfig,
) -> ParseResult<(String, SourceMap)> {
    let mut inliner = Inliner {
        config,
        out: String::with_capacity(source.len()),
        map: SourceMap::default(),
        included: FxHashSet::default(),
    };
    inliner.splice(source, MAIN)?;
    Ok((inliner.out, inliner.map))
}

struct Inliner<'a> {
    config: &'a ParserConfig,
    out: String,
    map: SourceMap,
    included: FxHashSet<String>,
}

impl Inliner<'_> {
    /// Append `source`, the content of file `file`, with its includes expanded.
    fn splice(&mut self, source: &str, file: usize) -> ParseResult<()> {
        let mut cursor = TokenCursor::new(lex(source)?, source.len());
        let mut copied = 0;
        self.map.includes.copied(self.out.len(), file, 0);

        while let Some(token) = cursor.peek() {
            if *token != Token::Include {
                cursor.advance();
                continue;
            }

            let start = cursor.current_span().start;
            cursor.advance();
            let (path, path_span) = match cursor.peek() {
                Some(Token::StringLiteral(path)) => {
                    let path = path.clone();
                    let span = cursor.current_span();
                    cursor.advance();
                    (path, span)
                }
                _ => return Err(cursor.unexpected(Construct::Include, "a quoted file name")),
            };
            let end = cursor.expect(Token::Semicolon, Construct::Include)?.end;

            self.out.push_str(&source[copied..start]);
            if self.included.insert(path.clone()) {
                let content = self.config.resolve_include(&path).ok_or_else(|| {
                    ParseError::UnresolvedInclude {
                        path: path.clone(),
                        span: path_span,
                    }
                })?;
                trace!(path = %path, bytes = content.len(), "inlining include");
                let child = self.map.add_file(path, file, start..end);
                self.splice(&content, child)
                    .map_err(|e| self.map.enclose(child, e))?;
            } else {
                trace!(path = %path, "skipping include already inlined");
            }
            copied = end;
            self.map.includes.copied(self.out.len(), file, end);
        }

        self.out.push_str(&source[copied..]);
        Ok(())
    }
}
