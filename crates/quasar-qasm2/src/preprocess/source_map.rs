//! Offsets in preprocessed text mapped back to the files they came from.

use std::ops::Range;

use crate::error::ParseError;

/// File index of the source passed to the front end.
pub(crate) const MAIN: usize = 0;

/// A file spliced in by an `include` directive.
#[derive(Debug, Clone, PartialEq)]
struct IncludedFile {
    path: String,
    /// File index of the including file.
    parent: usize,
    /// The whole `include "...";` directive in the including file.
    directive: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
enum Origin {
    /// Copied verbatim from this input offset on.
    Copied(usize),
    /// Generated in place of this input range.
    Replaced(Range<usize>),
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    output: usize,
    file: usize,
    origin: Origin,
}

/// Piecewise map from offsets in rewritten text to offsets in its input.
///
/// Segments are recorded in output order; each one covers the text up to
/// the next. An empty map is the identity on [`MAIN`].
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct OffsetMap {
    segments: Vec<Segment>,
}

impl OffsetMap {
    /// Output from `output` on is copied from `file` starting at `input`.
    pub(crate) fn copied(&mut self, output: usize, file: usize, input: usize) {
        self.segments.push(Segment {
            output,
            file,
            origin: Origin::Copied(input),
        });
    }

    /// Output from `output` on was generated in place of `input` in `file`.
    pub(crate) fn replaced(&mut self, output: usize, file: usize, input: Range<usize>) {
        self.segments.push(Segment {
            output,
            file,
            origin: Origin::Replaced(input),
        });
    }

    /// Map an output span to a file and a span in that file.
    ///
    /// A span inside generated text maps to the whole range it replaced.
    pub(crate) fn map(&self, span: Range<usize>) -> (usize, Range<usize>) {
        let index = self.segments.partition_point(|s| s.output <= span.start);
        let Some(segment) = index.checked_sub(1).map(|i| &self.segments[i]) else {
            return (MAIN, span);
        };
        match &segment.origin {
            Origin::Copied(input) => {
                let start = input + (span.start - segment.output);
                (segment.file, start..start + span.len())
            }
            Origin::Replaced(input) => (segment.file, input.clone()),
        }
    }
}

/// Where every byte of the preprocessed text came from.
///
/// Include inlining maps the inlined text to files; gate flattening maps the
/// flattened text to the inlined text.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SourceMap {
    files: Vec<IncludedFile>,
    pub(crate) includes: OffsetMap,
    pub(crate) rewrites: OffsetMap,
}

impl SourceMap {
    /// Register an included file, returning its file index.
    pub(crate) fn add_file(&mut self, path: String, parent: usize, directive: Range<usize>) -> usize {
        self.files.push(IncludedFile {
            path,
            parent,
            directive,
        });
        self.files.len()
    }

    fn file(&self, index: usize) -> Option<&IncludedFile> {
        index.checked_sub(1).and_then(|i| self.files.get(i))
    }

    /// Wrap an error raised in file `index` in the directive that included
    /// that file. Errors in [`MAIN`] are returned as they are.
    pub(crate) fn enclose(&self, index: usize, error: ParseError) -> ParseError {
        match self.file(index) {
            Some(file) => ParseError::InInclude {
                path: file.path.clone(),
                span: file.directive.clone(),
                error: Box::new(error),
            },
            None => error,
        }
    }

    /// Move an error raised on the mapped text back to the file it came
    /// from, wrapped once per level of inclusion.
    pub(crate) fn relocate(&self, error: ParseError) -> ParseError {
        let (_, span) = self.rewrites.map(error.span());
        let (mut index, span) = self.includes.map(span);
        let mut error = error.with_span(span);
        while let Some(file) = self.file(index) {
            error = self.enclose(index, error);
            index = file.parent;
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_error(span: Range<usize>) -> ParseError {
        ParseError::LexError {
            span,
            message: "bad".into(),
        }
    }

    #[test]
    fn test_empty_map_is_identity() {
        assert_eq!(OffsetMap::default().map(4..7), (MAIN, 4..7));
        assert_eq!(SourceMap::default().relocate(lex_error(4..7)), lex_error(4..7));
    }

    #[test]
    fn test_copied_and_replaced_segments() {
        let mut map = OffsetMap::default();
        map.copied(0, MAIN, 0);
        map.replaced(10, MAIN, 10..14);
        map.copied(30, MAIN, 14);

        assert_eq!(map.map(3..5), (MAIN, 3..5));
        assert_eq!(map.map(12..20), (MAIN, 10..14));
        assert_eq!(map.map(32..33), (MAIN, 16..17));
    }

    #[test]
    fn test_relocate_into_nested_include() {
        // main: `include "a.inc";` at 14..30, a.inc: `include "b.inc";` at 0..16
        let mut map = SourceMap::default();
        map.includes.copied(0, MAIN, 0);
        let a = map.add_file("a.inc".into(), MAIN, 14..30);
        map.includes.copied(14, a, 0);
        let b = map.add_file("b.inc".into(), a, 0..16);
        map.includes.copied(14, b, 0);
        map.includes.copied(20, a, 16);
        map.includes.copied(25, MAIN, 30);

        let err = map.relocate(lex_error(16..17));
        assert_eq!(
            err,
            ParseError::InInclude {
                path: "a.inc".into(),
                span: 14..30,
                error: Box::new(ParseError::InInclude {
                    path: "b.inc".into(),
                    span: 0..16,
                    error: Box::new(lex_error(2..3)),
                }),
            }
        );
        assert_eq!(map.relocate(lex_error(26..27)), lex_error(31..32));
    }
}
