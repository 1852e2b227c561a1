// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! `SyntaxParser`, the external boundary. The rest of the core depends only
//! on a small capability set — parse bytes to a tree, enumerate import
//! statements — and never names a concrete `ruff_python_ast` node type
//! outside this module and `extractor`.

use ruff_python_ast::ModModule;
use ruff_python_parser::{parse_module, ParseError, Parsed};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, thiserror::Error)]
pub enum ParseFailure {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Reads and parses a source file, returning the raw source text alongside
/// the parsed tree (the extractor needs the text to slice out identifiers
/// by range, e.g. for the pkgutil namespace-package sniff below).
pub fn parse_source_file(path: &Path) -> Result<(String, Parsed<ModModule>), ParseFailure> {
    let source = fs::read_to_string(path).map_err(|source| ParseFailure::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_module(&source).map_err(|source| ParseFailure::Syntax {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((source, parsed))
}

/// Sniffs the classic `pkgutil`-style namespace-package `__init__.py`:
/// `__path__ = __import__('pkgutil').extend_path(__path__, __name__)`.
/// Such a file parses fine as ordinary Python but declares no real package
/// contents of its own.
pub fn content_looks_like_pkgutil_ns_init(source: &str) -> bool {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r#"^__path__ *= *__import__ *\(('pkgutil'|"pkgutil")\).extend_path *\( *__path__ *, *__name__ *\)"#,
        )
        .unwrap()
    });
    RE.is_match_at(source, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkgutil_ns_init_is_recognized() {
        assert!(content_looks_like_pkgutil_ns_init(
            "__path__ = __import__('pkgutil').extend_path(__path__, __name__)\n"
        ));
        assert!(!content_looks_like_pkgutil_ns_init("import os\n"));
    }

    #[test]
    fn parse_source_file_reports_missing_file() {
        let err = parse_source_file(Path::new("/nonexistent/does/not/exist.py"));
        assert!(matches!(err, Err(ParseFailure::Io { .. })));
    }
}
